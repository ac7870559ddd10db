use clap::{Args, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use rayon::prelude::*;
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use walkdir::WalkDir;
use wog_texture::{Arrangement, Texture};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Texels are stored as they are
    #[default]
    Plain,
    /// Texels are gradient predicted, as in the Japanese release
    Gradient,
}

impl From<Layout> for Arrangement {
    fn from(value: Layout) -> Self {
        match value {
            Layout::Plain => Arrangement::Plain,
            Layout::Gradient => Arrangement::Gradient,
        }
    }
}

#[derive(Args)]
pub struct ImageToPngArgs {
    /// Input textures, or a single directory of textures
    #[arg(required = true, value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// How the texel planes are stored
    #[arg(short, long, value_enum, default_value_t = Layout::Plain)]
    arrangement: Layout,
}

impl ImageToPngArgs {
    fn files(&self) -> Vec<PathBuf> {
        match self.inputs.as_slice() {
            [dir] if dir.is_dir() => WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .collect(),
            inputs => inputs.to_vec(),
        }
    }

    pub fn handle(&self) -> Result<()> {
        let arrangement = Arrangement::from(self.arrangement);
        let files = self.files();

        let failed = files
            .par_iter()
            .filter_map(|file| convert(file, arrangement).err().map(|e| (file, e)))
            .collect::<Vec<_>>();

        for (file, e) in &failed {
            warn!("skipped: {} - {}", file.display(), e);
        }

        info!(
            "converted {} of {} textures",
            files.len() - failed.len(),
            files.len()
        );
        Ok(())
    }
}

/// Where the PNG for `input` is written: `name.png.binbig` becomes `name.png`.
pub fn png_path(input: &Path) -> PathBuf {
    match input
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".binbig"))
    {
        Some(stem) if stem.ends_with(".png") => input.with_file_name(stem),
        _ => input.with_extension("png"),
    }
}

/// Decode a single texture file and write it next to the input as PNG.
pub fn convert(file: &Path, arrangement: Arrangement) -> Result<PathBuf> {
    info!("processing: {}", file.display());

    let f = File::open(file)
        .into_diagnostic()
        .context(format!("path: {}", file.display()))?;
    let texture = Texture::from_compressed(BufReader::new(f))?;

    let header = texture.header();
    info!(
        "- original dimensions: {}x{}",
        header.original_width, header.original_height
    );
    info!(
        "- padded dimensions: {}x{}",
        header.padded_width, header.padded_height
    );
    info!(
        "- used dimensions: {}x{}",
        header.used_width, header.used_height
    );

    let output = png_path(file);
    texture
        .to_image(arrangement)
        .save(&output)
        .into_diagnostic()
        .context(format!("writing {}", output.display()))?;

    info!("converted to {}", output.display());
    Ok(output)
}

#[cfg(test)]
mod test {
    use std::path::{Path, PathBuf};

    use pretty_assertions::assert_eq;
    use wog_texture::Arrangement;

    use super::{convert, png_path};

    #[test]
    fn png_names() {
        assert_eq!(
            png_path(Path::new("res/images/island1.png.binbig")),
            PathBuf::from("res/images/island1.png")
        );
        assert_eq!(
            png_path(Path::new("res/images/island1.binbig")),
            PathBuf::from("res/images/island1.png")
        );
        assert_eq!(png_path(Path::new("0x0000BEEF")), PathBuf::from("0x0000BEEF.png"));
    }

    #[test]
    fn convert_writes_png() -> miette::Result<()> {
        let dir = tempfile::tempdir().map_err(|e| miette::miette!("{e}"))?;
        let input = dir.path().join("ball.png.binbig");

        #[rustfmt::skip]
        let payload = [
            0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x42,
        ];
        let mut compressed = vec![0x11, payload.len() as u8, 0x00, 0x00];
        for group in payload.chunks(8) {
            compressed.push(0x00);
            compressed.extend_from_slice(group);
        }
        std::fs::write(&input, compressed).map_err(|e| miette::miette!("{e}"))?;

        let output = convert(&input, Arrangement::Plain)?;
        assert_eq!(output, dir.path().join("ball.png"));
        assert!(output.is_file());

        Ok(())
    }

    #[test]
    fn convert_reports_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.png.binbig");
        std::fs::write(&input, b"not a texture").unwrap();

        assert!(convert(&input, Arrangement::Plain).is_err());
        assert!(!dir.path().join("bad.png").exists());
    }
}
