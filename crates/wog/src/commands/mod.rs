use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use miette::{Context, IntoDiagnostic, Result};
use tracing::warn;

pub mod extract;
pub mod list;
pub mod texture;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Extract a PAK archive (master.pak, etc) into a directory
    Extract(extract::ExtractArgs),
    /// List the entries of a PAK archive
    List(list::ListArgs),
    /// Convert textures (.png.binbig) to PNG
    ImageToPng(texture::ImageToPngArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Extract(extract) => extract.handle(),
            Commands::List(list) => list.handle(),
            Commands::ImageToPng(convert) => convert.handle(),
        }
    }
}

/// Read the known-path list, treating a missing list as empty.
pub(crate) fn read_file_list(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        warn!(
            "{} not found, entries will be named by hash",
            path.display()
        );
        return Ok(Vec::new());
    }

    let f = File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;

    BufReader::new(f)
        .lines()
        .map(|line| line.map(|l| l.trim_end_matches('\r').to_owned()))
        .collect::<std::io::Result<Vec<_>>>()
        .into_diagnostic()
        .context(format!("reading {}", path.display()))
}
