use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::{Component, Path, PathBuf},
};
use tracing::{error, info, warn};
use wog_pak::{
    read::{extract_all_parallel, EntrySink},
    PakArchive, PakEntry,
};

#[derive(Args)]
pub struct ExtractArgs {
    /// An input PAK file
    #[arg(value_name = "ARCHIVE")]
    archive: PathBuf,

    /// A target directory
    #[arg(value_name = "OUTPUT_DIR")]
    directory: PathBuf,

    /// A newline delimited list of known paths
    #[arg(short = 'l', long, value_name = "FILE", default_value = "file_list.txt")]
    file_list: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Number of entries to extract at once
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,
}

/// Writes extracted entries below a root directory.
pub struct DirectorySink {
    root: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            root: root.into(),
            overwrite,
        }
    }

    fn target(&self, entry: &PakEntry) -> io::Result<PathBuf> {
        let name = entry.name().replace('\\', "/");
        let relative = Path::new(&name);

        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{name} points outside the output directory"),
            ));
        }

        Ok(self.root.join(relative))
    }
}

impl EntrySink for DirectorySink {
    fn accept(&self, entry: &PakEntry, data: &[u8]) -> io::Result<()> {
        let p = self.target(entry)?;
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut out = if !self.overwrite {
            File::create_new(&p)?
        } else {
            File::create(&p)?
        };
        out.write_all(data)
    }
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        if !self.archive.is_file() {
            error!("input pak file {} does not exist", self.archive.display());
            return Ok(());
        }

        if self.directory.is_file() {
            error!(
                "invalid output directory {} - is a file",
                self.directory.display()
            );
            return Ok(());
        }

        let paths = super::read_file_list(&self.file_list)?;

        let f = File::open(&self.archive)
            .into_diagnostic()
            .context(format!("path: {}", &self.archive.display()))?;
        let pak = PakArchive::with_paths(BufReader::new(f), paths)?;
        info!("{}/{} hashes found", pak.resolved_count(), pak.len());

        std::fs::create_dir_all(&self.directory)
            .into_diagnostic()
            .context(format!("creating {}", &self.directory.display()))?;
        let sink = DirectorySink::new(&self.directory, self.overwrite);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.unwrap_or(0))
            .build()
            .into_diagnostic()?;

        let outcomes = pool.install(|| {
            extract_all_parallel(
                || File::open(&self.archive).map(BufReader::new),
                pak.entries(),
                pak.compression(),
                &sink,
            )
        });

        let mut failed = 0;
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                warn!("skipped: {} - {}", outcome.entry.name(), e);
                failed += 1;
            }
        }

        info!(
            "extracted {} of {} entries into {}",
            outcomes.len() - failed,
            outcomes.len(),
            self.directory.display()
        );
        Ok(())
    }
}
