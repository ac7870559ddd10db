use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};
use tracing::{error, info};
use wog_pak::PakArchive;

#[derive(Args)]
pub struct ListArgs {
    /// An input PAK file
    #[arg(value_name = "ARCHIVE")]
    archive: PathBuf,

    /// A newline delimited list of known paths
    #[arg(short = 'l', long, value_name = "FILE", default_value = "file_list.txt")]
    file_list: PathBuf,

    /// Write the listing to a file instead of the terminal
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        if !self.archive.is_file() {
            error!("input pak file {} does not exist", self.archive.display());
            return Ok(());
        }

        let paths = super::read_file_list(&self.file_list)?;

        let f = File::open(&self.archive)
            .into_diagnostic()
            .context(format!("path: {}", &self.archive.display()))?;
        let pak = PakArchive::with_paths(BufReader::new(f), paths)?;

        match &self.output {
            Some(p) => {
                info!("creating {}", p.display());
                let mut out = BufWriter::new(
                    File::create(p)
                        .into_diagnostic()
                        .context(format!("creating {}", p.display()))?,
                );
                for entry in pak.entries() {
                    writeln!(out, "{}", entry).into_diagnostic()?;
                }
                out.flush().into_diagnostic()?;
            }
            None => {
                for entry in pak.entries() {
                    if entry.is_resolved() {
                        println!("{}", entry);
                    } else {
                        println!(
                            "{}",
                            entry.if_supports_color(Stream::Stdout, |e| e.dimmed())
                        );
                    }
                }
            }
        }

        info!(
            "{}/{} hashes found from {} known paths, seed 0x{:08X}, {} compression",
            pak.resolved_count(),
            pak.len(),
            pak.dictionary().len(),
            pak.seed(),
            pak.compression()
        );
        Ok(())
    }
}
