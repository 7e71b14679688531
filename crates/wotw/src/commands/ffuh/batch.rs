use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use rayon::prelude::*;
use std::{
    ffi::OsString,
    fmt::Display,
    fs::File,
    io::Write,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use wotw_ffuh::{error::Error, Decompressor};
use wotw_kat::AssetKind;

#[derive(Args)]
pub struct TestArgs {
    /// A directory searched for IOB and WOF files
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Write decompressed files into this directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Number of worker threads, one per core when unset
    #[arg(short, long, value_name = "N")]
    jobs: Option<usize>,

    /// Stop the remaining decodes after the first failure
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    /// Allow overwriting decompressed files
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Complete(usize),
    Truncated { decoded: usize, expected: u32 },
    Failed(String),
    Cancelled,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Complete(size) => write!(f, "✅ {} bytes", size.green()),
            Outcome::Truncated { decoded, expected } => {
                write!(f, "⚠️ {} of {} bytes", decoded.yellow(), expected)
            }
            Outcome::Failed(reason) => write!(f, "❌ {}", reason.red()),
            Outcome::Cancelled => write!(f, "{}", "cancelled".dimmed()),
        }
    }
}

/// Appends `.decompressed` to the file name, keeping the model extension visible
fn output_name(relative: &Path) -> PathBuf {
    let mut name = OsString::from(relative.as_os_str());
    name.push(".decompressed");
    PathBuf::from(name)
}

impl TestArgs {
    fn find_models(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .filter(|e| AssetKind::from_name(&e.file_name().to_string_lossy()).is_model())
            .map(|e| e.into_path())
            .sorted()
            .collect()
    }

    fn write_output(&self, path: &Path, data: &[u8]) -> Result<()> {
        let Some(output) = &self.output else {
            return Ok(());
        };

        let relative = path.strip_prefix(&self.directory).into_diagnostic()?;
        let p = output.join(output_name(relative));
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)
                .into_diagnostic()
                .context(format!("creating {}", parent.display()))?;
        }

        let mut out = if !self.overwrite {
            File::create_new(&p)
                .into_diagnostic()
                .context(format!("creating {}", &p.display()))?
        } else {
            File::create(&p)
                .into_diagnostic()
                .context(format!("creating {}", &p.display()))?
        };
        out.write_all(data).into_diagnostic()?;

        Ok(())
    }

    fn run(&self, path: &Path, decompressor: &Decompressor, cancel: &AtomicBool) -> Outcome {
        // Files picked up after a stop are not looked at
        if cancel.load(Ordering::Relaxed) {
            return Outcome::Cancelled;
        }

        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => return Outcome::Failed(e.to_string()),
        };

        let result = decompressor.decompress_cancellable(&data, cancel);
        debug!("{}: {}", path.display(), result.stage);

        let truncated = result.is_truncated();
        let expected = result.expected_size.unwrap_or_default();
        let outcome = match result.into_result() {
            Ok(decoded) => match self.write_output(path, &decoded) {
                Ok(()) if truncated => Outcome::Truncated {
                    decoded: decoded.len(),
                    expected,
                },
                Ok(()) => Outcome::Complete(decoded.len()),
                Err(e) => Outcome::Failed(e.to_string()),
            },
            Err(Error::Cancelled { .. }) => Outcome::Cancelled,
            Err(e) => Outcome::Failed(e.to_string()),
        };

        if self.fail_fast && matches!(outcome, Outcome::Failed(_)) {
            warn!("{} failed, stopping", path.display());
            cancel.store(true, Ordering::Relaxed);
        }

        outcome
    }

    pub fn handle(&self) -> Result<()> {
        let files = self.find_models();
        info!(
            "found {} models below {}",
            files.len(),
            self.directory.display()
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.unwrap_or(0))
            .build()
            .into_diagnostic()
            .context("creating worker pool")?;

        let decompressor = Decompressor::default();
        let cancel = AtomicBool::new(false);

        let outcomes: Vec<Outcome> = pool.install(|| {
            files
                .par_iter()
                .map(|path| self.run(path, &decompressor, &cancel))
                .collect()
        });

        for (path, outcome) in files.iter().zip(outcomes.iter()) {
            let name = path.strip_prefix(&self.directory).unwrap_or(path.as_path());
            println!("{}: {}", name.display(), outcome);
        }

        let complete = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Complete(_)))
            .count();
        let truncated = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Truncated { .. }))
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Failed(_)))
            .count();
        let cancelled = outcomes.len() - complete - truncated - failed;

        println!(
            "{} complete, {} truncated, {} failed, {} cancelled",
            complete.green(),
            truncated.yellow(),
            failed.red(),
            cancelled.dimmed()
        );

        Ok(())
    }
}
