use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, io::Write, path::PathBuf};
use tracing::{info, warn};
use wotw_ffuh::Decompressor;

#[derive(Args)]
pub struct DecompressArgs {
    /// An input FFUH file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DecompressArgs {
    pub fn handle(&self) -> Result<()> {
        let result = Decompressor::default().decompress_file(&self.file);

        if result.is_truncated() {
            warn!(
                "{} decoded to {} of {} bytes",
                self.file.display(),
                result.decompressed_size,
                result.expected_size.unwrap_or_default()
            );
        }

        let data = result
            .into_result()
            .with_context(|| format!("decompressing {}", self.file.display()))?;

        info!("writing {} bytes to {}", data.len(), self.output.display());
        let mut out = if !self.overwrite {
            File::create_new(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        } else {
            File::create(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        };

        out.write_all(&data).into_diagnostic()?;

        Ok(())
    }
}
