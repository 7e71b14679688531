use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use wotw_ffuh::{DecoderOptions, HeaderReport};

#[derive(Args)]
pub struct HeaderArgs {
    /// An input FFUH file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl HeaderArgs {
    pub fn handle(&self) -> Result<()> {
        let data = std::fs::read(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        let report = HeaderReport::analyze(&data)?;
        print!("{}", report);

        match report.check(&DecoderOptions::default()) {
            Ok(()) => println!("{}", "header passes the sanity checks".green()),
            Err(e) => println!("{} {}", "header rejected:".red(), e),
        }

        Ok(())
    }
}
