use clap::Args;
use miette::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use wotw_kat::KatArchive;

#[derive(Args)]
pub struct ListArgs {
    /// An input KAT! archive
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let kat = KatArchive::open(&self.file)?;

        println!(
            "{} entries, {} of {} bytes used",
            kat.len(),
            kat.total_size(),
            kat.archive_size()
        );

        for i in 0..kat.len() {
            let Some(entry) = kat.metadata(i) else {
                continue;
            };

            let line = format!(
                "{:>5}  {:<12}  0x{:08X}  {:>10}",
                i, entry.file_name, entry.data_start, entry.length
            );
            if entry.end() > kat.archive_size() {
                println!("{}", line.red());
            } else if entry.kind().is_model() {
                println!("{}", line.green());
            } else {
                println!("{}", line);
            }
        }

        Ok(())
    }
}
