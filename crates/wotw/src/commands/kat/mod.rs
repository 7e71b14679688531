pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum KatCommands {
    /// List the entries of a KAT! archive
    List(list::ListArgs),
    /// Extract a KAT! archive into a directory
    Extract(extract::ExtractArgs),
}

impl KatCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            KatCommands::List(list) => list.handle(),
            KatCommands::Extract(extract) => extract.handle(),
        }
    }
}
