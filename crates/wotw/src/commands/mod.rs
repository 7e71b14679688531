pub mod ffuh;
pub mod kat;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle KAT! archives (Dat.wow, MAPS.wow)
    Kat {
        #[command(subcommand)]
        command: kat::KatCommands,
    },
    /// Handle FFUH compressed models (IOB, WOF)
    Ffuh {
        #[command(subcommand)]
        command: ffuh::FfuhCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Kat { command } => command.handle(),
            Commands::Ffuh { command } => command.handle(),
        }
    }
}
