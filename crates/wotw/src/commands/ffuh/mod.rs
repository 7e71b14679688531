pub mod batch;
pub mod decompress;
pub mod header;

#[derive(clap::Subcommand)]
pub enum FfuhCommands {
    /// Print the raw header of an FFUH file
    Header(header::HeaderArgs),
    /// Decompress a single FFUH file
    Decompress(decompress::DecompressArgs),
    /// Decompress every model below a directory and report the results
    Test(batch::TestArgs),
}

impl FfuhCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            FfuhCommands::Header(header) => header.handle(),
            FfuhCommands::Decompress(decompress) => decompress.handle(),
            FfuhCommands::Test(test) => test.handle(),
        }
    }
}
