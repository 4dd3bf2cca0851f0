//! ItemSetCopier CLI: translate community builds into importable item sets.
//!
//! Reads a retrieved build page (HTML or JSON), resolves it against the
//! reference-data catalog, and prints the item set JSON on stdout.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
