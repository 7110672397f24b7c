//! PartCatalog CLI: catalog the parts a game install's mods define.
//!
//! Walks `GameData/`, parses every `.cfg` file, and prints the resulting
//! catalog as JSON.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
