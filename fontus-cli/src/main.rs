//! Fontus CLI - Piper diagrams and water chemistry indices from sample CSVs.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "fontus",
    version,
    about = "Water chemistry toolkit: Piper diagram geometry and irrigation indices"
)]
struct Cli {
    #[command(subcommand)]
    command: fontus_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    fontus_cmd::run(cli.command)
}
