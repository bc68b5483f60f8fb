use anyhow::Result;
use clap::Parser;

use canopy::cli::{Cli, Commands};
use canopy::commands::{forest, ndvi};

fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Forest(args) => forest::run(&cli, args),
        Commands::Ndvi(args) => ndvi::run(&cli, args),
    }
}
