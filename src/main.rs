//! CLI entry point for evaluating and fitting the thermodynamic models

use clap::Parser;
use thermofit::io::cli::Cli;

fn main() -> thermofit::Result<()> {
    Cli::parse().run()
}
