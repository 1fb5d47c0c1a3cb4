//! Petadopt CLI: the `petadopt` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use support::Context;

fn main() {
    let cli = Cli::parse();
    let ctx = Context::from_args_or_exit(cli.global);

    match cli.command {
        Commands::User { command } => commands::user::run(command, &ctx),
        Commands::Shelter { command } => commands::shelter::run(command, &ctx),
        Commands::Pet { command } => commands::pet::run(command, &ctx),
        Commands::Adoption { command } => commands::adoption::run(command, &ctx),
    }
}
