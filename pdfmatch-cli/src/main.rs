mod cli;
mod filename;
mod roster;
mod services;

use clap::Parser;
use colored::*;
use env_logger::Env;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Rename(args) => cli::commands::rename::handle_rename_command(args),
        Commands::Copy(args) => cli::commands::copy::handle_copy_command(args),
        Commands::Move(args) => cli::commands::mv::handle_move_command(args),
    };

    if let Err(err) = result {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
