//! Main entry point for the lamina CLI.
//!
//! The CLI drives a configuration resolution run against a directory
//! tree and reports what the pipeline produced:
//! - `show`: the merged configuration view
//! - `profiles`: the resolved active profiles
//! - `contributors`: the ordered contributor selection

mod cli;
mod commands;
mod error;
mod logging;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose, cli.quiet);

    let set = match utils::parse_overrides(&cli.set) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };
    let global = GlobalOptions {
        config_dir: cli.config_dir,
        working_dir: cli.working_dir,
        set,
        registry: cli.registry,
        metadata: cli.metadata,
    };

    let result = match cli.command {
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::Profiles(cmd) => cmd.execute(&global),
        cli::Command::Contributors(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
