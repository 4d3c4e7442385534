//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive
//! macros, including global options and subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{ContributorsCommand, ProfilesCommand, ShowCommand};

/// Command-line tool for inspecting lamina configuration resolution.
#[derive(Parser)]
#[command(name = "lamina")]
#[command(version, about = "Inspect layered configuration resolution", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Directory backing the classpath: scheme
    #[arg(long, value_name = "PATH", global = true, default_value = ".")]
    pub config_dir: PathBuf,

    /// Directory backing the file: scheme
    #[arg(long, value_name = "PATH", global = true, default_value = ".")]
    pub working_dir: PathBuf,

    /// Property override applied with highest precedence (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", global = true)]
    pub set: Vec<String>,

    /// Path to the factory registration file
    #[arg(long, value_name = "PATH", global = true, env = "LAMINA_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Path to the contributor metadata file
    #[arg(long, value_name = "PATH", global = true, env = "LAMINA_METADATA")]
    pub metadata: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Print the merged configuration view
    Show(ShowCommand),

    /// Print the resolved active profiles
    Profiles(ProfilesCommand),

    /// Print the ordered contributor selection
    Contributors(ContributorsCommand),
}
