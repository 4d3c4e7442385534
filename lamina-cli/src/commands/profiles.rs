//! Command to print the resolved profiles.

use clap::Args;

use crate::error::CliError;
use crate::utils::{load_environment, GlobalOptions};

/// Print the active profiles after resolution, one per line.
#[derive(Args)]
pub struct ProfilesCommand {
    /// Also print the default profiles
    #[arg(long)]
    pub defaults: bool,
}

impl ProfilesCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let environment = load_environment(global)?;
        for profile in environment.active_profiles() {
            println!("{profile}");
        }
        if self.defaults {
            for profile in environment.default_profiles() {
                println!("{profile} (default)");
            }
        }
        Ok(())
    }
}
