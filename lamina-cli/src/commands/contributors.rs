//! Command to print the ordered contributor selection.

use clap::Args;

use crate::error::CliError;
use crate::utils::{select_contributors, GlobalOptions};

/// Print the final ordered contributor identifiers.
#[derive(Args)]
pub struct ContributorsCommand {
    /// Also print the requesting source of each contributor
    #[arg(long)]
    pub sources: bool,
}

impl ContributorsCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let selected = select_contributors(global)?;
        for contributor in selected {
            if self.sources {
                println!("{} ({})", contributor.identifier, contributor.source);
            } else {
                println!("{}", contributor.identifier);
            }
        }
        Ok(())
    }
}
