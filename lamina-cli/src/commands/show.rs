//! Command to print the merged configuration view.

use clap::{Args, ValueEnum};

use crate::error::CliError;
use crate::utils::{load_environment, GlobalOptions};

/// Output format for the merged view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `key=value` line per entry.
    Text,
    /// A single JSON object.
    Json,
}

/// Print the effective configuration after resolution.
#[derive(Args)]
pub struct ShowCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ShowCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let environment = load_environment(global)?;
        let merged = environment.merged_entries();

        match self.format {
            OutputFormat::Text => {
                for (key, value) in merged {
                    println!("{key}={value}");
                }
            }
            OutputFormat::Json => {
                let mut object = serde_json::Map::new();
                for (key, value) in merged {
                    object.insert(key, serde_json::Value::String(value));
                }
                println!("{}", serde_json::Value::Object(object));
            }
        }
        Ok(())
    }
}
