//! CLI command implementations.

pub mod contributors;
pub mod profiles;
pub mod show;

pub use contributors::ContributorsCommand;
pub use profiles::ProfilesCommand;
pub use show::ShowCommand;
