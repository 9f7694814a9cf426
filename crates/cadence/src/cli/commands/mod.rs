//! CLI commands

mod changelog;
mod completions;
mod init;
mod inputs;
mod plan;
mod tag;
mod validate;
mod version;

pub use changelog::ChangelogCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use plan::{CycleError, PlanCommand};
pub use tag::TagCommand;
pub use validate::{ValidateCommand, ValidationFailed};
pub use version::VersionCommand;
