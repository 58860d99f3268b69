use clap::{Args, Subcommand};

use crate::cli::subcommands::AssessmentCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Import a framework from a JSON file.
    Import(ImportArgs),
    /// Build and store framework snapshots.
    Publish(PublishArgs),
    /// Remove a framework's snapshot from the cache.
    Retire(CodeArgs),
    /// List cached snapshots.
    Snapshots,
    /// Print a framework tree.
    Tree(CodeArgs),
    /// Print the linear projection of a framework tree.
    Flatten(CodeArgs),
    /// Assessments.
    Assessment {
        #[command(subcommand)]
        action: AssessmentCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Path to the framework JSON document.
    pub file: String,
    /// Publish the snapshot once imported (requires a PUBLISHED status).
    #[arg(long)]
    pub publish: bool,
}

#[derive(Clone, Debug, Args)]
pub struct PublishArgs {
    /// Framework code to publish.
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub code: Option<String>,
    /// Publish every PUBLISHED framework.
    #[arg(long)]
    pub all: bool,
}

#[derive(Clone, Debug, Args)]
pub struct CodeArgs {
    /// Framework code.
    pub code: String,
}
