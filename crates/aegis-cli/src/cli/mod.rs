use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `aegis` binary.
#[derive(Debug, Parser)]
#[command(
    name = "aegis",
    version,
    about = "Aegis - compliance framework snapshots and assessments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding `.aegis/` (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub project: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project: self.project.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::AssessmentCommands;
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["aegis", "--format", "raw", "--verbose", "snapshots"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Snapshots));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["aegis", "tree", "ISO27001", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Tree(ref args) if args.code == "ISO27001"));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["aegis", "--format", "table", "snapshots"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn publish_requires_code_or_all() {
        assert!(Cli::try_parse_from(["aegis", "publish"]).is_err());
        assert!(Cli::try_parse_from(["aegis", "publish", "ISO27001", "--all"]).is_err());

        let cli = Cli::try_parse_from(["aegis", "publish", "--all"]).expect("cli should parse");
        assert!(matches!(cli.command, Commands::Publish(ref args) if args.all && args.code.is_none()));
    }

    #[test]
    fn respond_collects_response_fields() {
        let cli = Cli::try_parse_from([
            "aegis",
            "assessment",
            "respond",
            "asm-1",
            "control:ctl-1",
            "--status",
            "PARTIALLY_COMPLIANT",
            "--maturity",
            "3",
            "--gaps",
            "No annual review",
        ])
        .expect("cli should parse");

        let Commands::Assessment { action } = cli.command else {
            panic!("expected assessment command");
        };
        let AssessmentCommands::Respond {
            id,
            locator,
            status,
            maturity,
            gaps,
            notes,
            ..
        } = action
        else {
            panic!("expected respond");
        };
        assert_eq!(id, "asm-1");
        assert_eq!(locator, "control:ctl-1");
        assert_eq!(status, "PARTIALLY_COMPLIANT");
        assert_eq!(maturity, Some(3));
        assert_eq!(gaps.as_deref(), Some("No annual review"));
        assert_eq!(notes, None);
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["aegis", "--project", "/tmp/demo", "snapshots"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/demo"));
    }
}
