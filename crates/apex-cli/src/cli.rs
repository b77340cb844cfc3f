use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "apex",
    about = "apex-copilot: Salesforce manifest tooling",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Project root holding .apex-copilot.json (defaults to the current directory)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Work with package.xml manifests
    #[command(subcommand)]
    Package(PackageCommand),
    /// Inspect the project configuration
    #[command(subcommand)]
    Project(ProjectCommand),
}

#[derive(Subcommand)]
pub enum PackageCommand {
    /// Merge two or more xml manifest files into one
    Merge(MergeArgs),
    /// Show the normalized content of one manifest
    Show(ShowArgs),
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Print the effective configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct MergeArgs {
    /// Files to merge (minimum two files), repeatable or comma-separated
    #[arg(short = 'f', long = "files", num_args = 1..)]
    pub files: Vec<String>,
    /// Output filename, allows a path; a bare name goes to the merged manifest directory
    #[arg(short, long)]
    pub output: Option<String>,
    /// Replace the output file if it already exists
    #[arg(long)]
    pub force: bool,
    /// Print the merge result without writing a file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ConfigArgs {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_merge_with_repeated_and_comma_files() {
        let cli = Cli::try_parse_from([
            "apex", "package", "merge", "-f", "a.xml,b.xml", "-f", "c.xml", "-o", "release", "--force",
        ])
        .unwrap();

        match cli.command {
            Command::Package(PackageCommand::Merge(args)) => {
                assert_eq!(args.files, vec!["a.xml,b.xml", "c.xml"]);
                assert_eq!(args.output.as_deref(), Some("release"));
                assert!(args.force);
                assert!(!args.dry_run);
            }
            _ => panic!("expected package merge"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "apex", "package", "show", "package.xml", "--format", "json", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Package(PackageCommand::Show(_))));
    }

    #[test]
    fn merge_without_files_parses() {
        let cli = Cli::try_parse_from(["apex", "package", "merge", "--dry-run"]).unwrap();
        match cli.command {
            Command::Package(PackageCommand::Merge(args)) => {
                assert!(args.files.is_empty());
                assert!(args.dry_run);
            }
            _ => panic!("expected package merge"),
        }
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["apex", "deploy"]).is_err());
    }
}
