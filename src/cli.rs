//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Unidup - superseded-installation cleaner
///
/// Detects which software installation records are superseded duplicates of
/// other records and removes them safely.
#[derive(Parser, Debug)]
#[command(
    name = "unidup",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Detect and remove superseded duplicate software installations",
    long_about = "Unidup inventories software installation records, groups them by canonical \
                  product identity, decides which records are superseded duplicates, and drives \
                  their uninstall commands one at a time. Conservative by design: a sole \
                  installation is never removed and functionally distinct editions coexist.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  unidup scan exports/\n    \
                  unidup scan exports/inventory.json --json\n    \
                  unidup clean exports/ --dry-run\n    \
                  unidup clean exports/ -y\n    \
                  unidup rules"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an inventory and print the keep/remove plan
    Scan(ScanArgs),

    /// Analyze an inventory and remove superseded duplicates
    Clean(CleanArgs),

    /// Show the effective pattern rules
    Rules(RulesArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the scan command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Analyze an export directory:\n    unidup scan exports/\n\n\
                  Analyze a single export file:\n    unidup scan exports/inventory.json\n\n\
                  Machine-readable plan:\n    unidup scan exports/ --json\n\n\
                  Custom pattern rules:\n    unidup scan exports/ --rules rules.yaml\n\n\
                  Without the latest-version oracle:\n    unidup scan exports/ --no-oracle")]
pub struct ScanArgs {
    /// Inventory export file or directory of export files
    pub source: PathBuf,

    /// Pattern rules file (YAML); defaults to the built-in rules
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Skip the latest-version oracle; decide from the groups alone
    #[arg(long)]
    pub no_oracle: bool,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove superseded duplicates:\n    unidup clean exports/\n\n\
                  Without confirmation:\n    unidup clean exports/ -y\n\n\
                  Show what would be removed:\n    unidup clean exports/ --dry-run")]
pub struct CleanArgs {
    /// Inventory export file or directory of export files
    pub source: PathBuf,

    /// Pattern rules file (YAML); defaults to the built-in rules
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Skip the latest-version oracle; decide from the groups alone
    #[arg(long)]
    pub no_oracle: bool,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Print the plan and remove nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Seconds to settle between uninstall invocations
    #[arg(long, default_value_t = 2)]
    pub settle_delay: u64,
}

/// Arguments for the rules command
#[derive(Parser, Debug)]
pub struct RulesArgs {
    /// Pattern rules file (YAML); defaults to the built-in rules
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    unidup completions --shell bash > ~/.bash_completion.d/unidup\n\n\
                  Generate zsh completions:\n    unidup completions --shell zsh > ~/.zfunc/_unidup")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_scan() {
        let cli = Cli::try_parse_from(["unidup", "scan", "exports/"]).unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.source, PathBuf::from("exports/"));
                assert!(!args.json);
                assert!(!args.no_oracle);
                assert_eq!(args.rules, None);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parsing_scan_with_options() {
        let cli = Cli::try_parse_from([
            "unidup",
            "scan",
            "exports/inventory.json",
            "--json",
            "--no-oracle",
            "--rules",
            "custom.yaml",
        ])
        .unwrap();
        match cli.command {
            Commands::Scan(args) => {
                assert!(args.json);
                assert!(args.no_oracle);
                assert_eq!(args.rules, Some(PathBuf::from("custom.yaml")));
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parsing_clean() {
        let cli = Cli::try_parse_from(["unidup", "clean", "exports/", "-y"]).unwrap();
        match cli.command {
            Commands::Clean(args) => {
                assert!(args.yes);
                assert!(!args.dry_run);
                assert_eq!(args.settle_delay, 2);
            }
            _ => panic!("Expected Clean command"),
        }
    }

    #[test]
    fn test_cli_parsing_clean_dry_run() {
        let cli =
            Cli::try_parse_from(["unidup", "clean", "exports/", "--dry-run", "--settle-delay", "0"])
                .unwrap();
        match cli.command {
            Commands::Clean(args) => {
                assert!(args.dry_run);
                assert_eq!(args.settle_delay, 0);
            }
            _ => panic!("Expected Clean command"),
        }
    }

    #[test]
    fn test_cli_parsing_rules() {
        let cli = Cli::try_parse_from(["unidup", "rules"]).unwrap();
        assert!(matches!(cli.command, Commands::Rules(_)));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["unidup", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["unidup", "completions", "--shell", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "bash"),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_global_verbose() {
        let cli = Cli::try_parse_from(["unidup", "-v", "scan", "exports/"]).unwrap();
        assert!(cli.verbose);
    }
}
