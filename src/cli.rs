use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::infra::config::OutputFormat;
use crate::infra::io::InputFormat;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "kwselect")]
#[command(about = "Derive a compact, non-redundant set of keyword candidates from search-term reports")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress summaries and non-essential output
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log pipeline progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show what would be done without executing
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select keyword candidates from a search-term report
    Select(SelectArgs),

    /// Print the normalized ngrams of a single phrase
    Ngrams(NgramsArgs),

    /// Initialize a kwselect.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Parser)]
pub struct SelectArgs {
    /// Report file (CSV, JSON or JSON Lines); `-` reads stdin
    pub input: PathBuf,

    /// Input format (guessed from the extension when omitted)
    #[arg(long, value_enum)]
    pub input_format: Option<InputFormat>,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Minimum total impressions for an ngram to be kept
    #[arg(short, long)]
    pub threshold: Option<u64>,

    /// Longest ngram kept, in words
    #[arg(long)]
    pub max_words: Option<usize>,

    /// Stopword removed before ngram generation (repeatable)
    #[arg(short = 's', long = "stopword", value_name = "WORD")]
    pub stopwords: Vec<String>,

    /// File with one stopword per line
    #[arg(long)]
    pub stopwords_file: Option<String>,

    /// Sort output rows by this column
    #[arg(long, value_name = "COLUMN")]
    pub sort_by: Option<String>,
}

#[derive(Debug, Parser)]
pub struct NgramsArgs {
    /// Phrase to normalize and split
    pub phrase: String,

    /// Stopword removed before ngram generation (repeatable)
    #[arg(short = 's', long = "stopword", value_name = "WORD")]
    pub stopwords: Vec<String>,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_flag_parsing() {
        let cli = Cli::parse_from([
            "kwselect",
            "select",
            "report.csv",
            "--threshold",
            "299",
            "-s",
            "the",
            "--stopword",
            "and",
            "--format",
            "json",
            "--max-words",
            "3",
        ]);

        match cli.command {
            Commands::Select(args) => {
                assert_eq!(args.threshold, Some(299));
                assert_eq!(args.stopwords, vec!["the", "and"]);
                assert_eq!(args.format, Some(OutputFormat::Json));
                assert_eq!(args.max_words, Some(3));
                assert!(args.input_format.is_none());
            }
            _ => panic!("expected Select command"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["kwselect", "--quiet", "-v", "ngrams", "x"]).is_err());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
