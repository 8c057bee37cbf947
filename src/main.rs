use anyhow::Result;
use clap::Parser;
use kwselect::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // KWSELECT_LOG wins; otherwise the global flags pick the level
    let default_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("KWSELECT_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .init();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Select(args) => kwselect::select_run(args, &ctx),
        Commands::Ngrams(args) => kwselect::ngrams_run(args, &ctx),
        Commands::Init(args) => kwselect::infra::config::init(args, &ctx),
        Commands::Completions(args) => kwselect::completion::run(args, &ctx),
    }
}
