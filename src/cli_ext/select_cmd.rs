//! CLI command handlers for keyword selection and ngram inspection.
//!
//! Settings resolve as flag > config file / environment > default.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tracing::{info, instrument};

use crate::cli::{AppContext, NgramsArgs, SelectArgs};
use crate::core::ngram::ngrams;
use crate::core::normalize::Normalizer;
use crate::core::pipeline::Selector;
use crate::infra::config::{Config, OutputFormat, load_config};
use crate::infra::io::{read_table, write_table};

/// Fully resolved settings for one `select` run
#[derive(Debug)]
struct Resolved
{
    threshold: u64,
    max_words: usize,
    stopwords: Vec<String>,
    format: OutputFormat,
    sort_by: Option<String>,
}

fn resolve(
    args: &SelectArgs,
    mut config: Config,
) -> Result<Resolved>
{
    let selection = &mut config.selection;

    if let Some(threshold) = args.threshold
    {
        selection.threshold = threshold;
    }
    if let Some(max_words) = args.max_words
    {
        selection.max_words = max_words;
    }
    if !args.stopwords.is_empty()
    {
        selection.stopwords = args.stopwords.clone();
    }
    if args.stopwords_file.is_some()
    {
        selection.stopwords_file = args.stopwords_file.clone();
    }

    Ok(Resolved {
        threshold: selection.threshold,
        max_words: selection.max_words,
        stopwords: selection.resolve_stopwords()?,
        format: args.format.unwrap_or(config.output.format),
        sort_by: args.sort_by.clone().or(config.output.sort_by),
    })
}

/// Run the selection pipeline over one report file.
#[instrument(skip_all, fields(input = %args.input.display()))]
pub fn run(
    args: SelectArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config = load_config()?;
    let settings = resolve(&args, config)?;
    let selector = Selector::new(settings.threshold, &settings.stopwords)?.with_max_words(settings.max_words);

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            let header = "DRY RUN: Would select keywords:";
            if ctx.no_color
            {
                println!("{header}");
            }
            else
            {
                println!("{}", header.yellow());
            }
            println!("  Input: {}", args.input.display());
            println!("  Threshold: {}", selector.threshold());
            println!("  Max words: {}", selector.max_words());
            println!("  Stopwords: {:?}", settings.stopwords);
            println!("  Format: {:?}", settings.format);
        }
        return Ok(());
    }

    let table = read_table(&args.input, args.input_format)?;
    let mut selections = selector.select(&table);

    if let Some(column) = &settings.sort_by
    {
        selections.sort_by_column(column)?;
    }

    info!(rows = table.len(), selections = selections.len(), "selection finished");

    match &args.output
    {
        Some(path) =>
        {
            let file =
                File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_table(&selections, settings.format, &mut out)?;
            out.flush()
                .context("Failed to flush output")?;
        }
        None =>
        {
            let stdout = io::stdout();
            write_table(&selections, settings.format, stdout.lock())?;
        }
    }

    if !ctx.quiet
    {
        let summary = format!("{} selections from {} rows", selections.len(), table.len());
        if ctx.no_color
        {
            eprintln!("{summary}");
        }
        else
        {
            eprintln!("{}", summary.green());
        }
    }

    Ok(())
}

/// Print the ngram set of one phrase after normalization.
pub fn run_ngrams(
    args: NgramsArgs,
    _ctx: &AppContext,
) -> Result<()>
{
    let normalizer = Normalizer::new(&args.stopwords)?;
    let normalized = normalizer.normalize(&args.phrase);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for gram in ngrams(&normalized)
    {
        writeln!(out, "{gram}")?;
    }

    Ok(())
}
