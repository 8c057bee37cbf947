use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::{AppContext, InitArgs};
use crate::core::filter::DEFAULT_MAX_WORDS;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Candidate selection settings
    pub selection: SelectionConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig
{
    /// Minimum total impressions for an ngram to be kept
    pub threshold: u64,

    /// Longest ngram kept, in words
    pub max_words: usize,

    /// Words removed from search terms before ngram generation
    pub stopwords: Vec<String>,

    /// File with one stopword per line (`#` starts a comment line)
    pub stopwords_file: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig
{
    pub format: OutputFormat,

    /// Column to sort output rows by
    pub sort_by: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat
{
    #[default]
    Csv,
    Json,
    Table,
}

impl Default for SelectionConfig
{
    fn default() -> Self
    {
        Self { threshold: 0, max_words: DEFAULT_MAX_WORDS, stopwords: Vec::new(), stopwords_file: None }
    }
}

impl SelectionConfig
{
    /// Inline stopwords followed by the stopword file's words, if any.
    pub fn resolve_stopwords(&self) -> Result<Vec<String>>
    {
        let mut words = self.stopwords.clone();

        if let Some(file) = &self.stopwords_file
        {
            let expanded = shellexpand::full(file)
                .with_context(|| format!("Failed to expand stopwords path {file}"))?;
            let text = std::fs::read_to_string(expanded.as_ref())
                .with_context(|| format!("Failed to read stopwords file {expanded}"))?;

            words.extend(parse_stopwords(&text));
        }

        Ok(words)
    }
}

/// One stopword per non-blank line; lines starting with `#` are skipped
pub fn parse_stopwords(text: &str) -> impl Iterator<Item = String> + '_
{
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
}

pub fn load_config() -> Result<Config>
{
    load_config_with(environment())
}

/// `KWSELECT_SELECTION__THRESHOLD=300`, `KWSELECT_SELECTION__STOPWORDS=the,and`
fn environment() -> config::Environment
{
    config::Environment::with_prefix("KWSELECT")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("selection.stopwords")
}

fn load_config_with(env: config::Environment) -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["kwselect.toml", "kwselect.yaml", "kwselect.json", ".kwselect.toml"];

    for path in &config_paths
    {
        if Path::new(path).exists()
        {
            debug!(path, "loading config file");
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Environment overrides any file
    builder = builder.add_source(env);

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("kwselect.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("Would write {}:\n{toml_string}", config_path.display());
        }
        return Ok(());
    }

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml()
    {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(text.contains("max_words = 10"));
        assert!(text.contains("format = \"csv\""));

        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.selection.max_words, DEFAULT_MAX_WORDS);
        assert_eq!(parsed.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_partial_config_uses_defaults()
    {
        let parsed: Config = toml::from_str("[selection]\nthreshold = 299\n").unwrap();
        assert_eq!(parsed.selection.threshold, 299);
        assert_eq!(parsed.selection.max_words, DEFAULT_MAX_WORDS);
        assert!(parsed.selection.stopwords.is_empty());
    }

    #[test]
    fn test_environment_overrides_selection()
    {
        let vars: HashMap<String, String> = [
            ("KWSELECT_SELECTION__THRESHOLD", "299"),
            ("KWSELECT_SELECTION__MAX_WORDS", "3"),
            ("KWSELECT_SELECTION__STOPWORDS", "the,and"),
            ("KWSELECT_OUTPUT__FORMAT", "json"),
            ("KWSELECT_LOG", "debug"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let cfg = load_config_with(environment().source(Some(vars))).unwrap();
        assert_eq!(cfg.selection.threshold, 299);
        assert_eq!(cfg.selection.max_words, 3);
        assert_eq!(cfg.selection.stopwords, vec!["the", "and"]);
        assert_eq!(cfg.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_empty_environment_gives_defaults()
    {
        let cfg = load_config_with(environment().source(Some(HashMap::new()))).unwrap();
        assert_eq!(cfg.selection.threshold, 0);
        assert_eq!(cfg.selection.max_words, DEFAULT_MAX_WORDS);
        assert_eq!(cfg.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_parse_stopwords_skips_comments_and_blanks()
    {
        let words: Vec<String> = parse_stopwords("# english\nthe\n\n  and \n#all\nall\n").collect();
        assert_eq!(words, vec!["the", "and", "all"]);
    }

    #[test]
    fn test_resolve_stopwords_appends_file_words()
    {
        let dir = std::env::temp_dir().join(format!("kwselect-stopwords-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("stopwords.txt");
        std::fs::write(&file, "and\nall\n").unwrap();

        let cfg = SelectionConfig {
            stopwords: vec!["the".to_string()],
            stopwords_file: Some(file.display().to_string()),
            ..SelectionConfig::default()
        };

        assert_eq!(cfg.resolve_stopwords().unwrap(), vec!["the", "and", "all"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
