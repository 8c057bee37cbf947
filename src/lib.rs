//! **kwselect** - Keyword candidate selection from search-term reports
//!
//! Turns rows of (search term, impressions, ad group, campaign) into a
//! minimal set of word ngrams, each attributed to the ad group that drove
//! most of its impressions. Longer phrases absorb the shorter phrases
//! they contain, so the result carries no redundant bid targets.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Selection pipeline - pure, in-memory, single pass over one report
pub mod core {
    /// Pipeline errors (missing columns, bad impressions, bad stopwords)
    pub mod error;
    pub use error::SelectError;

    /// Input/output tables and their column schema
    pub mod record;
    pub use record::{QueryRecord, QueryTable, Selection, SelectionTable};

    /// Lowercasing, stopword and punctuation stripping, ASIN detection
    pub mod normalize;
    pub use normalize::{Normalizer, is_asin};

    /// Contiguous word windows of a phrase
    pub mod ngram;
    pub use ngram::{ngrams, word_count};

    /// Row fan-out: one row per ngram
    pub mod expand;

    /// Impression totals and winner attribution per ngram
    pub mod aggregate;

    /// Threshold and length filtering
    pub mod filter;

    /// Greedy substring pruning
    pub mod prune;
    pub use prune::prune;

    /// Stage wiring
    pub mod pipeline;
    pub use pipeline::Selector;
}

/// Infrastructure - Configuration and report I/O
pub mod infra {
    /// Configuration management with TOML support and env overrides
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// CSV/JSON report loading and selection writing
    pub mod io;
    pub use io::{read_table, write_table};
}

/// Command handlers beyond the core pipeline
pub mod cli_ext {
    pub mod select_cmd;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use cli_ext::select_cmd::{run as select_run, run_ngrams as ngrams_run};
pub use infra::{Config, load_config};

// Core types for external consumers
pub use crate::core::{QueryRecord, QueryTable, SelectError, Selection, SelectionTable, Selector};
