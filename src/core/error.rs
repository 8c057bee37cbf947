//! Error type for the selection pipeline.

/// Input-contract violations surfaced by the pipeline. No variant is
/// recoverable: the caller gets the error and no partial result.
#[derive(Debug, thiserror::Error)]
pub enum SelectError
{
    /// A required column is absent from the header or from a row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// An input column collides with a column the pipeline writes
    #[error("Reserved column name in input: {0}")]
    ReservedColumn(String),

    /// The impressions cell is not a non-negative integer
    #[error("Invalid impressions value in row {row}: {value}")]
    InvalidImpressions
    {
        row: usize,
        value: String,
    },

    /// A column named for sorting does not exist in the output
    #[error("Unknown column '{column}' (expected one of: {available})")]
    UnknownColumn
    {
        column: String,
        available: String,
    },

    /// The stopword matcher could not be compiled
    #[error("Invalid stopword list: {0}")]
    InvalidStopwords(#[from] regex::Error),
}
