//! Filepath: src/core/record.rs
//! Input and output tables of the selection pipeline.
//!
//! - `QueryTable` holds validated report rows plus the column set
//!   they came with, so an empty result can still report its schema.
//! - `SelectionTable` holds the final keyword candidates.
//!
//! Any column other than the four required ones is a passthrough
//! column: carried verbatim from the winning input row to the output.

use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::{Map, Value};

use crate::core::aggregate::NgramAggregate;
use crate::core::error::SelectError;

pub const SEARCH_TERM: &str = "searchTerm";
pub const IMPRESSIONS: &str = "impressions";
pub const AD_GROUP_NAME: &str = "adGroupName";
pub const CAMPAIGN_NAME: &str = "campaignName";
pub const SELECTION: &str = "selection";
pub const NORMALIZED_SEARCH_TERM: &str = "normalizedSearchTerm";

/// Columns every input table must carry
pub const REQUIRED_COLUMNS: [&str; 4] = [SEARCH_TERM, IMPRESSIONS, AD_GROUP_NAME, CAMPAIGN_NAME];

/// Columns the pipeline derives itself; an input may not carry them
pub const RESERVED_COLUMNS: [&str; 2] = [SELECTION, NORMALIZED_SEARCH_TERM];

/// Leading output columns, before any passthrough column
pub const SELECTION_COLUMNS: [&str; 4] = [SELECTION, AD_GROUP_NAME, CAMPAIGN_NAME, SEARCH_TERM];

/// A raw row as handed over by a loader: column name to cell value
pub type RawRow = IndexMap<String, Value>;

/// One row of a search-term report
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord
{
    /// Raw customer search query
    pub search_term: String,

    /// Impressions the query received
    pub impressions: u64,

    /// Ad group that served the query
    pub ad_group_name: String,

    /// Campaign that served the query
    pub campaign_name: String,

    /// Every other column, in input column order
    pub passthrough: IndexMap<String, Value>,
}

impl QueryRecord
{
    pub fn new(
        search_term: impl Into<String>,
        impressions: u64,
        ad_group_name: impl Into<String>,
        campaign_name: impl Into<String>,
    ) -> Self
    {
        Self {
            search_term: search_term.into(),
            impressions,
            ad_group_name: ad_group_name.into(),
            campaign_name: campaign_name.into(),
            passthrough: IndexMap::new(),
        }
    }

    /// Attach a passthrough column value
    pub fn with_field(
        mut self,
        column: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self
    {
        self.passthrough
            .insert(column.into(), value.into());
        self
    }
}

/// A validated report: column names plus typed rows
#[derive(Debug, Clone, Default)]
pub struct QueryTable
{
    columns: Vec<String>,
    records: Vec<QueryRecord>,
}

impl QueryTable
{
    /// Build a table from raw rows, validating the required columns.
    ///
    /// The header is checked first, so a missing or reserved column fails
    /// even when there are no rows. Rows may omit passthrough columns
    /// (they become `null`) but never a required one.
    pub fn from_rows<I>(
        columns: Vec<String>,
        rows: I,
    ) -> Result<Self, SelectError>
    where
        I: IntoIterator<Item = RawRow>,
    {
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|req| !columns.iter().any(|c| c == *req))
        {
            return Err(SelectError::MissingColumn(missing.to_string()));
        }
        check_reserved(columns.iter().map(String::as_str))?;

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| record_from_row(idx, row, &columns))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, records })
    }

    /// Build a table from typed records. Columns are the required ones
    /// followed by passthrough columns in order of first appearance.
    pub fn from_records(records: Vec<QueryRecord>) -> Result<Self, SelectError>
    {
        let columns: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(
                records
                    .iter()
                    .flat_map(|r| r.passthrough.keys().cloned())
                    .unique(),
            )
            .collect();
        check_reserved(columns.iter().map(String::as_str))?;

        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String]
    {
        &self.columns
    }

    pub fn records(&self) -> &[QueryRecord]
    {
        &self.records
    }

    pub fn len(&self) -> usize
    {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.records.is_empty()
    }

    /// Columns carried through to the output untouched
    pub fn passthrough_columns(&self) -> impl Iterator<Item = &str>
    {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !REQUIRED_COLUMNS.contains(c))
    }
}

fn check_reserved<'c>(mut columns: impl Iterator<Item = &'c str>) -> Result<(), SelectError>
{
    match columns.find(|c| RESERVED_COLUMNS.contains(c))
    {
        Some(reserved) => Err(SelectError::ReservedColumn(reserved.to_string())),
        None => Ok(()),
    }
}

fn record_from_row(
    idx: usize,
    mut row: RawRow,
    columns: &[String],
) -> Result<QueryRecord, SelectError>
{
    let mut take = |column: &str| {
        row.shift_remove(column)
            .ok_or_else(|| SelectError::MissingColumn(column.to_string()))
    };

    let search_term = value_text(&take(SEARCH_TERM)?);
    let impressions = parse_impressions(idx, &take(IMPRESSIONS)?)?;
    let ad_group_name = value_text(&take(AD_GROUP_NAME)?);
    let campaign_name = value_text(&take(CAMPAIGN_NAME)?);

    let passthrough = columns
        .iter()
        .filter(|c| !REQUIRED_COLUMNS.contains(&c.as_str()))
        .map(|c| {
            let value = row
                .shift_remove(c)
                .unwrap_or(Value::Null);
            (c.clone(), value)
        })
        .collect();

    Ok(QueryRecord { search_term, impressions, ad_group_name, campaign_name, passthrough })
}

/// Accepts integers, integral floats and their string forms
fn parse_impressions(
    row: usize,
    value: &Value,
) -> Result<u64, SelectError>
{
    let invalid = || SelectError::InvalidImpressions { row, value: value.to_string() };

    let from_float = |f: f64| {
        if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64
        {
            Some(f as u64)
        }
        else
        {
            None
        }
    };

    match value
    {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(from_float))
            .ok_or_else(invalid),
        Value::String(s) =>
        {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

/// Render a cell as plain text: strings unquoted, null empty
pub fn value_text(value: &Value) -> String
{
    match value
    {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A final keyword candidate attributed to its winning report row
#[derive(Debug, Clone, PartialEq)]
pub struct Selection
{
    /// The selected ngram
    pub selection: String,

    pub ad_group_name: String,

    pub campaign_name: String,

    /// Original search term of the winning row
    pub search_term: String,

    pub passthrough: IndexMap<String, Value>,
}

impl Selection
{
    /// Project an aggregate onto the output shape, dropping totals
    pub fn from_aggregate(aggregate: &NgramAggregate<'_>) -> Self
    {
        let winner = aggregate.winner;
        Self {
            selection: aggregate.ngram.clone(),
            ad_group_name: winner.ad_group_name.clone(),
            campaign_name: winner.campaign_name.clone(),
            search_term: winner.search_term.clone(),
            passthrough: winner.passthrough.clone(),
        }
    }

    /// Cell value for an output column
    pub fn value(
        &self,
        column: &str,
    ) -> Option<Value>
    {
        match column
        {
            SELECTION => Some(Value::String(self.selection.clone())),
            AD_GROUP_NAME => Some(Value::String(self.ad_group_name.clone())),
            CAMPAIGN_NAME => Some(Value::String(self.campaign_name.clone())),
            SEARCH_TERM => Some(Value::String(self.search_term.clone())),
            other => self.passthrough.get(other).cloned(),
        }
    }

    /// Cell text for an output column; empty when absent
    pub fn text(
        &self,
        column: &str,
    ) -> String
    {
        self.value(column)
            .map(|v| value_text(&v))
            .unwrap_or_default()
    }
}

/// Pipeline output: schema plus rows, stable even when empty
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionTable
{
    columns: Vec<String>,
    rows: Vec<Selection>,
}

impl SelectionTable
{
    pub fn new<'a>(
        passthrough_columns: impl IntoIterator<Item = &'a str>,
        rows: Vec<Selection>,
    ) -> Self
    {
        let columns = SELECTION_COLUMNS
            .iter()
            .copied()
            .chain(passthrough_columns)
            .map(str::to_string)
            .collect();

        Self { columns, rows }
    }

    /// No rows, full schema
    pub fn empty<'a>(passthrough_columns: impl IntoIterator<Item = &'a str>) -> Self
    {
        Self::new(passthrough_columns, Vec::new())
    }

    pub fn columns(&self) -> &[String]
    {
        &self.columns
    }

    pub fn rows(&self) -> &[Selection]
    {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Selection>
    {
        self.rows
    }

    pub fn len(&self) -> usize
    {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.rows.is_empty()
    }

    /// Stable sort of rows by the text of one column
    pub fn sort_by_column(
        &mut self,
        column: &str,
    ) -> Result<(), SelectError>
    {
        if !self.columns.iter().any(|c| c == column)
        {
            return Err(SelectError::UnknownColumn {
                column: column.to_string(),
                available: self.columns.join(", "),
            });
        }

        self.rows
            .sort_by_cached_key(|row| row.text(column));
        Ok(())
    }

    /// Rows as JSON objects keyed by output column, in column order
    pub fn to_json_rows(&self) -> Vec<Map<String, Value>>
    {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| (c.clone(), row.value(c).unwrap_or(Value::Null)))
                    .collect()
            })
            .collect()
    }
}
