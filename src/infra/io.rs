//! Filepath: src/infra/io.rs
//! Report loading and selection writing.
//!
//! - CSV (header row required), JSON (array of objects), JSON Lines
//! - `-` reads stdin
//! - Files over 1 MiB are memory-mapped
//!
//! Loaders only shape rows; column validation lives in `QueryTable`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexSet;
use memmap2::Mmap;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tracing::debug;

use crate::core::record::{QueryTable, RawRow, REQUIRED_COLUMNS, SelectionTable};
use crate::infra::config::OutputFormat;

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat
{
    Csv,
    Json,
    Jsonl,
}

impl InputFormat
{
    /// Guess from the file extension; CSV when unknown
    pub fn from_path(path: &Path) -> Self
    {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("jsonl" | "ndjson") => Self::Jsonl,
            _ => Self::Csv,
        }
    }
}

pub enum FileContent
{
    Mapped(Mmap),
    Buffered(String),
}

impl FileContent
{
    pub fn as_str(&self) -> Result<&str>
    {
        match self
        {
            FileContent::Mapped(mmap) => std::str::from_utf8(mmap).context("Input is not valid UTF-8"),
            FileContent::Buffered(s) => Ok(s.as_str()),
        }
    }
}

pub fn read_file_smart<P: AsRef<Path>>(path: P) -> Result<FileContent>
{
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;

    if metadata.len() > MMAP_THRESHOLD
    {
        let file =
            File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;

        // Safety: the mapping is read-only and dropped before we return the table
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to memory-map {}", path.display()))?;

        Ok(FileContent::Mapped(mmap))
    }
    else
    {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        Ok(FileContent::Buffered(content))
    }
}

/// Load a report from a path (`-` for stdin) into a validated table
pub fn read_table(
    path: &Path,
    format: Option<InputFormat>,
) -> Result<QueryTable>
{
    let format = format.unwrap_or_else(|| InputFormat::from_path(path));

    let content = if path == Path::new("-")
    {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        FileContent::Buffered(buf)
    }
    else
    {
        read_file_smart(path)?
    };

    let table = parse_table(content.as_str()?, format)
        .with_context(|| format!("Failed to load report {}", path.display()))?;

    debug!(rows = table.len(), columns = table.columns().len(), ?format, "loaded report");
    Ok(table)
}

/// Parse report text in the given format
pub fn parse_table(
    text: &str,
    format: InputFormat,
) -> Result<QueryTable>
{
    let (columns, rows) = match format
    {
        InputFormat::Csv => csv_rows(text)?,
        InputFormat::Json =>
        {
            let objects: Vec<Map<String, Value>> =
                serde_json::from_str(text).context("Expected a JSON array of objects")?;
            object_rows(objects)
        }
        InputFormat::Jsonl =>
        {
            let objects = text
                .lines()
                .enumerate()
                .filter(|(_, l)| !l.trim().is_empty())
                .map(|(i, l)| {
                    serde_json::from_str::<Map<String, Value>>(l)
                        .with_context(|| format!("Invalid JSON object on line {}", i + 1))
                })
                .collect::<Result<Vec<_>>>()?;
            object_rows(objects)
        }
    };

    Ok(QueryTable::from_rows(columns, rows)?)
}

/// Headers and cells are both trimmed: padding around a delimiter is
/// CSV layout, not data. JSON strings are taken as written.
fn csv_rows(text: &str) -> Result<(Vec<String>, Vec<RawRow>)>
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, record) in reader
        .records()
        .enumerate()
    {
        let record = record.with_context(|| format!("Malformed CSV record {}", i + 1))?;
        let row: RawRow = columns
            .iter()
            .cloned()
            .zip(record.iter().map(|cell| Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok((columns, rows))
}

/// Columns are the union of keys in first-appearance order. An empty
/// document carries no header, so it is read as the required columns.
fn object_rows(objects: Vec<Map<String, Value>>) -> (Vec<String>, Vec<RawRow>)
{
    if objects.is_empty()
    {
        return (REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(), Vec::new());
    }

    let columns: IndexSet<String> = objects
        .iter()
        .flat_map(|o| o.keys().cloned())
        .collect();

    let rows = objects
        .into_iter()
        .map(|o| o.into_iter().collect())
        .collect();

    (columns.into_iter().collect(), rows)
}

/// Write selections in the requested format; CSV always gets a header
pub fn write_table<W: Write>(
    table: &SelectionTable,
    format: OutputFormat,
    mut out: W,
) -> Result<()>
{
    match format
    {
        OutputFormat::Csv =>
        {
            let mut writer = csv::Writer::from_writer(out);
            writer
                .write_record(table.columns())
                .context("Failed to write CSV header")?;
            for row in table.rows()
            {
                writer
                    .write_record(table.columns().iter().map(|c| row.text(c)))
                    .context("Failed to write CSV record")?;
            }
            writer
                .flush()
                .context("Failed to flush CSV output")?;
        }
        OutputFormat::Json =>
        {
            serde_json::to_writer_pretty(&mut out, &table.to_json_rows())
                .context("Failed to write JSON output")?;
            writeln!(out)?;
        }
        OutputFormat::Table =>
        {
            let mut builder = Builder::default();
            builder.push_record(table.columns().iter().cloned());
            for row in table.rows()
            {
                builder.push_record(table.columns().iter().map(|c| row.text(c)));
            }
            writeln!(out, "{}", builder.build())?;
        }
    }

    Ok(())
}
