//! Output formatting and persistence for metric tables.
//!
//! Supports pretty-printing, JSON serialization, and CSV/JSON files.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::metrics::types::GroupFailure;

use csv::WriterBuilder;
use std::fs::{self, File, OpenOptions};
use std::path::Path;

/// A group that could not be computed, as persisted to the failures log.
#[derive(Debug, Serialize)]
pub struct FailureRecord {
    pub timestamp: DateTime<Utc>,
    pub command: String,
    pub entity: String,
    pub error: String,
}

impl FailureRecord {
    pub fn from_failure(command: &str, failure: &GroupFailure) -> Self {
        FailureRecord {
            timestamp: Utc::now(),
            command: command.to_string(),
            entity: failure.entity.clone(),
            error: failure.error.to_string(),
        }
    }
}

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `rows` to `path`, replacing any existing file.
///
/// A `.json` extension produces a JSON array; anything else produces CSV with
/// a header row.
pub fn write_rows<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    create_parent_dir(path)?;

    if is_json(path) {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, rows)?;
    } else {
        let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    debug!(path, rows = rows.len(), "Rows written");
    Ok(())
}

/// Writes a single value as pretty JSON.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    create_parent_dir(path)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

/// Appends a record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record<T: Serialize>(path: &str, record: &T) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    create_parent_dir(path)?;
    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

fn is_json(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn create_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
