//! CSV loading for match-event exports.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use tracing::debug;

/// Deserializes every row of a CSV stream into `T`.
///
/// Fails on the first malformed row, naming its position.
pub fn read_records<T, R>(reader: R) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();

    for (i, result) in rdr.deserialize().enumerate() {
        let record: T = result.with_context(|| format!("invalid record at row {}", i + 1))?;
        rows.push(record);
    }

    Ok(rows)
}

/// Loads a CSV file into `T` records.
pub fn load_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let rows = read_records(file).with_context(|| format!("failed to parse {}", path.display()))?;
    debug!(path = %path.display(), rows = rows.len(), "CSV loaded");
    Ok(rows)
}

/// Accepts the boolean spellings found in dataframe exports:
/// `true`/`True`/`TRUE`, `1`, `1.0` and their negatives. An empty cell is false.
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Ok(true),
        "false" | "0" | "0.0" | "" => Ok(false),
        other => Err(D::Error::custom(format!("invalid boolean '{other}'"))),
    }
}

/// Match minute written either as an integer or as a whole float (`"45.0"`).
pub fn deserialize_minute<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| D::Error::custom(format!("invalid minute '{raw}'")))?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(D::Error::custom(format!("invalid minute '{raw}'")));
    }
    Ok(value as u32)
}
