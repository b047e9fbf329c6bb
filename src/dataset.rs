//! Loading raw records from JSON.
//!
//! Two layouts are accepted: a single JSON array of records, or one record
//! object per line (JSON Lines). Blank lines in the latter are skipped.

use crate::error::{LibrusError, Result};
use crate::types::RawRecord;
use std::path::Path;
use tracing::debug;

/// Parse raw records from a JSON array or JSON Lines string.
pub fn parse_records(input: &str) -> Result<Vec<RawRecord>> {
  let trimmed = input.trim_start();
  if trimmed.starts_with('[') {
    return Ok(serde_json::from_str(trimmed)?);
  }

  trimmed
    .lines()
    .filter(|line| !line.trim().is_empty())
    .map(|line| serde_json::from_str::<RawRecord>(line).map_err(LibrusError::from))
    .collect()
}

/// Read raw records from a file. See [`parse_records`] for accepted layouts.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawRecord>> {
  let path = path.as_ref();
  let contents = std::fs::read_to_string(path)?;
  let records = parse_records(&contents)?;
  debug!(path = %path.display(), num_records = records.len(), "Loaded records");
  Ok(records)
}
