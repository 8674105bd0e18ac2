//! Listing records produced by `rclone lsjson`
//!
//! Entries are kept exactly as rclone reported them. The accessors below only
//! read well-known fields; nothing is validated or normalized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// One file or directory reported by `rclone lsjson`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListEntry(Map<String, Value>);

impl ListEntry {
    fn str_field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Base name (`Name`)
    pub fn name(&self) -> Option<&str> {
        self.str_field("Name")
    }

    /// Path relative to the listed directory (`Path`)
    pub fn path(&self) -> Option<&str> {
        self.str_field("Path")
    }

    /// Size in bytes (`Size`); rclone reports -1 for directories
    pub fn size(&self) -> Option<i64> {
        self.0.get("Size").and_then(Value::as_i64)
    }

    /// Whether rclone flagged this entry as a directory (`IsDir`)
    pub fn is_dir(&self) -> bool {
        self.0.get("IsDir").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Modification time (`ModTime`), if present and parseable
    pub fn mod_time(&self) -> Option<jiff::Timestamp> {
        self.str_field("ModTime").and_then(|s| s.parse().ok())
    }
}

/// Decode `lsjson` output
///
/// Returns `Ok(None)` when stdout is empty or whitespace only.
pub fn parse_listing(stdout: &str) -> Result<Option<Vec<ListEntry>>> {
    if stdout.trim().is_empty() {
        return Ok(None);
    }
    let entries: Vec<ListEntry> = serde_json::from_str(stdout)?;
    Ok(Some(entries))
}

/// Whether a listing contains an entry whose `Name` equals `name`
pub fn contains_name(entries: &[ListEntry], name: &str) -> bool {
    entries.iter().any(|e| e.name() == Some(name))
}
