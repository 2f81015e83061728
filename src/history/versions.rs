use serde::Serialize;

use crate::error::HistoryError;
use crate::history::identifier::SnapshotIdentifier;

pub const DEFAULT_START_MARKER: &str = "## Versions";
pub const DEFAULT_END_MARKER: &str = "<!-- END_VERSIONS_TABLE -->";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRow {
    pub version: String,
    pub display_date: String,
    pub size: String,
    pub link: String,
}

impl VersionRow {
    pub fn latest(link: &str, bytes: u64) -> Self {
        Self {
            version: "Latest".to_string(),
            display_date: "Latest Version".to_string(),
            size: format_size(bytes),
            link: link.to_string(),
        }
    }

    pub fn archived(id: &SnapshotIdentifier, link: &str, bytes: u64) -> Self {
        Self {
            version: id.as_str().to_string(),
            display_date: id.display_date(),
            size: format_size(bytes),
            link: link.to_string(),
        }
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// Markdown table of versions, rows in the given order.
pub fn build_versions_table(rows: &[VersionRow]) -> String {
    if rows.is_empty() {
        return "No versions found.".to_string();
    }

    let mut table = String::from("| Version | Date | Size | Link |\n");
    table.push_str("|---------|------|------|------|\n");
    for row in rows {
        table.push_str(&format!(
            "| {} | {} | {} | [{}]({}) |\n",
            row.version, row.display_date, row.size, row.version, row.link
        ));
    }
    table
}

/// Replaces whatever sits between `start` and `end` with `insert`.
///
/// The start marker is kept, the end marker and everything after it are kept.
pub fn splice_between_markers(
    doc: &str,
    start: &str,
    end: &str,
    insert: &str,
) -> Result<String, HistoryError> {
    let start_at = doc
        .find(start)
        .ok_or_else(|| HistoryError::MarkerNotFound(start.to_string()))?;
    let after_start = start_at + start.len();
    let end_at = doc[after_start..]
        .find(end)
        .map(|offset| after_start + offset)
        .ok_or_else(|| HistoryError::MarkerNotFound(end.to_string()))?;

    Ok(format!(
        "{}\n\n{}\n\n{}",
        &doc[..after_start],
        insert.trim_end(),
        &doc[end_at..]
    ))
}
