//! Run result → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one line per outcome
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use std::fmt::Display;

use zkarchive_durability::BackupOutcome;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a finished run.
pub fn format_outcome(outcome: &BackupOutcome, mode: OutputMode) -> String {
    match (outcome, mode) {
        (BackupOutcome::Archived(info), OutputMode::Json) => {
            let value = serde_json::json!({ "archived": true, "archive": info });
            serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
        }
        (BackupOutcome::Archived(info), OutputMode::Human) => format!(
            "archived {} snapshot(s) and {} log(s) into {} ({} bytes)",
            info.snapshot_count,
            info.log_count,
            info.path.display(),
            info.archive_size_bytes
        ),
        (BackupOutcome::NothingToArchive, OutputMode::Json) => {
            serde_json::json!({ "archived": false }).to_string()
        }
        (BackupOutcome::NothingToArchive, OutputMode::Human) => {
            "no txn file found, skip compress.".to_string()
        }
    }
}

/// Format an error.
pub fn format_error(err: &impl Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::json!({ "error": err.to_string() }).to_string(),
        OutputMode::Human => format!("(error) {}", err),
    }
}
