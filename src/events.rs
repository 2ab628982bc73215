//! Review event logging for revet.
//!
//! Append-only NDJSON log (one JSON object per line) recording that a
//! review ran or was posted, written to `.revet/events.ndjson` in the
//! working directory. Logging is best-effort: callers warn on stderr and
//! carry on when an append fails.

use crate::error::{Result, RevetError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// A review was produced.
    Review,
    /// A review was published to the PR.
    Post,
}

/// An event record for the review log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// PR number the event refers to.
    pub pr: u64,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event for a PR with the given action.
    pub fn new(action: EventAction, pr: u64) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor_string(),
            pr,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| RevetError::UserError(format!("failed to serialize event: {}", e)))
    }
}

fn actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

/// Path of the events file under the given directory.
pub fn events_file_path(dir: &Path) -> PathBuf {
    dir.join(".revet").join("events.ndjson")
}

/// Append an event to the log under `dir`, creating the directory and file
/// as needed. Each append writes one JSON line with a trailing newline.
pub fn append_event(dir: &Path, event: &Event) -> Result<()> {
    let events_file = events_file_path(dir);
    let json_line = event.to_ndjson_line()?;

    if let Some(parent) = events_file.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            RevetError::UserError(format!(
                "failed to create events directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            RevetError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        RevetError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}
