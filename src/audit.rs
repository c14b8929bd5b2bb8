//! Run log of split scripts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::decision::Decision;
use crate::script::Statement;

/// Max characters of the first statement kept in the summary.
const SUMMARY_LEN: usize = 200;

/// A run log entry.
#[derive(Debug, Serialize)]
pub struct RunEntry {
    /// Timestamp of the run.
    pub timestamp: DateTime<Utc>,
    /// Script source (file path or `<stdin>`).
    pub source: String,
    /// Number of statements produced.
    pub statements: usize,
    /// How many of them are meta-commands.
    pub meta_commands: usize,
    /// Whether the guard rejected the script.
    pub rejected: bool,
    /// Deny pattern that matched (if rejected).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Reason for rejecting (if rejected).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// The first statement, truncated.
    pub summary: String,
}

impl RunEntry {
    pub fn new(source: impl Into<String>, statements: &[Statement], decision: &Decision) -> Self {
        let (rejected, rule, reason) = match decision {
            Decision::Accept => (false, None, None),
            Decision::Reject(info) => (true, Some(info.rule.clone()), Some(info.reason.clone())),
        };

        let summary = statements
            .first()
            .map(|s| truncate_string(s.text().trim(), SUMMARY_LEN))
            .unwrap_or_else(|| "<empty>".to_string());

        Self {
            timestamp: Utc::now(),
            source: source.into(),
            statements: statements.len(),
            meta_commands: statements.iter().filter(|s| s.is_meta()).count(),
            rejected,
            rule,
            reason,
            summary,
        }
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Run logger writing JSONL entries to a file.
pub struct RunLogger {
    file: File,
}

impl RunLogger {
    /// Open or create a run log file.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Write an entry to the log.
    pub fn log(&mut self, entry: &RunEntry) -> std::io::Result<()> {
        let json = serde_json::to_string(entry)?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()
    }

    /// Log a run of a script.
    pub fn log_run(
        &mut self,
        source: &str,
        statements: &[Statement],
        decision: &Decision,
    ) -> std::io::Result<()> {
        let entry = RunEntry::new(source, statements, decision);
        self.log(&entry)
    }
}
