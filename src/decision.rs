//! Decision types for guarded scripts.

use serde::Serialize;

/// The result of checking a script's statements.
#[derive(Debug, Clone)]
pub enum Decision {
    /// Hand the statements to the executor.
    Accept,
    /// Refuse the script.
    Reject(RejectInfo),
}

/// Information about why a script was rejected.
#[derive(Debug, Clone, Serialize)]
pub struct RejectInfo {
    /// Human-readable reason for rejecting.
    pub reason: String,
    /// The deny pattern that matched.
    pub rule: String,
    /// Zero-based index of the offending statement.
    pub statement: usize,
}

impl RejectInfo {
    pub fn new(rule: impl Into<String>, reason: impl Into<String>, statement: usize) -> Self {
        Self {
            rule: rule.into(),
            reason: reason.into(),
            statement,
        }
    }
}

impl Decision {
    /// Create an accept decision.
    pub fn accept() -> Self {
        Decision::Accept
    }

    /// Create a reject decision.
    pub fn reject(rule: impl Into<String>, reason: impl Into<String>, statement: usize) -> Self {
        Decision::Reject(RejectInfo::new(rule, reason, statement))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Decision::Reject(_))
    }

    pub fn reject_info(&self) -> Option<&RejectInfo> {
        match self {
            Decision::Reject(info) => Some(info),
            Decision::Accept => None,
        }
    }
}
