//! Statements produced by the splitter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an executor should do with a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    /// Query text for the engine.
    Query,
    /// A `!` command for the interpreter (Beeline/SQLLine).
    Meta,
}

/// One executable element of a script.
///
/// The text is kept verbatim, including comments, quotes and surrounding
/// whitespace. It is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Statement {
    text: String,
}

/// A parsed `!name args` meta-command, borrowed from its statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaCommand<'a> {
    /// Command name, e.g. `connect`.
    pub name: &'a str,
    /// Rest of the line, trimmed.
    pub args: &'a str,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The statement text, verbatim.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn kind(&self) -> StatementKind {
        if self.text.trim_start().starts_with('!') {
            StatementKind::Meta
        } else {
            StatementKind::Query
        }
    }

    pub fn is_meta(&self) -> bool {
        self.kind() == StatementKind::Meta
    }

    /// Parse the meta-command, if this is one.
    pub fn meta_command(&self) -> Option<MetaCommand<'_>> {
        let payload = self.text.trim().strip_prefix('!')?;
        let (name, args) = payload
            .split_once(char::is_whitespace)
            .unwrap_or((payload, ""));
        Some(MetaCommand {
            name,
            args: args.trim(),
        })
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Statement {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl From<&str> for Statement {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
