//! Statement and rejection formatting for CLI output.

use crate::config::OutputFormat;
use crate::decision::RejectInfo;
use crate::script::{Ending, Statement, StatementKind, scan_ending};
use serde::Serialize;

/// JSON line for one statement.
#[derive(Debug, Serialize)]
pub struct StatementRecord<'a> {
    pub index: usize,
    pub kind: StatementKind,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<&'a str>,
}

impl<'a> StatementRecord<'a> {
    pub fn new(index: usize, statement: &'a Statement) -> Self {
        let meta = statement.meta_command();
        Self {
            index,
            kind: statement.kind(),
            text: statement.text(),
            command: meta.map(|m| m.name),
            args: meta.map(|m| m.args),
        }
    }
}

/// Format statements for stdout.
///
/// Text output is meant to split back into the same statements.
pub fn format_statements(
    statements: &[Statement],
    format: OutputFormat,
) -> serde_json::Result<String> {
    let mut out = String::new();
    for (index, statement) in statements.iter().enumerate() {
        match format {
            OutputFormat::Text => {
                let text = statement.text().trim();
                out.push_str(text);
                if !statement.is_meta() {
                    push_terminator(&mut out, text);
                }
            }
            OutputFormat::Json => {
                let record = StatementRecord::new(index, statement);
                out.push_str(&serde_json::to_string(&record)?);
            }
        }
        out.push('\n');
    }
    Ok(out)
}

/// Terminate a trimmed query so that the `;` is seen at top level.
fn push_terminator(out: &mut String, text: &str) {
    match scan_ending(text) {
        Ending::TopLevel | Ending::InMeta => out.push(';'),
        // Trimming dropped the comment's newline.
        Ending::InLineComment => out.push_str("\n;"),
        // An open literal runs to the end of the script; a `;` would join it.
        Ending::InQuote(_) => {}
    }
}

/// Format a rejection for stderr.
pub fn format_rejection(info: &RejectInfo) -> String {
    format!(
        "REJECTED: {} (statement {}: {})",
        info.reason, info.statement, info.rule
    )
}
