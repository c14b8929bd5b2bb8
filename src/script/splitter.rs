//! Split a script into statements on `;`.

use super::statement::Statement;

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Top level; `;` terminates the current statement.
    Normal,
    /// Inside a `'` or `"` literal.
    InQuote(char),
    /// Inside a `--` comment, up to and including the newline.
    InLineComment,
    /// Inside a `!` meta-command line, up to and including the newline.
    InMeta,
}

/// Where the scanner stands at the end of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Top level; a `;` appended here terminates the statement.
    TopLevel,
    /// Inside an unclosed `'` or `"` literal.
    InQuote(char),
    /// Inside a `--` comment with no newline yet.
    InLineComment,
    /// Inside a `!` line with no newline yet.
    InMeta,
}

/// Character-at-a-time statement scanner.
#[derive(Debug)]
struct Scanner {
    statements: Vec<Statement>,
    current: String,
    state: State,
}

impl Scanner {
    fn new() -> Self {
        Self {
            statements: Vec::new(),
            current: String::new(),
            state: State::Normal,
        }
    }

    fn feed(&mut self, c: char) {
        let current = &mut self.current;
        match self.state {
            State::InQuote(quote) => {
                // The closer only counts if the char before it isn't a backslash.
                let escaped = current.ends_with('\\');
                current.push(c);
                if c == quote && !escaped {
                    self.state = State::Normal;
                }
            }
            State::InLineComment => {
                current.push(c);
                if c == '\n' {
                    self.state = State::Normal;
                }
            }
            State::InMeta => {
                current.push(c);
                if c == '\n' {
                    flush(current, &mut self.statements);
                    self.state = State::Normal;
                }
            }
            State::Normal => match c {
                ';' => flush(current, &mut self.statements),
                '\'' | '"' => {
                    current.push(c);
                    self.state = State::InQuote(c);
                }
                '-' => {
                    current.push(c);
                    if opens_line_comment(current) {
                        self.state = State::InLineComment;
                    }
                }
                '!' if current.trim().is_empty() => {
                    current.push(c);
                    self.state = State::InMeta;
                }
                _ => current.push(c),
            },
        }
    }

    fn ending(&self) -> Ending {
        match self.state {
            State::Normal => Ending::TopLevel,
            State::InQuote(q) => Ending::InQuote(q),
            State::InLineComment => Ending::InLineComment,
            State::InMeta => Ending::InMeta,
        }
    }

    fn finish(mut self) -> Vec<Statement> {
        // Unterminated quotes, comments and meta-commands end up here too.
        flush(&mut self.current, &mut self.statements);
        self.statements
    }
}

/// Split a script into executable statements.
///
/// `;` inside quotes (`'` or `"`) or line comments (`--`) is ignored. Lines
/// starting with `!` are Beeline meta-commands and form a statement on their
/// own, without a terminating `;`. Comments, quotes and whitespace are kept
/// verbatim; statements that are only whitespace are dropped.
pub fn split_statements(script: &str) -> Vec<Statement> {
    let mut scanner = Scanner::new();
    script.chars().for_each(|c| scanner.feed(c));
    scanner.finish()
}

/// Scan `text` as the start of a statement and report where it ends.
pub fn scan_ending(text: &str) -> Ending {
    let mut scanner = Scanner::new();
    text.chars().for_each(|c| scanner.feed(c));
    scanner.ending()
}

/// Emit the current statement unless it is blank, and start a new one.
fn flush(current: &mut String, statements: &mut Vec<Statement>) {
    if current.trim().is_empty() {
        current.clear();
    } else {
        statements.push(Statement::new(std::mem::take(current)));
    }
}

/// Whether the statement now ends with a `--` that starts a line comment.
///
/// The `--` must be preceded by whitespace or open the statement; `a--b` is
/// plain text.
fn opens_line_comment(current: &str) -> bool {
    match current.strip_suffix("--") {
        Some(head) => head.chars().next_back().is_none_or(char::is_whitespace),
        None => false,
    }
}
