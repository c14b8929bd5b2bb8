//! HiveQL script parsing.

mod splitter;
mod statement;

pub use splitter::{Ending, scan_ending, split_statements};
pub use statement::{MetaCommand, Statement, StatementKind};
