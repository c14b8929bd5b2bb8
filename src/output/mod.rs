//! Output formatting of statements and rejections.

mod response;

pub use response::{StatementRecord, format_rejection, format_statements};
