//! HQL Splitter - split HiveQL scripts into executable statements.
//!
//! Splits a script on `;` while honoring quotes, `--` comments and Beeline
//! `!` meta-commands, and builds the settings for running the statements
//! against an embedded engine on a local directory.

pub mod audit;
pub mod config;
pub mod context;
pub mod decision;
pub mod guard;
pub mod input;
pub mod output;
pub mod script;

pub use config::{CompiledConfig, Config};
pub use context::EngineContext;
pub use decision::Decision;
pub use guard::check_statements;
pub use script::{MetaCommand, Statement, StatementKind, split_statements};
