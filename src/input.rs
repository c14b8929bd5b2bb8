//! Script input from a file or stdin.

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading a script.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read script from {source_name}: {source}")]
    Io {
        source_name: String,
        #[source]
        source: io::Error,
    },
}

/// Where a script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Stdin,
    File(PathBuf),
}

impl ScriptSource {
    /// Build a source from a CLI argument; `-` or no argument means stdin.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => ScriptSource::Stdin,
            Some(path) => ScriptSource::File(PathBuf::from(path)),
        }
    }

    /// Read the whole script.
    pub fn read(&self) -> Result<String, InputError> {
        match self {
            ScriptSource::Stdin => {
                let mut script = String::new();
                io::stdin()
                    .read_to_string(&mut script)
                    .map_err(|e| self.error(e))?;
                Ok(script)
            }
            ScriptSource::File(path) => fs::read_to_string(path).map_err(|e| self.error(e)),
        }
    }

    fn error(&self, source: io::Error) -> InputError {
        InputError::Io {
            source_name: self.to_string(),
            source,
        }
    }
}

impl fmt::Display for ScriptSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptSource::Stdin => f.write_str("<stdin>"),
            ScriptSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
