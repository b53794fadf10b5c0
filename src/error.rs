use colored::Colorize;
use std::{fmt, path::PathBuf};

/// Errors that can occur while reading, parsing or querying a `.env` file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotenvError {
    /// A line does not follow `KEY=VALUE` syntax (strict mode only)
    MalformedEntry {
        /// 1-based line number
        line: usize,
        /// The offending line, untrimmed
        content: String,
    },
    /// The configured file does not exist and missing files are not tolerated
    SourceMissing { path: PathBuf },
    /// The file exists but could not be read
    Io { path: PathBuf, message: String },
    /// A typed lookup asked for a key that neither the file nor the host defines
    MissingKey { key: String },
    /// A typed lookup found a value it could not parse
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

impl fmt::Display for DotenvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DotenvError::MalformedEntry { line, content } => {
                write!(
                    f,
                    "Malformed entry at line {}: {}",
                    line.to_string().yellow().bold(),
                    format!("'{}'", content).red()
                )
            }
            DotenvError::SourceMissing { path } => {
                write!(
                    f,
                    "{}: No such file",
                    path.display().to_string().magenta().bold()
                )
            }
            DotenvError::Io { path, message } => {
                write!(
                    f,
                    "{}: Could not be read: {}",
                    path.display().to_string().magenta().bold(),
                    message
                )
            }
            DotenvError::MissingKey { key } => {
                write!(
                    f,
                    "{}: Is missing from the environment and is required",
                    key.magenta().bold()
                )
            }
            DotenvError::InvalidValue {
                key,
                value,
                expected,
            } => {
                writeln!(
                    f,
                    "{}: Invalid value {}",
                    key.magenta().bold(),
                    format!("'{}'", value).red(),
                )?;
                write!(f, "\tExpected: {}", expected.cyan())
            }
        }
    }
}

impl std::error::Error for DotenvError {}

impl DotenvError {
    /// Whether this error came from the parser rather than file access or lookup
    pub fn is_malformed(&self) -> bool {
        matches!(self, DotenvError::MalformedEntry { .. })
    }
}
