use crate::{
    error::DotenvError,
    parser::parse,
    policy::{MissingPolicy, ParseMode},
    source::{resolve_path, FileSource, TextSource},
    store::{host_env, Store},
};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Where to find the `.env` file and how to react to problems with it
///
/// # Example
/// ```no_run
/// use envstore::{load, DotenvConfig};
///
/// let config = DotenvConfig::default()
///     .with_directory("./config")
///     .ignore_malformed();
/// let store = load(&config).unwrap();
/// println!("{}", store.get_or("PORT", "8080"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DotenvConfig {
    /// Directory containing the file, or the file path itself
    pub directory: PathBuf,
    /// File name inside `directory`
    pub filename: String,
    pub on_malformed: ParseMode,
    pub on_missing: MissingPolicy,
    /// Copy every loaded variable into the process environment
    pub export: bool,
}

impl Default for DotenvConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            filename: ".env".to_string(),
            on_malformed: ParseMode::Strict,
            on_missing: MissingPolicy::Fail,
            export: false,
        }
    }
}

impl DotenvConfig {
    pub fn with_directory(self, directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..self
        }
    }

    pub fn with_filename(self, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..self
        }
    }

    pub fn ignore_malformed(self) -> Self {
        Self {
            on_malformed: ParseMode::Permissive,
            ..self
        }
    }

    pub fn ignore_missing(self) -> Self {
        Self {
            on_missing: MissingPolicy::Ignore,
            ..self
        }
    }

    pub fn exporting(self) -> Self {
        Self {
            export: true,
            ..self
        }
    }

    /// Resolved location of the `.env` file
    pub fn path(&self) -> PathBuf {
        resolve_path(&self.directory, &self.filename)
    }
}

/// Load `.env` from the current directory with default settings
pub fn dotenv() -> Result<Store, DotenvError> {
    load(&DotenvConfig::default())
}

/// Read, parse and merge the configured file over the current host environment
pub fn load(config: &DotenvConfig) -> Result<Store, DotenvError> {
    let path = config.path();
    tracing::debug!(path = %path.display(), "loading dotenv file");
    load_from(config, &FileSource::new(path), host_env())
}

/// Same pipeline as [`load`] with the text source and host snapshot supplied
///
/// A missing source is reported at [`TextSource::location`], falling back to
/// `config.path()` for sources without one.
pub fn load_from<S: TextSource + ?Sized>(
    config: &DotenvConfig,
    source: &S,
    host: IndexMap<String, String>,
) -> Result<Store, DotenvError> {
    let entries = match source.read_text()? {
        Some(text) => parse(&text, config.on_malformed)?,
        None if config.on_missing.is_ignore() => {
            tracing::debug!("dotenv file not found, using host environment only");
            Vec::new()
        }
        None => {
            return Err(DotenvError::SourceMissing {
                path: source.location().unwrap_or_else(|| config.path()),
            });
        }
    };

    tracing::trace!(count = entries.len(), "parsed dotenv entries");
    let store = Store::build(entries, host);

    if config.export {
        store.export();
    }

    Ok(store)
}
