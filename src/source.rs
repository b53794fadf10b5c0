use crate::error::DotenvError;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Supplies the raw `.env` text
///
/// `Ok(None)` means the source does not exist; what that implies is up to the
/// caller's [`MissingPolicy`](crate::MissingPolicy).
pub trait TextSource {
    fn read_text(&self) -> Result<Option<String>, DotenvError>;

    /// Where the text is read from, reported when it turns out to be missing
    fn location(&self) -> Option<PathBuf> {
        None
    }
}

impl TextSource for str {
    fn read_text(&self) -> Result<Option<String>, DotenvError> {
        Ok(Some(self.to_string()))
    }
}

impl TextSource for String {
    fn read_text(&self) -> Result<Option<String>, DotenvError> {
        Ok(Some(self.clone()))
    }
}

/// A `.env` file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for FileSource {
    fn read_text(&self) -> Result<Option<String>, DotenvError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DotenvError::Io {
                path: self.path.clone(),
                message: e.to_string(),
            }),
        }
    }

    fn location(&self) -> Option<PathBuf> {
        Some(self.path.clone())
    }
}

/// Join `directory` and `filename`, unless `directory` already names the file
///
/// `resolve_path("/srv/app/.env", ".env")` is `/srv/app/.env`, not
/// `/srv/app/.env/.env`.
pub fn resolve_path(directory: &Path, filename: &str) -> PathBuf {
    if directory.file_name().is_some_and(|name| name == filename) {
        directory.to_path_buf()
    } else {
        directory.join(filename)
    }
}
