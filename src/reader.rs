use crate::{error::DotenvError, store::Store};
use colored::Colorize;
use std::str::FromStr;

/// Helper to format multiple errors into a single report
pub fn format_errors(errors: &[DotenvError]) -> String {
    let error_summary = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Configuration failed with {} error(s):\n{}",
        errors.len().to_string().yellow().bold(),
        error_summary
    )
}

/// Reads typed fields out of a [`Store`], collecting every error instead of
/// stopping at the first one
///
/// # Example
/// ```rust
/// use envstore::{Entry, FieldReader, Store};
///
/// let store = Store::from_entries(vec![Entry::new("PORT", "8080")]);
/// let mut reader = FieldReader::new(&store);
/// let port = reader.required::<u16>("PORT");
///
/// assert!(reader.finish().is_ok());
/// assert_eq!(port, Some(8080));
/// ```
pub struct FieldReader<'a> {
    store: &'a Store,
    errors: Vec<DotenvError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            errors: Vec::new(),
        }
    }

    /// Read a field that must be present and parse
    pub fn required<T: FromStr>(&mut self, key: &str) -> Option<T> {
        let result = self.store.parse(key);
        self.collect(result)
    }

    /// Read a field, falling back to `default` if it is missing
    ///
    /// Returns None and records the error if the value exists but is invalid.
    pub fn or_default<T: FromStr>(&mut self, key: &str, default: T) -> Option<T> {
        let result = self.store.parse_or(key, default);
        self.collect(result)
    }

    /// Read a field that may be absent
    ///
    /// Records an error if the value exists but cannot be parsed.
    pub fn optional<T: FromStr>(&mut self, key: &str) -> Option<T> {
        let result = self.store.parse_opt(key);
        self.collect(result).flatten()
    }

    pub fn errors(&self) -> &[DotenvError] {
        &self.errors
    }

    /// Return every error collected so far
    pub fn finish(self) -> Result<(), Vec<DotenvError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn collect<T>(&mut self, result: Result<T, DotenvError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;

    fn store() -> Store {
        Store::from_entries(vec![
            Entry::new("PORT", "8080"),
            Entry::new("HOST", "localhost"),
            Entry::new("BAD_INT", "forty-two"),
        ])
    }

    #[test]
    fn test_reader_finish_with_no_errors() {
        let store = store();
        let mut reader = FieldReader::new(&store);

        assert_eq!(reader.required::<u16>("PORT"), Some(8080));
        assert_eq!(reader.required::<String>("HOST"), Some("localhost".to_string()));
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn test_reader_collects_multiple_errors() {
        let store = store();
        let mut reader = FieldReader::new(&store);

        assert_eq!(reader.required::<u16>("MISSING"), None);
        assert_eq!(reader.required::<i32>("BAD_INT"), None);

        let errors = reader.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], DotenvError::MissingKey { .. }));
        assert!(matches!(errors[1], DotenvError::InvalidValue { .. }));
    }

    #[test]
    fn test_or_default() {
        let store = store();
        let mut reader = FieldReader::new(&store);

        assert_eq!(reader.or_default("TIMEOUT", 30u64), Some(30));
        assert_eq!(reader.or_default("PORT", 1u16), Some(8080));
        assert_eq!(reader.errors().len(), 0);

        assert_eq!(reader.or_default("BAD_INT", 0i32), None);
        assert_eq!(reader.errors().len(), 1);
    }

    #[test]
    fn test_optional() {
        let store = store();
        let mut reader = FieldReader::new(&store);

        assert_eq!(reader.optional::<String>("NOT_SET"), None);
        assert_eq!(reader.optional::<u16>("PORT"), Some(8080));
        assert!(reader.errors().is_empty());

        assert_eq!(reader.optional::<i32>("BAD_INT"), None);
        assert_eq!(reader.errors().len(), 1);
    }

    #[test]
    fn test_format_errors_single() {
        colored::control::set_override(false);

        let errors = vec![DotenvError::MissingKey {
            key: "TEST_VAR".to_string(),
        }];

        let formatted = format_errors(&errors);
        assert!(formatted.contains("Configuration failed with 1 error(s)"));
        assert!(formatted.contains("TEST_VAR"));
    }

    #[test]
    fn test_format_errors_multiple() {
        colored::control::set_override(false);

        let errors = vec![
            DotenvError::MissingKey {
                key: "VAR1".to_string(),
            },
            DotenvError::InvalidValue {
                key: "VAR2".to_string(),
                value: "bad".to_string(),
                expected: "u16".to_string(),
            },
        ];

        let formatted = format_errors(&errors);
        assert!(formatted.contains("Configuration failed with 2 error(s)"));
        assert!(formatted.contains("VAR1"));
        assert!(formatted.contains("VAR2"));
    }
}
