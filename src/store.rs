use crate::{entry::Entry, error::DotenvError};
use indexmap::{map, IndexMap, IndexSet};
use std::{any::type_name, env, str::FromStr};

/// Snapshot of the host process environment, in host-reported order
///
/// Variables whose name or value is not valid Unicode are skipped.
pub fn host_env() -> IndexMap<String, String> {
    env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}

/// Immutable merge of parsed `.env` entries over a host environment snapshot
///
/// File values win over host values sharing the same key. Iteration order is
/// the host order followed by keys first seen in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Store {
    vars: IndexMap<String, String>,
    file_keys: IndexSet<String>,
}

impl Store {
    /// Layer `entries` over `host`; later entries overwrite earlier ones
    pub fn build(entries: impl IntoIterator<Item = Entry>, host: IndexMap<String, String>) -> Self {
        let mut vars = host;
        let mut file_keys = IndexSet::new();

        for entry in entries {
            let (key, value) = entry.into_parts();
            file_keys.insert(key.clone());
            vars.insert(key, value);
        }

        Self { vars, file_keys }
    }

    /// Build from file entries alone, without any host variables
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        Self::build(entries, IndexMap::new())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Look up `key`, falling back to `default` when neither source defines it
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Whether the value for `key` was defined by the `.env` file
    pub fn is_from_file(&self, key: &str) -> bool {
        self.file_keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Every variable in the store as an [`Entry`], in store order
    ///
    /// The returned iterator is `Clone`, and each call starts from the
    /// beginning.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            inner: self.vars.iter(),
        }
    }

    /// Only the entries defined by the `.env` file, in store order
    pub fn file_entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.entries().filter(|entry| self.is_from_file(entry.key()))
    }

    /// Parse the value for `key` into `T`
    pub fn parse<T: FromStr>(&self, key: &str) -> Result<T, DotenvError> {
        let value = self.get(key).ok_or_else(|| DotenvError::MissingKey {
            key: key.to_string(),
        })?;

        value.parse().map_err(|_| DotenvError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: type_name::<T>().to_string(),
        })
    }

    /// Parse the value for `key`, using `default` only when the key is absent
    ///
    /// A present but unparsable value is still an error.
    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, DotenvError> {
        match self.parse(key) {
            Ok(value) => Ok(value),
            Err(DotenvError::MissingKey { .. }) => Ok(default),
            Err(e) => Err(e),
        }
    }

    /// Parse the value for `key`, returning `Ok(None)` when the key is absent
    pub fn parse_opt<T: FromStr>(&self, key: &str) -> Result<Option<T>, DotenvError> {
        match self.parse(key) {
            Ok(value) => Ok(Some(value)),
            Err(DotenvError::MissingKey { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a process environment variable for every entry in the store
    ///
    /// This mutates process-wide state and is not synchronised. Callers that
    /// export from several threads, or read the environment concurrently,
    /// must serialise those accesses themselves.
    pub fn export(&self) {
        for (key, value) in &self.vars {
            env::set_var(key, value);
        }
        tracing::debug!(count = self.vars.len(), "exported variables to process environment");
    }
}

/// Iterator returned by [`Store::entries`]
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: map::Iter<'a, String, String>,
}

impl Iterator for Entries<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(key, value)| Entry::new(key.as_str(), value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl<'a> IntoIterator for &'a Store {
    type Item = Entry;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_file_overrides_host() {
        let store = Store::build(
            vec![Entry::new("HOME", "/from/file")],
            host(&[("HOME", "/home/user"), ("SHELL", "/bin/sh")]),
        );

        assert_eq!(store.get("HOME"), Some("/from/file"));
        assert_eq!(store.get("SHELL"), Some("/bin/sh"));
        assert!(store.is_from_file("HOME"));
        assert!(!store.is_from_file("SHELL"));
    }

    #[test]
    fn test_host_only_keys_retrievable() {
        let store = Store::build(Vec::new(), host(&[("HOME", "/home/user")]));

        assert_eq!(store.get("HOME"), Some("/home/user"));
        assert_eq!(store.get("MY_TEST_EV1"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let store = Store::from_entries(vec![
            Entry::new("KEY", "first"),
            Entry::new("OTHER", "x"),
            Entry::new("KEY", "second"),
        ]);

        assert_eq!(store.get("KEY"), Some("second"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_or_default() {
        let store = Store::from_entries(vec![Entry::new("EMPTY", "")]);

        assert_eq!(store.get_or("UNDEFINED_KEY", "fallback"), "fallback");
        assert_eq!(store.get_or("EMPTY", "fallback"), "");
    }

    #[test]
    fn test_entries_order() {
        let store = Store::build(
            vec![Entry::new("FILE_B", "2"), Entry::new("HOST_A", "file"), Entry::new("FILE_C", "3")],
            host(&[("HOST_A", "host"), ("HOST_B", "host")]),
        );

        let rendered: Vec<String> = store.entries().map(|e| e.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["HOST_A=file", "HOST_B=host", "FILE_B=2", "FILE_C=3"]
        );
    }

    #[test]
    fn test_entries_restartable() {
        let store = Store::from_entries(vec![Entry::new("A", "1"), Entry::new("B", "2")]);

        let first: Vec<Entry> = store.entries().collect();
        let second: Vec<Entry> = store.entries().collect();
        assert_eq!(first, second);

        let iter = store.entries();
        let cloned = iter.clone();
        assert_eq!(iter.count(), 2);
        assert_eq!(cloned.len(), 2);
    }

    #[test]
    fn test_entries_agree_with_get() {
        let store = Store::build(vec![Entry::new("X", "1")], host(&[("Y", "2")]));

        for entry in &store {
            assert_eq!(store.get(entry.key()), Some(entry.value()));
        }
    }

    #[test]
    fn test_file_entries() {
        let store = Store::build(
            vec![Entry::new("FROM_FILE", "1")],
            host(&[("FROM_HOST", "2")]),
        );

        let keys: Vec<String> = store.file_entries().map(|e| e.key().to_string()).collect();
        assert_eq!(keys, vec!["FROM_FILE"]);
    }

    #[test]
    fn test_parse_typed() {
        let store = Store::from_entries(vec![
            Entry::new("PORT", "8080"),
            Entry::new("DEBUG", "true"),
            Entry::new("BAD_PORT", "eighty"),
        ]);

        assert_eq!(store.parse::<u16>("PORT"), Ok(8080));
        assert_eq!(store.parse::<bool>("DEBUG"), Ok(true));
        assert_eq!(
            store.parse::<u16>("MISSING"),
            Err(DotenvError::MissingKey {
                key: "MISSING".to_string()
            })
        );
        assert!(matches!(
            store.parse::<u16>("BAD_PORT"),
            Err(DotenvError::InvalidValue { ref value, .. }) if value == "eighty"
        ));
    }

    #[test]
    fn test_parse_or_and_opt() {
        let store = Store::from_entries(vec![Entry::new("BAD", "x")]);

        assert_eq!(store.parse_or("MISSING", 42u32), Ok(42));
        assert!(store.parse_or("BAD", 42u32).is_err());
        assert_eq!(store.parse_opt::<u32>("MISSING"), Ok(None));
        assert!(store.parse_opt::<u32>("BAD").is_err());
    }

    #[test]
    fn test_empty_store() {
        let store = Store::default();
        assert!(store.is_empty());
        assert_eq!(store.entries().count(), 0);
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Store>();
    }
}
