pub mod entry;
pub mod error;
pub mod loader;
pub mod parser;
pub mod policy;
pub mod reader;
pub mod source;
pub mod store;

// Re-export main types
pub use entry::Entry;
pub use error::DotenvError;
pub use loader::{dotenv, load, load_from, DotenvConfig};
pub use parser::{classify, parse, parse_line, LineKind};
pub use policy::{MissingPolicy, ParseMode};
pub use reader::{format_errors, FieldReader};
pub use source::{resolve_path, FileSource, TextSource};
pub use store::{host_env, Entries, Store};

// Re-export macro
pub use envstore_macros::define_config;

/// Trait for building typed configuration out of a loaded [`Store`]
pub trait FromStore: Sized {
    /// Read every field, returning all errors at once
    fn from_store(store: &Store) -> Result<Self, Vec<DotenvError>>;

    /// Read every field, panicking with a formatted report on errors
    fn from_store_or_panic(store: &Store) -> Self {
        match Self::from_store(store) {
            Ok(config) => config,
            Err(errors) => panic!("{}", format_errors(&errors)),
        }
    }
}
