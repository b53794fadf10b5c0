//! Line-oriented `.env` parser
//!
//! Each line is one of: blank, a `#` comment, `KEY=VALUE`, or malformed.
//! Keys follow `[A-Za-z_][A-Za-z0-9_]*`. Values are trimmed, may be empty,
//! may contain `=`, and lose one pair of matching outer quotes. Escape
//! sequences are never interpreted.

use crate::{entry::Entry, error::DotenvError, policy::ParseMode};

/// Classification of a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Entry(Entry),
    Malformed,
}

/// Parse `.env` text into entries, in file order
///
/// Repeated keys are all returned; the later one wins once the entries are
/// placed in a [`Store`](crate::Store).
///
/// # Example
/// ```rust
/// use envstore::{parse, ParseMode};
///
/// let entries = parse("# db\nDB_URL=\"postgres://localhost\"\n", ParseMode::Strict).unwrap();
/// assert_eq!(entries[0].value(), "postgres://localhost");
/// ```
pub fn parse(text: &str, mode: ParseMode) -> Result<Vec<Entry>, DotenvError> {
    let mut entries = Vec::new();

    for (line_number, line, kind) in classify(text) {
        match kind {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Entry(entry) => entries.push(entry),
            LineKind::Malformed => match mode {
                ParseMode::Strict => {
                    return Err(DotenvError::MalformedEntry {
                        line: line_number,
                        content: line.to_string(),
                    });
                }
                ParseMode::Permissive => {
                    tracing::debug!(line = line_number, "skipping malformed line");
                }
            },
        }
    }

    Ok(entries)
}

/// Classify every line of `text`, yielding `(line_number, line, kind)`
///
/// Line numbers are 1-based. A leading UTF-8 byte order mark is dropped.
pub fn classify(text: &str) -> impl Iterator<Item = (usize, &str, LineKind)> + '_ {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line, parse_line(line)))
}

/// Classify one line without any surrounding context
pub fn parse_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('#') {
        return LineKind::Comment;
    }

    let Some((key, value)) = trimmed.split_once('=') else {
        return LineKind::Malformed;
    };

    let key = key.trim();
    if !is_valid_key(key) {
        return LineKind::Malformed;
    }

    match unquote(value.trim()) {
        Some(value) => LineKind::Entry(Entry::new(key, value)),
        None => LineKind::Malformed,
    }
}

/// ASCII identifier check: `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Strip one pair of matching outer quotes
///
/// Returns `None` when the value opens a quote it never closes.
fn unquote(value: &str) -> Option<&str> {
    let Some(quote) = value.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return Some(value);
    };

    if value.len() >= 2 && value.ends_with(quote) {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}
