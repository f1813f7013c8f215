//! Bulk JSON export/import format.
//!
//! # Responsibility
//! - Serialize quotes as a UTF-8 JSON array of `{text, category}` objects.
//! - Parse import payloads all-or-nothing.
//!
//! # Invariants
//! - A rejected payload never yields a partial quote list.

use crate::model::quote::{Quote, QuoteValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How imported quotes are applied to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Route through the store merge: dedup by text, remote category wins.
    #[default]
    Merge,
    /// Append every entry as-is, duplicates included.
    Append,
}

/// Malformed bulk payload.
#[derive(Debug)]
pub enum FormatError {
    Json(serde_json::Error),
    InvalidEntry {
        index: usize,
        reason: QuoteValidationError,
    },
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid quote JSON: {err}"),
            Self::InvalidEntry { index, reason } => {
                write!(f, "invalid quote at index {index}: {reason}")
            }
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidEntry { reason, .. } => Some(reason),
        }
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes quotes as a pretty-printed JSON array.
pub fn export_json(quotes: &[Quote]) -> Result<String, FormatError> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

/// Parses an import payload.
///
/// Entries are trimmed the same way `Quote::new` trims user input.
///
/// # Errors
/// - `Json` when the payload is not a JSON array of `{text, category}`.
/// - `InvalidEntry` when any entry has a blank field.
pub fn parse_import(payload: &str) -> Result<Vec<Quote>, FormatError> {
    let raw: Vec<Quote> = serde_json::from_str(payload)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            Quote::new(&entry.text, &entry.category)
                .map_err(|reason| FormatError::InvalidEntry { index, reason })
        })
        .collect()
}
