//! Quote domain model.
//!
//! # Responsibility
//! - Define the text/category record and its validation rules.
//! - Define the category filter selection, including the `all` sentinel.
//! - Provide the default seed set used on first start.
//!
//! # Invariants
//! - `text` and `category` are never blank after construction.
//! - Merge equality is exact `text` equality; category is not part of identity.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted/wire value of the "all categories" filter.
pub const ALL_CATEGORIES: &str = "all";

/// Validation failures for quote construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
    EmptyCategory,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text must not be empty"),
            Self::EmptyCategory => write!(f, "quote category must not be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

/// A short text quote tagged with one category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    /// Creates a validated quote from raw user input.
    ///
    /// Both fields are trimmed before validation and storage.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank.
    /// - `EmptyCategory` when `category` is blank.
    pub fn new(
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Self, QuoteValidationError> {
        let quote = Self {
            text: text.as_ref().trim().to_string(),
            category: category.as_ref().trim().to_string(),
        };
        quote.validate()?;
        Ok(quote)
    }

    /// Checks the non-empty invariant on an already-built quote.
    ///
    /// Used on data that bypassed `new`, such as persisted rows and imports.
    pub fn validate(&self) -> Result<(), QuoteValidationError> {
        if self.text.trim().is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        if self.category.trim().is_empty() {
            return Err(QuoteValidationError::EmptyCategory);
        }
        Ok(())
    }

    /// Returns the single-line display form: `"text" - (category)`.
    pub fn display_line(&self) -> String {
        format!("\"{}\" - ({})", self.text, self.category)
    }
}

/// Current category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Parses a persisted or user-supplied selection.
    ///
    /// `all` (after trimming) and blank input both mean every category. Any
    /// other value is kept as-is, even when no quote currently uses it.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Category(trimmed.to_string())
        }
    }

    /// Returns the persisted string form.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Category(value) => value.as_str(),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Returns whether `quote` is visible under this selection.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Category(value) => quote.category == *value,
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default collection used when nothing has been persisted yet.
pub fn seed_quotes() -> Vec<Quote> {
    [
        (
            "The only way to do great work is to love what you do.",
            "Motivation",
        ),
        (
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        (
            "Success is not the key to happiness. Happiness is the key to success.",
            "Success",
        ),
        ("Don't let yesterday take up too much of today.", "Motivation"),
    ]
    .into_iter()
    .map(|(text, category)| Quote {
        text: text.to_string(),
        category: category.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::{seed_quotes, CategoryFilter, Quote, QuoteValidationError};

    #[test]
    fn new_trims_fields() {
        let quote = Quote::new("  Be kind ", "\tA\n").expect("valid quote");
        assert_eq!(quote.text, "Be kind");
        assert_eq!(quote.category, "A");
    }

    #[test]
    fn new_rejects_blank_fields() {
        assert_eq!(
            Quote::new("   ", "A").unwrap_err(),
            QuoteValidationError::EmptyText
        );
        assert_eq!(
            Quote::new("Be kind", "").unwrap_err(),
            QuoteValidationError::EmptyCategory
        );
    }

    #[test]
    fn filter_parse_maps_sentinel_and_blank_to_all() {
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("  "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse(" Life "),
            CategoryFilter::Category("Life".to_string())
        );
        assert_eq!(CategoryFilter::All.as_str(), "all");
    }

    #[test]
    fn display_line_matches_page_format() {
        let quote = Quote::new("Be kind", "A").unwrap();
        assert_eq!(quote.display_line(), "\"Be kind\" - (A)");
    }

    #[test]
    fn seed_set_is_valid_and_has_four_entries() {
        let seeds = seed_quotes();
        assert_eq!(seeds.len(), 4);
        assert!(seeds.iter().all(|quote| quote.validate().is_ok()));
    }
}
