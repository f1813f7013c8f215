//! Quote store and remote-wins merge.
//!
//! # Responsibility
//! - Provide add/list/filter/random-pick operations over owned quotes.
//! - Merge remote snapshots by exact text match, remote category winning.
//!
//! # Invariants
//! - `items` is only mutated through `add`, `merge` and `append_unchecked`.
//! - `merge` never reorders surviving items; new quotes go to the end.
//! - After `merge`, every `text` appears at most once.
//! - Re-applying the same remote snapshot reports nothing.

use crate::model::quote::{CategoryFilter, Quote, QuoteValidationError};
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};

/// One text match whose categories differed before the merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    /// Local quote as it was before the remote category was applied.
    pub local: Quote,
    /// Remote quote that won.
    pub server: Quote,
}

/// Outcome of one merge call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: Vec<Quote>,
    pub conflicts: Vec<MergeConflict>,
    /// True iff `added` or `conflicts` is non-empty.
    pub changed: bool,
}

impl MergeReport {
    fn finish(mut self) -> Self {
        self.changed = !self.added.is_empty() || !self.conflicts.is_empty();
        self
    }
}

/// Owned quote collection plus the current category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteStore {
    items: Vec<Quote>,
    selected: CategoryFilter,
}

impl QuoteStore {
    /// Creates an empty store with the `All` filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted state.
    pub fn from_parts(items: Vec<Quote>, selected: CategoryFilter) -> Self {
        Self { items, selected }
    }

    /// Validates and appends one quote.
    ///
    /// Does not deduplicate: two adds with the same text both land.
    pub fn add(
        &mut self,
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Quote, QuoteValidationError> {
        let quote = Quote::new(text, category)?;
        self.items.push(quote.clone());
        Ok(quote)
    }

    /// Returns all quotes in insertion order.
    pub fn list(&self) -> &[Quote] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns distinct categories in first-appearance order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|quote| seen.insert(quote.category.as_str()))
            .map(|quote| quote.category.clone())
            .collect()
    }

    /// Returns quotes visible under `filter`, preserving insertion order.
    ///
    /// An unknown category yields an empty vector, not an error.
    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.items
            .iter()
            .filter(|quote| filter.matches(quote))
            .cloned()
            .collect()
    }

    /// Uniformly picks one quote from `quotes`.
    pub fn pick_random(quotes: &[Quote]) -> Option<Quote> {
        quotes.choose(&mut rand::thread_rng()).cloned()
    }

    /// Returns the quote to feature for `filter`.
    ///
    /// `All` picks at random over every quote; a concrete category returns its
    /// first quote in insertion order.
    pub fn featured(&self, filter: &CategoryFilter) -> Option<Quote> {
        match filter {
            CategoryFilter::All => Self::pick_random(&self.items),
            CategoryFilter::Category(_) => {
                self.items.iter().find(|quote| filter.matches(quote)).cloned()
            }
        }
    }

    /// Stores the selection without checking it against current categories.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.selected = filter;
    }

    pub fn selected_filter(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Merges a remote snapshot into local items.
    ///
    /// For each remote quote in order: an unknown text is appended and
    /// reported as added; a known text with a different category is reported
    /// as a conflict and takes the remote category; an identical quote is a
    /// no-op. Duplicate texts inside `remote` are collapsed the same way, so
    /// the first occurrence is added and later ones can only conflict.
    ///
    /// Local duplicates left by `add` or `append_unchecked` are collapsed
    /// first, keeping the earliest copy. The report does not list them; the
    /// caller can compare `len()` before and after.
    pub fn merge(&mut self, remote: &[Quote]) -> MergeReport {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items.retain(|quote| seen.insert(quote.text.clone()));

        let mut index_by_text: HashMap<String, usize> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, quote)| (quote.text.clone(), index))
            .collect();

        let mut report = MergeReport::default();
        for incoming in remote {
            match index_by_text.get(incoming.text.as_str()) {
                None => {
                    index_by_text.insert(incoming.text.clone(), self.items.len());
                    self.items.push(incoming.clone());
                    report.added.push(incoming.clone());
                }
                Some(&index) => {
                    let local = &mut self.items[index];
                    if local.category != incoming.category {
                        report.conflicts.push(MergeConflict {
                            local: local.clone(),
                            server: incoming.clone(),
                        });
                        local.category = incoming.category.clone();
                    }
                }
            }
        }

        report.finish()
    }

    /// Appends quotes without dedup or conflict detection.
    ///
    /// Only the legacy append-mode import uses this path.
    pub fn append_unchecked(&mut self, quotes: Vec<Quote>) {
        self.items.extend(quotes);
    }

    /// Replaces items wholesale; used to roll back a failed persisted change.
    pub(crate) fn restore_items(&mut self, items: Vec<Quote>) {
        self.items = items;
    }
}

#[cfg(test)]
mod tests {
    use super::{MergeConflict, QuoteStore};
    use crate::model::quote::{CategoryFilter, Quote};

    fn quote(text: &str, category: &str) -> Quote {
        Quote::new(text, category).unwrap()
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let mut store = QuoteStore::new();
        store.add("a", "Life").unwrap();
        store.add("b", "Work").unwrap();
        store.add("c", "Life").unwrap();
        assert_eq!(store.categories(), vec!["Life", "Work"]);
    }

    #[test]
    fn featured_returns_first_match_for_category() {
        let mut store = QuoteStore::new();
        store.add("a", "Life").unwrap();
        store.add("b", "Work").unwrap();
        store.add("c", "Work").unwrap();

        let featured = store
            .featured(&CategoryFilter::Category("Work".to_string()))
            .expect("work quote");
        assert_eq!(featured.text, "b");
        assert!(store
            .featured(&CategoryFilter::Category("Nope".to_string()))
            .is_none());
    }

    #[test]
    fn featured_all_on_empty_store_is_none() {
        assert!(QuoteStore::new().featured(&CategoryFilter::All).is_none());
    }

    #[test]
    fn merge_collapses_duplicate_remote_texts() {
        let mut store = QuoteStore::new();
        let report = store.merge(&[quote("x", "A"), quote("x", "B")]);

        assert_eq!(report.added, vec![quote("x", "A")]);
        assert_eq!(
            report.conflicts,
            vec![MergeConflict {
                local: quote("x", "A"),
                server: quote("x", "B"),
            }]
        );
        assert_eq!(store.list(), &[quote("x", "B")]);
    }

    #[test]
    fn merge_collapses_local_duplicates_keeping_first() {
        let mut store = QuoteStore::new();
        store.add("x", "A").unwrap();
        store.add("y", "A").unwrap();
        store.add("x", "A").unwrap();

        let report = store.merge(&[quote("x", "B")]);

        assert_eq!(store.list(), &[quote("x", "B"), quote("y", "A")]);
        assert_eq!(report.conflicts.len(), 1);
        assert!(report.added.is_empty());
    }

    #[test]
    fn merge_of_empty_remote_reports_unchanged() {
        let mut store = QuoteStore::new();
        store.add("a", "Life").unwrap();
        let report = store.merge(&[]);
        assert!(!report.changed);
        assert!(report.added.is_empty());
        assert!(report.conflicts.is_empty());
    }

    #[test]
    fn set_filter_accepts_unknown_category() {
        let mut store = QuoteStore::new();
        store.add("a", "Life").unwrap();
        let filter = CategoryFilter::Category("Gone".to_string());
        store.set_filter(filter.clone());
        assert_eq!(store.selected_filter(), &filter);
        assert!(store.filtered(&filter).is_empty());
    }
}
