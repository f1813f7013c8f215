//! Quote use-case service.
//!
//! # Responsibility
//! - Bootstrap the store from persisted state or the seed set.
//! - Persist after every mutation and publish a `StoreEvent`.
//! - Apply remote snapshots and bulk imports through one merge policy.
//!
//! # Invariants
//! - A failed save leaves the in-memory store as it was before the call.
//! - Every item mutation starts from the repository's latest snapshot, so a
//!   long-lived service never writes back a stale collection.
//! - Listeners only observe changes that were persisted.
//! - Log events carry counts, never quote text.

use crate::model::quote::{seed_quotes, CategoryFilter, Quote, QuoteValidationError};
use crate::repo::quote_repo::{QuoteRepository, RepoError};
use crate::store::quote_store::{MergeReport, QuoteStore};
use crate::transfer::{export_json, parse_import, FormatError, ImportMode};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for quote use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Blank text or category on add.
    Validation(QuoteValidationError),
    /// Malformed import payload.
    Format(FormatError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Format(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<QuoteValidationError> for ServiceError {
    fn from(value: QuoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<FormatError> for ServiceError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Change notification delivered to presentation listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    QuoteAdded(Quote),
    /// Emitted for every applied remote snapshot, changed or not.
    Merged(MergeReport),
    Imported { mode: ImportMode, added: usize },
    FilterChanged(CategoryFilter),
    /// `None` when the current selection has nothing to show.
    QuoteShown(Option<Quote>),
}

/// Receiver for store change notifications.
pub trait StoreListener: Send {
    fn on_event(&self, event: &StoreEvent);
}

/// Use-case service owning one store and its repository.
pub struct QuoteService<R: QuoteRepository> {
    repo: R,
    store: QuoteStore,
    listeners: Vec<Box<dyn StoreListener>>,
}

impl<R: QuoteRepository> QuoteService<R> {
    /// Loads persisted state, falling back to the seed set and `All` filter.
    ///
    /// Seeds are not written back until the first mutation.
    pub fn bootstrap(repo: R) -> ServiceResult<Self> {
        let (items, source) = match repo.load_quotes()? {
            Some(items) => (items, "persisted"),
            None => (seed_quotes(), "seed"),
        };
        let filter = repo
            .load_filter()?
            .map(|value| CategoryFilter::parse(&value))
            .unwrap_or_default();

        info!(
            "event=store_bootstrap module=service status=ok source={} count={} filter_all={}",
            source,
            items.len(),
            filter.is_all()
        );

        Ok(Self {
            repo,
            store: QuoteStore::from_parts(items, filter),
            listeners: Vec::new(),
        })
    }

    /// Registers a listener for all subsequent change notifications.
    pub fn subscribe(&mut self, listener: Box<dyn StoreListener>) {
        self.listeners.push(listener);
    }

    /// Re-reads items and filter from the repository.
    ///
    /// Keeps the in-memory items when nothing was ever saved, so unsaved
    /// seeds survive.
    pub fn reload(&mut self) -> ServiceResult<()> {
        if let Some(items) = self.repo.load_quotes()? {
            self.store.restore_items(items);
        }
        if let Some(filter) = self.repo.load_filter()? {
            self.store.set_filter(CategoryFilter::parse(&filter));
        }
        debug!(
            "event=store_reload module=service status=ok count={}",
            self.store.len()
        );
        Ok(())
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Validates, appends and persists a new quote.
    pub fn add(&mut self, text: &str, category: &str) -> ServiceResult<Quote> {
        self.reload()?;
        let previous = self.store.list().to_vec();
        let quote = match self.store.add(text, category) {
            Ok(quote) => quote,
            Err(err) => {
                warn!("event=quote_add module=service status=rejected reason={err}");
                return Err(err.into());
            }
        };
        self.persist_items(previous, "quote_add")?;

        info!(
            "event=quote_add module=service status=ok count={}",
            self.store.len()
        );
        self.publish(StoreEvent::QuoteAdded(quote.clone()));
        Ok(quote)
    }

    pub fn list(&self) -> &[Quote] {
        self.store.list()
    }

    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    pub fn filtered(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.store.filtered(filter)
    }

    pub fn selected_filter(&self) -> &CategoryFilter {
        self.store.selected_filter()
    }

    /// Persists and applies a new filter selection.
    pub fn set_filter(&mut self, filter: CategoryFilter) -> ServiceResult<()> {
        self.repo.save_filter(filter.as_str())?;
        self.store.set_filter(filter.clone());
        self.publish(StoreEvent::FilterChanged(filter));
        Ok(())
    }

    /// Picks a random quote within the current filter and remembers it.
    pub fn show_random(&mut self) -> ServiceResult<Option<Quote>> {
        let candidates = self.store.filtered(self.store.selected_filter());
        let picked = QuoteStore::pick_random(&candidates);
        self.remember_shown(picked)
    }

    /// Shows the featured quote for the current filter and remembers it.
    ///
    /// `All` is random; a concrete category shows its first quote.
    pub fn show_featured(&mut self) -> ServiceResult<Option<Quote>> {
        let featured = self.store.featured(self.store.selected_filter());
        self.remember_shown(featured)
    }

    /// Returns the display line of the last shown quote, if any.
    pub fn last_shown(&self) -> ServiceResult<Option<String>> {
        Ok(self.repo.load_last_shown()?)
    }

    /// Merges a remote snapshot and persists when anything changed.
    pub fn apply_remote(&mut self, remote: &[Quote]) -> ServiceResult<MergeReport> {
        self.reload()?;
        let previous = self.store.list().to_vec();
        let report = self.store.merge(remote);
        if report.changed || self.store.len() != previous.len() {
            self.persist_items(previous, "store_merge")?;
        }

        info!(
            "event=store_merge module=service status=ok remote={} added={} conflicts={}",
            remote.len(),
            report.added.len(),
            report.conflicts.len()
        );
        self.publish(StoreEvent::Merged(report.clone()));
        Ok(report)
    }

    /// Imports a bulk JSON payload.
    ///
    /// `Merge` mode returns the merge report. `Append` mode reports every
    /// entry as added and never reports conflicts.
    pub fn import_json(&mut self, payload: &str, mode: ImportMode) -> ServiceResult<MergeReport> {
        let imported = match parse_import(payload) {
            Ok(quotes) => quotes,
            Err(err) => {
                warn!("event=quote_import module=service status=rejected error={err}");
                return Err(err.into());
            }
        };

        self.reload()?;
        let previous = self.store.list().to_vec();
        let report = match mode {
            ImportMode::Merge => self.store.merge(&imported),
            ImportMode::Append => {
                self.store.append_unchecked(imported.clone());
                MergeReport {
                    changed: !imported.is_empty(),
                    added: imported,
                    conflicts: Vec::new(),
                }
            }
        };
        if report.changed || self.store.len() != previous.len() {
            self.persist_items(previous, "quote_import")?;
        }

        info!(
            "event=quote_import module=service status=ok mode={:?} added={} conflicts={}",
            mode,
            report.added.len(),
            report.conflicts.len()
        );
        self.publish(StoreEvent::Imported {
            mode,
            added: report.added.len(),
        });
        Ok(report)
    }

    /// Exports every quote in the bulk JSON format.
    pub fn export_json(&self) -> ServiceResult<String> {
        Ok(export_json(self.store.list())?)
    }

    fn remember_shown(&mut self, quote: Option<Quote>) -> ServiceResult<Option<Quote>> {
        if let Some(quote) = &quote {
            self.repo.save_last_shown(&quote.display_line())?;
        }
        self.publish(StoreEvent::QuoteShown(quote.clone()));
        Ok(quote)
    }

    fn persist_items(&mut self, previous: Vec<Quote>, event: &str) -> ServiceResult<()> {
        if let Err(err) = self.repo.save_quotes(self.store.list()) {
            self.store.restore_items(previous);
            error!("event={event} module=service status=error error_code=save_failed error={err}");
            return Err(err.into());
        }
        Ok(())
    }

    fn publish(&self, event: StoreEvent) {
        for listener in &self.listeners {
            listener.on_event(&event);
        }
    }
}
