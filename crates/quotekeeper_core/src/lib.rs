//! Core quote keeping logic for quotekeeper.
//! This crate owns the quote store invariants and the remote merge policy.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;
pub mod sync;
pub mod transfer;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::quote::{seed_quotes, CategoryFilter, Quote, QuoteValidationError, ALL_CATEGORIES};
pub use repo::quote_repo::{
    MemoryQuoteRepository, QuoteRepository, RepoError, RepoResult, SqliteQuoteRepository,
};
pub use service::quote_service::{
    QuoteService, ServiceError, ServiceResult, StoreEvent, StoreListener,
};
pub use store::quote_store::{MergeConflict, MergeReport, QuoteStore};
pub use sync::config::SyncConfig;
pub use sync::reconciler::{share, SharedQuoteService, SyncError, SyncReconciler};
pub use sync::scheduler::{SyncScheduler, SyncStatus};
pub use sync::transport::{HttpQuoteTransport, QuoteTransport, TransportError};
pub use transfer::{export_json, parse_import, FormatError, ImportMode};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
