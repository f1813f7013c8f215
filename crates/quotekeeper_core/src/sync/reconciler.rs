//! Single-flight sync against a shared quote service.
//!
//! # Invariants
//! - At most one `sync_once` per shared store is in progress at any time.
//! - The service lock is never held across the transport await.

use crate::repo::quote_repo::QuoteRepository;
use crate::service::quote_service::{QuoteService, ServiceError};
use crate::store::quote_store::MergeReport;
use crate::sync::transport::{QuoteTransport, TransportError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, LockResult, Mutex, MutexGuard};
use std::time::Instant;

/// Quote service shared between the presentation layer and sync tasks.
///
/// Carries the store's sync flight guard, so single-flight holds per store
/// no matter how many reconcilers or schedulers point at it.
pub struct SharedQuoteService<R: QuoteRepository> {
    service: Mutex<QuoteService<R>>,
    sync_flight: tokio::sync::Mutex<()>,
}

impl<R: QuoteRepository> SharedQuoteService<R> {
    pub fn new(service: QuoteService<R>) -> Self {
        Self {
            service: Mutex::new(service),
            sync_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Locks the service for synchronous use. Never hold this across an await.
    pub fn lock(&self) -> LockResult<MutexGuard<'_, QuoteService<R>>> {
        self.service.lock()
    }

    /// Returns whether a sync against this store is currently running.
    pub fn is_syncing(&self) -> bool {
        self.sync_flight.try_lock().is_err()
    }
}

/// Wraps a service for sharing with sync tasks.
pub fn share<R: QuoteRepository>(service: QuoteService<R>) -> Arc<SharedQuoteService<R>> {
    Arc::new(SharedQuoteService::new(service))
}

/// Sync attempt failures. None of them leave partial state behind.
#[derive(Debug)]
pub enum SyncError {
    /// Another sync on the same store has not finished yet.
    InFlight,
    Transport(TransportError),
    Service(ServiceError),
    /// A previous holder of the service lock panicked.
    StatePoisoned,
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InFlight => write!(f, "a sync is already in progress"),
            Self::Transport(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::StatePoisoned => write!(f, "quote service state is poisoned"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::InFlight | Self::StatePoisoned => None,
        }
    }
}

impl From<TransportError> for SyncError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<ServiceError> for SyncError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// Applies remote snapshots to a shared quote service.
///
/// Holds no state; the in-flight guard lives on `SharedQuoteService`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncReconciler;

impl SyncReconciler {
    pub fn new() -> Self {
        Self
    }

    /// Fetches one remote snapshot and merges it into `shared`.
    ///
    /// Returns the service merge report unchanged.
    ///
    /// # Errors
    /// - `InFlight` when another sync on the same store has not completed;
    ///   nothing is fetched.
    /// - `Transport` when the fetch fails; the store is untouched.
    /// - `Service` when persisting the merged state fails; the store is
    ///   rolled back by the service.
    pub async fn sync_once<T, R>(
        &self,
        transport: &T,
        shared: &SharedQuoteService<R>,
    ) -> Result<MergeReport, SyncError>
    where
        T: QuoteTransport + ?Sized,
        R: QuoteRepository,
    {
        let _flight = shared.sync_flight.try_lock().map_err(|_| {
            info!("event=sync_run module=sync status=skipped reason=in_flight");
            SyncError::InFlight
        })?;
        let started_at = Instant::now();

        let remote = match transport.fetch_remote_quotes().await {
            Ok(remote) => remote,
            Err(err) => {
                warn!(
                    "event=sync_run module=sync status=error duration_ms={} error_code=transport error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let report = {
            let mut guard = shared.lock().map_err(|_| SyncError::StatePoisoned)?;
            guard.apply_remote(&remote)?
        };

        info!(
            "event=sync_run module=sync status=ok duration_ms={} added={} conflicts={}",
            started_at.elapsed().as_millis(),
            report.added.len(),
            report.conflicts.len()
        );
        Ok(report)
    }
}
