//! In-memory quote collection and merge policy.
//!
//! # Responsibility
//! - Own the authoritative ordered quote sequence and filter selection.
//! - Reconcile remote snapshots into local state deterministically.
//!
//! # Invariants
//! - No two quotes share identical `text` once `merge` returns; `add` and
//!   append-mode import may leave duplicates until the next merge.
//! - Insertion order is preserved by every read path.

pub mod quote_store;
