//! Session tracking and durable session log for Vitalink
//!
//! A session is one bounded interval between the device's greeting and
//! farewell, associated with a named subject. This crate owns the two
//! stateful pieces of the ingestion pipeline:
//!
//! - [`SessionTracker`] — a single-slot state machine for the in-progress
//!   session (a new greeting always wins; a farewell with no session open
//!   is a no-op)
//! - [`SessionStore`] — an append-only JSON log of finalized
//!   [`SessionRecord`]s, rewritten atomically on every append and cached in
//!   memory for reads
//!
//! Both are single-writer by contract: only the ingestion pipeline mutates
//! them. The store hands out snapshots so query handlers never race the
//! writer.

pub mod error;
pub mod models;
pub mod store;
pub mod tracker;

// Re-exports
pub use error::StoreError;
pub use models::SessionRecord;
pub use store::SessionStore;
pub use tracker::{ActiveSession, SessionTracker};
