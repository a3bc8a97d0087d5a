//! The anchorage sync core.
//!
//! One sync call runs push (client changes merged with last-write-wins on
//! `updated_at`), then pull (server deltas since the device's last sync),
//! then cursor advancement — all inside a single transaction, so the
//! returned `lastSyncAt` reflects exactly the mutations concurrent readers
//! can already see.
//!
//! Every data access goes through [`store::Store`], which cannot be asked
//! for a query that does not bind the tenant.

pub mod db;
pub mod engine;
pub mod error;
pub mod store;
pub mod testing;
pub mod time;

mod cursor;
mod merge;
mod pull;

pub use engine::{device_status, parse_envelope, run_sync, AuthContext, MAX_SYNC_BODY_BYTES};
pub use error::SyncError;
