//! tickstore - a tick-versioned item store
//!
//! Items carry a logical clock value ("tick") that strictly increases with
//! every mutation, so clients can sync incrementally by asking for
//! everything newer than the last tick they saw. State is kept in memory and
//! persisted as a JSON snapshot at orderly shutdown.

pub mod clock;
pub mod error;
pub mod server;
pub mod store;

pub use error::{Result, StoreError};
