//! Item store for tickstore.
//!
//! All state lives in memory and is persisted as a single JSON snapshot:
//! loaded at startup (or empty if missing/corrupt) and written once at
//! orderly shutdown.
//!
//! # Example
//!
//! ```ignore
//! use tickstore::store::SharedStore;
//!
//! let store = SharedStore::open("/tmp/todosrv.json");
//! let item = store.create("buy milk")?;
//! let changed = store.after(0)?;
//! store.shutdown()?;
//! ```

mod item_store;
mod records;
mod shared;
pub mod snapshot;

pub use item_store::ItemStore;
pub use records::{Item, ItemMap, Snapshot};
pub use shared::SharedStore;
