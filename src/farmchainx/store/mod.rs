//! # Storage Layer
//!
//! Durable state for every dashboard lives behind the [`KeyValueStore`] trait: a flat
//! namespace of string keys holding JSON text. This mirrors the browser storage the
//! dashboards were designed around, and keeps [`RecordStore`](crate::record_store::RecordStore)
//! unaware of where its bytes end up.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage
//!   - One file per key: `<data dir>/<key>.json`
//!   - Writes go to a temp file first and are renamed into place
//!
//! - [`memory::MemStore`]: In-memory storage for testing
//!   - No persistence
//!   - Can simulate write failures and corrupt values
//!
//! ## Key Layout
//!
//! Each role owns a namespace and three keys under it:
//! ```text
//! <namespace>_records_v1   # JSON array of records, newest first
//! <namespace>_log_v1       # JSON array of update-log strings, newest first
//! <namespace>_seq_v1       # last id number handed out
//! ```
//!
//! Values are untyped beyond the `v1` suffix. Readers that find a value they cannot
//! decode fall back to seed data instead of failing.

use crate::error::Result;

pub mod fs;
pub mod memory;

/// Abstract interface for durable key-value storage.
///
/// Methods take `&self`; implementations that need mutation use interior
/// mutability, which lets several role stores share one backend.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    /// Returns `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
