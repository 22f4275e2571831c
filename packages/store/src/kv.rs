//! # KeyValueStore: the persistence seam under the session
//!
//! Everything the client keeps between launches is a handful of string values
//! addressed by well-known keys (see [`crate::session`]). The trait below is the
//! only thing [`crate::SessionStore`] knows about storage, so the same session
//! logic runs against the in-memory store in tests and the filesystem store on
//! device.
//!
//! | Implementation | Backing | Used by |
//! |----------------|---------|---------|
//! | [`crate::MemoryStore`] | `HashMap` behind a mutex | tests, throwaway sessions |
//! | [`crate::FileStore`] | one file per key | the `garrison` binary |
//!
//! Reads of a key that was never written return `Ok(None)`, not an error.
//! `remove` on a missing key succeeds.

use crate::error::StoreError;

/// Async string key-value storage.
pub trait KeyValueStore {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>>;
    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}
