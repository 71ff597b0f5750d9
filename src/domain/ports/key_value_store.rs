//! Port abstraction for the persistent key-value store.
//!
//! Models browser-style local storage: string keys mapped to string values,
//! no transactions, last-write-wins. The persistence adapter
//! ([`PortalStorage`](crate::domain::PortalStorage)) owns serialisation and
//! key layout; adapters only move strings.

use thiserror::Error;

/// Errors raised by key-value store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyValueStoreError {
    /// The backing store could not be read or written.
    #[error("key-value store backend failed: {message}")]
    Backend { message: String },
}

impl KeyValueStoreError {
    /// Construct a backend failure from any displayable cause.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Port for string slot storage and retrieval.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;

    /// Remove the value stored under `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError>;
}
