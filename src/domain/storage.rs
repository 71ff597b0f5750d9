//! Persistence adapter: whole-document load/save plus the two string slots.
//!
//! Three well-known keys, mirroring the document/token/pending-verification
//! split of the persisted state. Saves are best effort: a failed write is
//! logged and otherwise ignored, and a missing or malformed document is
//! replaced by the seed document without surfacing an error to callers.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::account::EmailAddress;
use crate::domain::document::PortalDocument;
use crate::domain::ports::KeyValueStore;

/// Storage key holding the serialised [`PortalDocument`].
pub const DOCUMENT_KEY: &str = "staffdesk/document";
/// Storage key holding the pending-verification email.
pub const PENDING_VERIFICATION_KEY: &str = "staffdesk/pending-verification";
/// Storage key holding the auth token (the logged-in account's email).
pub const AUTH_TOKEN_KEY: &str = "staffdesk/auth-token";

/// Handle over the key-value port owning serialisation and key layout.
#[derive(Debug)]
pub struct PortalStorage<S> {
    store: Arc<S>,
}

impl<S> Clone for PortalStorage<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> PortalStorage<S> {
    /// Wrap a key-value store adapter.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Load the persisted document, reseeding when it is absent, unreadable,
    /// or malformed. Recovery is silent apart from a log line; callers always
    /// receive a usable document.
    pub fn load_or_seed(&self) -> PortalDocument {
        match self.store.get(DOCUMENT_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(document) => return document,
                Err(error) => {
                    warn!(%error, "persisted document is malformed; reseeding");
                }
            },
            Ok(None) => {
                debug!("no persisted document found; seeding defaults");
            }
            Err(error) => {
                warn!(%error, "persisted document is unreadable; reseeding");
            }
        }
        let seeded = PortalDocument::seed();
        self.save(&seeded);
        seeded
    }

    /// Persist the whole document under [`DOCUMENT_KEY`]. Best effort:
    /// failures are logged, never propagated.
    pub fn save(&self, document: &PortalDocument) {
        let raw = match serde_json::to_string(document) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "document serialisation failed; save skipped");
                return;
            }
        };
        if let Err(error) = self.store.put(DOCUMENT_KEY, &raw) {
            warn!(%error, "document save failed");
        }
    }

    /// The persisted auth token, if any.
    pub fn auth_token(&self) -> Option<String> {
        self.read_slot(AUTH_TOKEN_KEY)
    }

    /// Persist the auth token for cross-restart session restoration.
    pub fn set_auth_token(&self, email: &EmailAddress) {
        self.write_slot(AUTH_TOKEN_KEY, email.as_str());
    }

    /// Drop the persisted auth token.
    pub fn clear_auth_token(&self) {
        self.clear_slot(AUTH_TOKEN_KEY);
    }

    /// The email awaiting verification, if any.
    pub fn pending_verification(&self) -> Option<String> {
        self.read_slot(PENDING_VERIFICATION_KEY)
    }

    /// Record the email awaiting verification, replacing any previous one.
    pub fn set_pending_verification(&self, email: &EmailAddress) {
        self.write_slot(PENDING_VERIFICATION_KEY, email.as_str());
    }

    /// Clear the pending-verification marker.
    pub fn clear_pending_verification(&self) {
        self.clear_slot(PENDING_VERIFICATION_KEY);
    }

    fn read_slot(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, key, "slot read failed");
                None
            }
        }
    }

    fn write_slot(&self, key: &str, value: &str) {
        if let Err(error) = self.store.put(key, value) {
            warn!(%error, key, "slot write failed");
        }
    }

    fn clear_slot(&self, key: &str) {
        if let Err(error) = self.store.remove(key) {
            warn!(%error, key, "slot clear failed");
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{KeyValueStoreError, MockKeyValueStore};
    use crate::outbound::persistence::MemoryKeyValueStore;

    fn storage() -> PortalStorage<MemoryKeyValueStore> {
        PortalStorage::new(Arc::new(MemoryKeyValueStore::new()))
    }

    #[test]
    fn missing_document_is_seeded_and_persisted() {
        let storage = storage();
        let document = storage.load_or_seed();
        assert_eq!(document.accounts.len(), 1);
        // A second load returns the persisted copy, not a new seed.
        assert_eq!(storage.load_or_seed(), document);
    }

    #[test]
    fn malformed_document_is_replaced_by_the_seed() {
        let storage = storage();
        storage
            .store
            .put(DOCUMENT_KEY, "{not json")
            .expect("memory put");
        let document = storage.load_or_seed();
        assert_eq!(document.accounts.len(), 1);
        assert!(document.accounts.iter().all(|account| account.verified));
    }

    #[test]
    fn save_then_load_round_trips_unchanged() {
        let storage = storage();
        let document = PortalDocument::seed();
        storage.save(&document);
        assert_eq!(storage.load_or_seed(), document);
    }

    #[test]
    fn token_slot_set_read_clear() {
        let storage = storage();
        assert_eq!(storage.auth_token(), None);
        let email = EmailAddress::parse("ann@x.com").expect("valid email");
        storage.set_auth_token(&email);
        assert_eq!(storage.auth_token().as_deref(), Some("ann@x.com"));
        storage.clear_auth_token();
        assert_eq!(storage.auth_token(), None);
    }

    #[test]
    fn unreadable_backend_reseeds_without_panicking() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .returning(|_| Err(KeyValueStoreError::backend("simulated failure")));
        store.expect_put().returning(|_, _| Ok(()));
        let storage = PortalStorage::new(Arc::new(store));
        let document = storage.load_or_seed();
        assert_eq!(document.accounts.len(), 1);
    }

    #[test]
    fn failed_save_is_swallowed() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_put()
            .returning(|_, _| Err(KeyValueStoreError::backend("simulated failure")));
        let storage = PortalStorage::new(Arc::new(store));
        storage.save(&PortalDocument::seed());
    }
}
