//! Session token and its durable store.
//!
//! At most one token exists per storage directory. No token means the
//! client is anonymous.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::storage::{Storage, keys};

/// Opaque bearer credential issued by sign-in or sign-up.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for the `Authorization` header and storage only.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for SessionToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Durable accessors for the session token.
///
/// Never fails: storage errors are logged and treated as "no token".
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Create a token store over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// The stored token, if any. Blank values count as absent.
    #[must_use]
    pub fn get_token(&self) -> Option<SessionToken> {
        match self.storage.get(keys::TOKEN) {
            Ok(value) => value
                .filter(|token| !token.trim().is_empty())
                .map(SessionToken::new),
            Err(e) => {
                warn!(error = %e, "Token storage unreadable, treating session as anonymous");
                None
            }
        }
    }

    /// Whether a token is stored.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.get_token().is_some()
    }

    /// Persist `token`, replacing any previous one.
    pub fn set_token(&self, token: &SessionToken) {
        if let Err(e) = self.storage.set(keys::TOKEN, token.expose()) {
            warn!(error = %e, "Failed to persist session token");
        }
    }

    /// Delete the token, including any copy under the legacy key.
    pub fn remove_token(&self) {
        for key in [keys::TOKEN, keys::LEGACY_TOKEN] {
            if let Err(e) = self.storage.remove(key) {
                warn!(error = %e, key, "Failed to remove session token");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_set_get_remove() {
        let store = TokenStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.get_token().is_none());

        store.set_token(&SessionToken::new("t1"));
        assert_eq!(store.get_token().unwrap().expose(), "t1");

        store.set_token(&SessionToken::new("t1"));
        assert_eq!(store.get_token().unwrap().expose(), "t1");

        store.remove_token();
        store.remove_token();
        assert!(!store.has_token());
    }

    #[test]
    fn test_remove_purges_legacy_key() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::LEGACY_TOKEN, "old").unwrap();

        TokenStore::new(storage.clone()).remove_token();
        assert_eq!(storage.get(keys::LEGACY_TOKEN).unwrap(), None);
    }

    #[test]
    fn test_legacy_key_is_not_read() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::LEGACY_TOKEN, "old").unwrap();
        assert!(TokenStore::new(storage).get_token().is_none());
    }

    #[test]
    fn test_blank_token_is_absent() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::TOKEN, "  ").unwrap();
        assert!(TokenStore::new(storage).get_token().is_none());
    }

    #[test]
    fn test_unavailable_storage_degrades_to_no_token() {
        let store = TokenStore::new(Arc::new(MemoryStorage::unavailable()));
        store.set_token(&SessionToken::new("t1"));
        assert!(store.get_token().is_none());
        store.remove_token();
    }

    #[test]
    fn test_debug_redacts() {
        let token = SessionToken::new("super-secret");
        assert!(!format!("{token:?}").contains("super-secret"));
    }
}
