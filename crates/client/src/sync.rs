//! View-state synchronizer.
//!
//! [`StateSync`] is the only writer of the application state: the signed-in
//! user and the local wishlist. It keeps that state consistent with durable
//! storage and with the outcome of API calls, and publishes an
//! [`AppSnapshot`] on a `watch` channel after every change so a front-end can
//! redraw.
//!
//! Logged-in status is derived from the cached user, so "logged in" and
//! "has a current user" can never disagree.

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use staybnb_core::{
    ItemId, NotificationSettings, PrivacySettings, ProfileUpdate, SignInForm, SignUpForm,
    UserProfile,
};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::storage::keys;

/// Read-only view of the application state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSnapshot {
    /// The signed-in user, if any.
    pub current_user: Option<UserProfile>,
    /// True exactly when `current_user` is present.
    pub is_logged_in: bool,
    /// Wishlisted item IDs.
    pub wishlist: BTreeSet<ItemId>,
}

impl AppSnapshot {
    /// Whether `id` is wishlisted.
    #[must_use]
    pub fn is_wishlisted(&self, id: &ItemId) -> bool {
        self.wishlist.contains(id)
    }
}

#[derive(Debug, Default)]
struct AppState {
    user: Option<UserProfile>,
    wishlist: BTreeSet<ItemId>,
}

impl AppState {
    fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            current_user: self.user.clone(),
            is_logged_in: self.user.is_some(),
            wishlist: self.wishlist.clone(),
        }
    }
}

/// What gets written under [`keys::USER`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default)]
    is_logged_in: bool,
}

/// Owner of the application state.
pub struct StateSync {
    api: ApiClient,
    state: Mutex<AppState>,
    tx: watch::Sender<AppSnapshot>,
}

impl std::fmt::Debug for StateSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateSync")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl StateSync {
    /// Create a synchronizer with empty, logged-out state.
    ///
    /// Call [`StateSync::bootstrap`] to restore the previous session.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (tx, _rx) = watch::channel(AppSnapshot::default());
        Self {
            api,
            state: Mutex::new(AppState::default()),
            tx,
        }
    }

    /// The API client this synchronizer drives.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Receive a fresh snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.tx.subscribe()
    }

    /// The current state.
    #[must_use]
    pub fn snapshot(&self) -> AppSnapshot {
        self.lock().snapshot()
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Restore the previous session, then reconcile it with the server.
    ///
    /// The persisted user and wishlist are adopted first so a front-end can
    /// render immediately. Then the token is verified:
    /// - valid: the profile is re-fetched and replaces the cached user
    /// - invalid: the stored token is cleared but the optimistic user is
    ///   kept until the next explicit sign-out
    ///
    /// Never fails; every problem is logged and degrades gracefully.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) {
        let user = self.load_user_snapshot();
        let wishlist = self.load_wishlist();
        self.mutate(|state| {
            state.user = user;
            state.wishlist = wishlist;
        });

        let verdict = self.api.verify_session().await;
        if !verdict.valid {
            debug!("Stored session is not valid, clearing token");
            self.api.tokens().remove_token();
            return;
        }

        match self.api.get_profile().await {
            Ok(user) => self.set_user(user),
            Err(e) if e.is_unauthorized() => {
                warn!("Profile refresh rejected during bootstrap, signing out");
                self.sign_out();
            }
            Err(e) => warn!(error = %e, "Profile refresh failed during bootstrap, keeping cached user"),
        }
    }

    /// Read the persisted wishlist. Absent or malformed data yields an empty
    /// set.
    #[must_use]
    pub fn load_wishlist(&self) -> BTreeSet<ItemId> {
        self.read_json::<Vec<ItemId>>(keys::WISHLIST)
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }

    /// Adopt the user from a successful sign-in.
    pub fn apply_sign_in_result(&self, user: UserProfile) {
        self.set_user(user);
    }

    /// Adopt the user from a successful sign-up.
    pub fn apply_sign_up_result(&self, user: UserProfile) {
        self.set_user(user);
    }

    /// Validate the form, sign in and adopt the result.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` without any network call for bad
    /// input, otherwise the API's error.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, ApiError> {
        let form = SignInForm::parse(email, password)?;
        let response = self.api.sign_in(&form).await?;
        self.apply_sign_in_result(response.user.clone());
        Ok(response.user)
    }

    /// Validate the form, create the account and adopt the result.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` without any network call for bad
    /// input, otherwise the API's error.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        let form = SignUpForm::parse(name, email, password)?;
        let response = self.api.sign_up(&form).await?;
        self.apply_sign_up_result(response.user.clone());
        Ok(response.user)
    }

    /// Forget the user and wishlist, in memory and in storage.
    ///
    /// Infallible: storage failures are logged and the in-memory state is
    /// cleared regardless.
    pub fn sign_out(&self) {
        let mut state = self.lock();
        state.user = None;
        state.wishlist.clear();
        self.api.sign_out();
        self.tx.send_replace(state.snapshot());
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Add `id` if absent, remove it if present, and persist the set.
    ///
    /// Returns whether `id` is wishlisted afterwards. Like every other state
    /// change, the persist happens under the state lock, so storage always
    /// matches the last change made in memory.
    pub fn toggle_wishlist_item(&self, id: impl Into<ItemId>) -> bool {
        let id = id.into();
        let mut state = self.lock();

        let member = if state.wishlist.remove(&id) {
            false
        } else {
            state.wishlist.insert(id);
            true
        };

        self.write_json(keys::WISHLIST, &state.wishlist);
        self.tx.send_replace(state.snapshot());
        member
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Re-fetch the profile and replace the cached user.
    ///
    /// # Errors
    ///
    /// Returns the API's error. A 401 signs the user out first.
    #[instrument(skip(self))]
    pub async fn refresh_profile(&self) -> Result<UserProfile, ApiError> {
        let result = self.api.get_profile().await;
        self.adopt_profile(result)
    }

    /// Write profile changes through the API and cache the server's answer.
    ///
    /// # Errors
    ///
    /// - `ApiError::Request` with status 401, without any network call,
    ///   when nobody is signed in
    /// - `ApiError::Validation` for a blank name
    /// - the API's error otherwise; a 401 signs the user out first
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, ApiError> {
        if !self.snapshot().is_logged_in {
            return Err(ApiError::unauthorized("Not signed in"));
        }
        let result = self.api.update_profile(&update).await;
        self.adopt_profile(result)
    }

    fn adopt_profile(
        &self,
        result: Result<UserProfile, ApiError>,
    ) -> Result<UserProfile, ApiError> {
        match result {
            Ok(user) => {
                self.set_user(user.clone());
                Ok(user)
            }
            Err(e) => {
                if e.is_unauthorized() {
                    warn!("Session rejected by server, signing out");
                    self.sign_out();
                }
                Err(e)
            }
        }
    }

    // =========================================================================
    // Local settings
    // =========================================================================

    /// Stored notification settings, or the defaults.
    #[must_use]
    pub fn notification_settings(&self) -> NotificationSettings {
        self.read_json(keys::NOTIFICATION_SETTINGS)
            .unwrap_or_default()
    }

    /// Persist notification settings.
    pub fn save_notification_settings(&self, settings: &NotificationSettings) {
        self.write_json(keys::NOTIFICATION_SETTINGS, settings);
    }

    /// Stored privacy settings, or the defaults.
    #[must_use]
    pub fn privacy_settings(&self) -> PrivacySettings {
        self.read_json(keys::PRIVACY_SETTINGS).unwrap_or_default()
    }

    /// Persist privacy settings.
    pub fn save_privacy_settings(&self, settings: &PrivacySettings) {
        self.write_json(keys::PRIVACY_SETTINGS, settings);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` and publish the resulting snapshot.
    fn mutate(&self, f: impl FnOnce(&mut AppState)) {
        let mut state = self.lock();
        f(&mut state);
        self.tx.send_replace(state.snapshot());
    }

    fn set_user(&self, user: UserProfile) {
        debug!(user_id = %user.id, "Adopting user");
        let mut state = self.lock();
        self.write_json(
            keys::USER,
            &SessionSnapshot {
                user: Some(user.clone()),
                is_logged_in: true,
            },
        );
        state.user = Some(user);
        self.tx.send_replace(state.snapshot());
    }

    fn load_user_snapshot(&self) -> Option<UserProfile> {
        let snapshot = self.read_json::<SessionSnapshot>(keys::USER)?;
        match snapshot {
            SessionSnapshot {
                user: Some(user),
                is_logged_in: true,
            } => Some(user),
            SessionSnapshot {
                user: None,
                is_logged_in: false,
            } => None,
            _ => {
                warn!("Inconsistent session snapshot, starting logged out");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.api.storage().get(key) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, key, "Storage unreadable");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, key, "Ignoring malformed stored value");
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.api
                    .storage()
                    .set(key, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            warn!(error = %e, key, "Failed to persist state");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    use staybnb_core::{Email, UserId};

    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::{MemoryStorage, Storage, StorageError};

    fn user(name: &str) -> UserProfile {
        UserProfile {
            id: UserId::from(1),
            name: name.to_string(),
            email: Email::parse("a@x.com").unwrap(),
            skin_tone: None,
            body_shape: None,
            preferences: Vec::new(),
            created_at: None,
        }
    }

    fn sync_over(storage: Arc<dyn Storage>) -> StateSync {
        // Port 9 (discard) so any accidental request fails fast.
        let config = ClientConfig::new("http://127.0.0.1:9").unwrap();
        StateSync::new(ApiClient::new(&config, storage).unwrap())
    }

    #[test]
    fn test_toggle_parity() {
        let sync = sync_over(Arc::new(MemoryStorage::new()));
        for n in 1..=7 {
            let member = sync.toggle_wishlist_item(5_i64);
            assert_eq!(member, n % 2 == 1);
            assert_eq!(sync.snapshot().is_wishlisted(&ItemId::Number(5)), n % 2 == 1);
        }
    }

    #[test]
    fn test_wishlist_round_trip() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let sync = sync_over(storage.clone());
        for id in [3_i64, 7, 9] {
            sync.toggle_wishlist_item(id);
        }

        let restored = sync_over(storage).load_wishlist();
        let expected: BTreeSet<ItemId> = [3_i64, 7, 9].into_iter().map(ItemId::from).collect();
        assert_eq!(restored, expected);
    }

    #[test]
    fn test_malformed_wishlist_is_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::WISHLIST, "{not json").unwrap();
        assert!(sync_over(storage).load_wishlist().is_empty());
    }

    #[test]
    fn test_duplicate_wishlist_entries_collapse() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::WISHLIST, "[3,3,7]").unwrap();
        assert_eq!(sync_over(storage).load_wishlist().len(), 2);
    }

    #[test]
    fn test_apply_sign_in_persists_snapshot() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let sync = sync_over(storage.clone());
        let mut rx = sync.subscribe();

        sync.apply_sign_in_result(user("A"));

        let snapshot = sync.snapshot();
        assert!(snapshot.is_logged_in);
        assert_eq!(snapshot.current_user.as_ref().unwrap().name, "A");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), snapshot);

        let restored = sync_over(storage).load_user_snapshot();
        assert_eq!(restored, Some(user("A")));
    }

    #[test]
    fn test_inconsistent_snapshot_is_logged_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set(keys::USER, r#"{"user":null,"isLoggedIn":true}"#)
            .unwrap();
        assert_eq!(sync_over(storage.clone()).load_user_snapshot(), None);

        storage
            .set(
                keys::USER,
                r#"{"user":{"id":1,"name":"A","email":"a@x.com"},"isLoggedIn":false}"#,
            )
            .unwrap();
        assert_eq!(sync_over(storage).load_user_snapshot(), None);
    }

    #[test]
    fn test_sign_out_clears_everything() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let sync = sync_over(storage.clone());
        sync.apply_sign_in_result(user("A"));
        sync.toggle_wishlist_item(3_i64);

        sync.sign_out();

        assert_eq!(sync.snapshot(), AppSnapshot::default());
        assert_eq!(storage.get(keys::USER).unwrap(), None);
        assert_eq!(storage.get(keys::WISHLIST).unwrap(), None);
    }

    /// Parks the first write of the session snapshot until the test has
    /// started a competing sign-out.
    struct SlowUserWrite {
        inner: MemoryStorage,
        started: Barrier,
    }

    impl Storage for SlowUserWrite {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == keys::USER {
                self.started.wait();
                std::thread::sleep(Duration::from_millis(100));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_sign_out_racing_sign_in_leaves_storage_logged_out() {
        let storage = Arc::new(SlowUserWrite {
            inner: MemoryStorage::new(),
            started: Barrier::new(2),
        });
        let sync = Arc::new(sync_over(storage.clone()));

        let signing_in = {
            let sync = Arc::clone(&sync);
            std::thread::spawn(move || sync.apply_sign_in_result(user("A")))
        };
        storage.started.wait();
        sync.sign_out();
        signing_in.join().unwrap();

        assert!(!sync.snapshot().is_logged_in);
        assert_eq!(storage.get(keys::USER).unwrap(), None);
        assert_eq!(sync_over(storage).load_user_snapshot(), None);
    }

    #[test]
    fn test_sign_out_with_unavailable_storage() {
        let sync = sync_over(Arc::new(MemoryStorage::unavailable()));
        sync.apply_sign_in_result(user("A"));
        assert!(sync.snapshot().is_logged_in);

        sync.sign_out();
        assert!(!sync.snapshot().is_logged_in);
        assert!(sync.snapshot().current_user.is_none());
    }

    #[test]
    fn test_settings_defaults_and_persistence() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::PRIVACY_SETTINGS, "garbage").unwrap();
        let sync = sync_over(storage.clone());

        assert_eq!(sync.notification_settings(), NotificationSettings::default());
        assert_eq!(sync.privacy_settings(), PrivacySettings::default());

        let settings = NotificationSettings {
            new_collections: true,
            ..NotificationSettings::default()
        };
        sync.save_notification_settings(&settings);
        assert_eq!(sync.notification_settings(), settings);
        assert!(storage.get("notificationSettings").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_profile_when_logged_out() {
        let sync = sync_over(Arc::new(MemoryStorage::new()));
        let update = ProfileUpdate::from_form("A", "", "", "").unwrap();
        let err = sync.update_profile(update).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_sign_in_validates_before_network() {
        let sync = sync_over(Arc::new(MemoryStorage::new()));
        let err = sync.sign_in("not-an-email", "secret").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
