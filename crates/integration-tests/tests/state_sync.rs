//! Integration tests for the view-state synchronizer against the mock API.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use serde_json::{Value, json};
use staybnb_client::{
    ApiError, FileStorage, MemoryStorage, SessionToken, StateSync, Storage, storage::keys,
};
use staybnb_core::{ItemId, ProfileUpdate, UserProfile};
use staybnb_integration_tests::{MockApi, MockResponse, user_json};

fn sync_with(mock: &MockApi, storage: Arc<dyn Storage>) -> StateSync {
    StateSync::new(mock.client(storage))
}

fn sign_in_response(token: &str, name: &str) -> MockResponse {
    MockResponse::json(
        200,
        json!({ "token": token, "user": user_json(1, name, "a@x.com") }),
    )
}

fn stored_user(storage: &dyn Storage) -> Value {
    serde_json::from_str(&storage.get(keys::USER).unwrap().unwrap()).unwrap()
}

// ============================================================================
// Wishlist
// ============================================================================

#[tokio::test]
async fn test_toggle_membership_follows_parity() {
    let mock = MockApi::start().await;
    let sync = sync_with(&mock, Arc::new(MemoryStorage::new()));

    let sequence: [i64; 9] = [1, 2, 1, 3, 1, 2, 2, 2, 1];
    for id in sequence {
        sync.toggle_wishlist_item(id);
    }

    let snapshot = sync.snapshot();
    for id in [1_i64, 2, 3] {
        let toggles = sequence.iter().filter(|&&t| t == id).count();
        assert_eq!(
            snapshot.is_wishlisted(&ItemId::Number(id)),
            toggles % 2 == 1,
            "item {id} after {toggles} toggles"
        );
    }
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn test_wishlist_round_trips_through_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let mock = MockApi::start().await;

    let sync = sync_with(&mock, Arc::new(FileStorage::new(dir.path())));
    for id in [3_i64, 7, 9] {
        assert!(sync.toggle_wishlist_item(id));
    }
    drop(sync);

    let restored = sync_with(&mock, Arc::new(FileStorage::new(dir.path()))).load_wishlist();
    let expected: BTreeSet<ItemId> = [3_i64, 7, 9].into_iter().map(ItemId::Number).collect();
    assert_eq!(restored, expected);
}

#[tokio::test]
async fn test_concurrent_toggles_are_serialized() {
    let mock = MockApi::start().await;
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let sync = Arc::new(sync_with(&mock, Arc::clone(&storage)));

    // Each thread toggles its own item an odd number of times and a shared
    // item once.
    let handles: Vec<_> = (0..8_i64)
        .map(|n| {
            let sync = Arc::clone(&sync);
            thread::spawn(move || {
                for _ in 0..3 {
                    sync.toggle_wishlist_item(n);
                }
                sync.toggle_wishlist_item("shared");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = sync.snapshot();
    assert_eq!(snapshot.wishlist.len(), 8);
    assert!(!snapshot.is_wishlisted(&ItemId::from("shared")));

    // Last write wins, and the last write holds the final state.
    let persisted: BTreeSet<ItemId> =
        serde_json::from_str(&storage.get(keys::WISHLIST).unwrap().unwrap()).unwrap();
    assert_eq!(persisted, snapshot.wishlist);
}

// ============================================================================
// Sign in / sign out / bootstrap
// ============================================================================

#[tokio::test]
async fn test_sign_in_sets_state_and_snapshot_round_trips() {
    let mock = MockApi::start().await;
    mock.on("POST", "/auth/signin", sign_in_response("t1", "A"));
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let sync = sync_with(&mock, Arc::clone(&storage));
    let mut updates = sync.subscribe();

    let user = sync.sign_in("a@x.com", "secret1").await.unwrap();

    let snapshot = sync.snapshot();
    assert!(snapshot.is_logged_in);
    assert_eq!(snapshot.current_user.as_ref().unwrap().name, "A");
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().current_user.as_ref(), Some(&user));

    let persisted = stored_user(storage.as_ref());
    assert_eq!(persisted["isLoggedIn"], true);
    let restored: UserProfile = serde_json::from_value(persisted["user"].clone()).unwrap();
    assert_eq!(restored, user);
    assert_eq!(storage.get(keys::TOKEN).unwrap().as_deref(), Some("t1"));
}

#[tokio::test]
async fn test_sign_up_validates_locally() {
    let mock = MockApi::start().await;
    let sync = sync_with(&mock, Arc::new(MemoryStorage::new()));

    let err = sync.sign_up("", "a@x.com", "secret1").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = sync.sign_up("A", "a@x.com", "123").await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    assert_eq!(mock.hits(), 0);
    assert!(!sync.snapshot().is_logged_in);
}

#[tokio::test]
async fn test_sign_out_then_bootstrap_is_logged_out() {
    let mock = MockApi::start().await;
    mock.on("POST", "/auth/signin", sign_in_response("t1", "A"));
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

    let sync = sync_with(&mock, Arc::clone(&storage));
    sync.sign_in("a@x.com", "secret1").await.unwrap();
    sync.toggle_wishlist_item(4_i64);
    sync.sign_out();
    let hits_before = mock.hits();

    let fresh = sync_with(&mock, Arc::clone(&storage));
    fresh.bootstrap().await;

    let snapshot = fresh.snapshot();
    assert!(!snapshot.is_logged_in);
    assert!(snapshot.current_user.is_none());
    assert!(snapshot.wishlist.is_empty());
    assert_eq!(mock.hits(), hits_before, "bootstrap without a token must not call the API");
}

#[tokio::test]
async fn test_bootstrap_refreshes_profile_when_session_valid() {
    let mock = MockApi::start().await;
    mock.on("POST", "/auth/signin", sign_in_response("t1", "Old Name"));
    mock.on("POST", "/auth/verify", MockResponse::json(200, json!({ "valid": true, "userId": 1 })));
    mock.on("GET", "/users/profile", MockResponse::json(200, user_json(1, "New Name", "a@x.com")));
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

    sync_with(&mock, Arc::clone(&storage))
        .sign_in("a@x.com", "secret1")
        .await
        .unwrap();

    let sync = sync_with(&mock, Arc::clone(&storage));
    let updates = sync.subscribe();
    sync.bootstrap().await;

    assert_eq!(sync.snapshot().current_user.unwrap().name, "New Name");
    assert_eq!(updates.borrow().current_user.as_ref().unwrap().name, "New Name");
    assert_eq!(stored_user(storage.as_ref())["user"]["name"], "New Name");
    assert_eq!(mock.last_authorization().as_deref(), Some("Bearer t1"));
}

#[tokio::test]
async fn test_bootstrap_invalid_session_clears_token_only() {
    let mock = MockApi::start().await;
    mock.on("POST", "/auth/signin", sign_in_response("t1", "A"));
    mock.on("POST", "/auth/verify", MockResponse::json(200, json!({ "valid": false })));
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());

    sync_with(&mock, Arc::clone(&storage))
        .sign_in("a@x.com", "secret1")
        .await
        .unwrap();

    let sync = sync_with(&mock, Arc::clone(&storage));
    sync.bootstrap().await;

    // The optimistic user stays rendered; only the token is gone.
    let snapshot = sync.snapshot();
    assert!(snapshot.is_logged_in);
    assert_eq!(snapshot.current_user.unwrap().name, "A");
    assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
}

#[tokio::test]
async fn test_bootstrap_unreachable_server_degrades_gracefully() {
    let mock = MockApi::start().await;
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    storage.set(keys::TOKEN, "t1").unwrap();
    storage.set(keys::WISHLIST, "[5]").unwrap();

    // No /auth/verify route: the mock answers 404, which downgrades to invalid.
    let sync = sync_with(&mock, Arc::clone(&storage));
    sync.bootstrap().await;

    let snapshot = sync.snapshot();
    assert!(!snapshot.is_logged_in);
    assert!(snapshot.is_wishlisted(&ItemId::Number(5)));
    assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
}

#[tokio::test]
async fn test_bootstrap_with_corrupt_snapshot_starts_logged_out() {
    let mock = MockApi::start().await;
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    storage.set(keys::USER, "{{{").unwrap();
    storage.set(keys::WISHLIST, r#"{"not":"a list"}"#).unwrap();

    let sync = sync_with(&mock, storage);
    sync.bootstrap().await;

    let snapshot = sync.snapshot();
    assert!(!snapshot.is_logged_in);
    assert!(snapshot.wishlist.is_empty());
}

// ============================================================================
// Profile
// ============================================================================

#[tokio::test]
async fn test_update_profile_replaces_cache_with_server_answer() {
    let mock = MockApi::start().await;
    mock.on("POST", "/auth/signin", sign_in_response("t1", "A"));
    mock.on(
        "PUT",
        "/users/profile",
        MockResponse::json(
            200,
            json!({ "id": 1, "name": "Server Name", "email": "a@x.com", "preferences": "boho, classic" }),
        ),
    );
    let sync = sync_with(&mock, Arc::new(MemoryStorage::new()));
    sync.sign_in("a@x.com", "secret1").await.unwrap();

    let update = ProfileUpdate::from_form("Typed Name", "", "", "boho").unwrap();
    let user = sync.update_profile(update).await.unwrap();

    assert_eq!(user.name, "Server Name");
    assert_eq!(user.preferences, ["boho", "classic"]);
    assert_eq!(sync.snapshot().current_user.unwrap(), user);
}

#[tokio::test]
async fn test_unauthorized_profile_write_signs_out() {
    let mock = MockApi::start().await;
    mock.on("POST", "/auth/signin", sign_in_response("t1", "A"));
    mock.on(
        "PUT",
        "/users/profile",
        MockResponse::json(401, json!({ "error": "Token expired" })),
    );
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let sync = sync_with(&mock, Arc::clone(&storage));
    sync.sign_in("a@x.com", "secret1").await.unwrap();
    sync.toggle_wishlist_item(2_i64);

    let update = ProfileUpdate::from_form("A", "", "", "").unwrap();
    let err = sync.update_profile(update).await.unwrap_err();

    assert!(err.is_unauthorized());
    let snapshot = sync.snapshot();
    assert!(!snapshot.is_logged_in);
    assert!(snapshot.current_user.is_none());
    assert!(snapshot.wishlist.is_empty());
    assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    assert_eq!(storage.get(keys::USER).unwrap(), None);
}

#[tokio::test]
async fn test_refresh_profile_other_errors_keep_session() {
    let mock = MockApi::start().await;
    mock.on("POST", "/auth/signin", sign_in_response("t1", "A"));
    mock.on("GET", "/users/profile", MockResponse::json(503, json!({ "error": "maintenance" })));
    let sync = sync_with(&mock, Arc::new(MemoryStorage::new()));
    sync.sign_in("a@x.com", "secret1").await.unwrap();

    let err = sync.refresh_profile().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(sync.snapshot().is_logged_in);
    assert!(sync.api().tokens().has_token());
}

#[tokio::test]
async fn test_logged_out_state_never_writes_profile() {
    let mock = MockApi::start().await;
    let sync = sync_with(&mock, Arc::new(MemoryStorage::new()));
    sync.api().tokens().set_token(&SessionToken::new("stale"));

    let update = ProfileUpdate::from_form("A", "", "", "").unwrap();
    let err = sync.update_profile(update).await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(mock.hits(), 0);
}
