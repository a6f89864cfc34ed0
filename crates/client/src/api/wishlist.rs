//! Server-side wishlist endpoints.
//!
//! The synchronizer keeps its own local wishlist; these are for callers that
//! want the account-level copy.

use serde_json::Value;
use staybnb_core::ItemId;
use tracing::instrument;

use super::{ApiClient, RequestConfig, segment};
use crate::error::ApiError;

impl ApiClient {
    /// The account's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_wishlist(&self) -> Result<Value, ApiError> {
        self.request("/wishlist", RequestConfig::get()).await
    }

    /// Add an item. The payload shape is owned by the server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, item))]
    pub async fn add_to_wishlist(&self, item: &Value) -> Result<Value, ApiError> {
        self.request("/wishlist/add", RequestConfig::post().json(item.clone()))
            .await
    }

    /// Remove an item.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self), fields(item = %id))]
    pub async fn remove_from_wishlist(&self, id: &ItemId) -> Result<Value, ApiError> {
        let path = format!("/wishlist/{}", segment(&id.to_string()));
        self.request(&path, RequestConfig::delete()).await
    }
}
