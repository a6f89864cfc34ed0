//! Reels, cloth types and style profile endpoints.
//!
//! These return server-owned shapes as raw JSON.

use serde_json::Value;
use staybnb_core::Gender;
use tracing::instrument;

use super::{ApiClient, RequestConfig, segment};
use crate::error::ApiError;

impl ApiClient {
    // =========================================================================
    // Reels
    // =========================================================================

    /// All reels.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_reels(&self) -> Result<Value, ApiError> {
        self.request("/reels", RequestConfig::get()).await
    }

    /// One reel.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_reel(&self, id: &str) -> Result<Value, ApiError> {
        self.request(&format!("/reels/{}", segment(id)), RequestConfig::get())
            .await
    }

    /// Like a reel.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn like_reel(&self, id: &str) -> Result<Value, ApiError> {
        self.request(&format!("/reels/{}/like", segment(id)), RequestConfig::post())
            .await
    }

    /// Reels featuring a cloth type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn search_reels_by_cloth(&self, cloth_type: &str) -> Result<Value, ApiError> {
        let path = format!("/reels/search/cloth/{}", segment(cloth_type));
        self.request(&path, RequestConfig::get()).await
    }

    // =========================================================================
    // Cloth types
    // =========================================================================

    /// All cloth types.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_cloth_types(&self) -> Result<Value, ApiError> {
        self.request("/cloth", RequestConfig::get()).await
    }

    /// One cloth type.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_cloth_type(&self, id: &str) -> Result<Value, ApiError> {
        self.request(&format!("/cloth/{}", segment(id)), RequestConfig::get())
            .await
    }

    /// Cloth types matching a free-text query.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn search_cloth_types(&self, query: &str) -> Result<Value, ApiError> {
        let path = format!("/cloth/search/{}", segment(query));
        self.request(&path, RequestConfig::get()).await
    }

    // =========================================================================
    // Style profile
    // =========================================================================

    /// The signed-in user's style profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_style_profile(&self) -> Result<Value, ApiError> {
        self.request("/style-profile", RequestConfig::get()).await
    }

    /// Replace the signed-in user's style profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self, profile))]
    pub async fn update_style_profile(&self, profile: &Value) -> Result<Value, ApiError> {
        self.request("/style-profile", RequestConfig::put().json(profile.clone()))
            .await
    }

    /// Server-side wardrobe recommendations for a gender.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_gender_recommendations(&self, gender: Gender) -> Result<Value, ApiError> {
        let path = format!("/style-profile/recommendations/{gender}");
        self.request(&path, RequestConfig::get()).await
    }
}
