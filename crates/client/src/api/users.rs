//! User profile endpoints.

use serde_json::Value;
use staybnb_core::{ImageUpload, ProfileUpdate, UserProfile};
use tracing::{debug, instrument};

use super::{ApiClient, RequestConfig};
use crate::error::ApiError;

impl ApiClient {
    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Request` with status 401 when the token is missing
    /// or rejected.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<UserProfile, ApiError> {
        let user: UserProfile = self
            .request("/users/profile", RequestConfig::get())
            .await?;
        debug!(user_id = %user.id, "Fetched profile");
        Ok(user)
    }

    /// Write profile fields and return the server's updated profile.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a blank name without sending
    /// anything, otherwise the request's error.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        update.validate()?;
        let config = RequestConfig::put().json_from(update)?;
        self.request("/users/profile", config).await
    }

    /// Past analyses for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_analysis_history(&self) -> Result<Value, ApiError> {
        self.request("/users/analysis-history", RequestConfig::get())
            .await
    }

    /// Upload a new profile picture.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a non-image or oversized file,
    /// otherwise the request's error.
    pub async fn upload_avatar(&self, image: ImageUpload) -> Result<Value, ApiError> {
        self.upload_image("/users/avatar", "avatar", image).await
    }
}
