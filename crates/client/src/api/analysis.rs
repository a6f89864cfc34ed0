//! Remote style analysis.

use serde_json::Value;
use staybnb_core::ImageUpload;
use tracing::instrument;

use super::{ApiClient, RequestConfig, segment};
use crate::error::ApiError;

impl ApiClient {
    /// Upload a photo for analysis.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a non-image or oversized file,
    /// otherwise the request's error.
    pub async fn analyze_image(&self, image: ImageUpload) -> Result<Value, ApiError> {
        self.upload_image("/analysis/analyze", "image", image).await
    }

    /// Fetch a stored analysis.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn get_analysis(&self, id: &str) -> Result<Value, ApiError> {
        self.request(&format!("/analysis/{}", segment(id)), RequestConfig::get())
            .await
    }
}
