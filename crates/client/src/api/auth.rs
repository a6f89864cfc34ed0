//! Authentication endpoints.

use serde::Deserialize;
use serde_json::json;
use staybnb_core::{PasswordChange, SignInForm, SignUpForm, UserId, UserProfile};
use tracing::{debug, instrument, warn};

use super::{ApiClient, RequestConfig};
use crate::error::ApiError;
use crate::storage::keys;
use crate::token::SessionToken;

/// Successful sign-in or sign-up.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Newly issued session token. Already persisted by the time callers
    /// see it.
    pub token: SessionToken,
    /// The authenticated user.
    pub user: UserProfile,
}

/// Result of `POST /auth/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyResponse {
    /// Whether the token is still accepted.
    #[serde(default)]
    pub valid: bool,
    /// The token's owner, when valid.
    #[serde(default, rename = "userId")]
    pub user_id: Option<UserId>,
}

impl VerifyResponse {
    /// `{valid: false}`.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            valid: false,
            user_id: None,
        }
    }
}

impl ApiClient {
    /// Create an account and store the issued token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the response lacks a token
    /// or user.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn sign_up(&self, form: &SignUpForm<'_>) -> Result<AuthResponse, ApiError> {
        let body = json!({
            "name": form.name,
            "email": form.email,
            "password": form.password,
        });
        let response: AuthResponse = self
            .request("/auth/signup", RequestConfig::post().json(body))
            .await?;

        self.tokens().set_token(&response.token);
        debug!(user_id = %response.user.id, "Signed up");
        Ok(response)
    }

    /// Sign in and store the issued token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the credentials are rejected or the request
    /// fails.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn sign_in(&self, form: &SignInForm<'_>) -> Result<AuthResponse, ApiError> {
        let body = json!({
            "email": form.email,
            "password": form.password,
        });
        let response: AuthResponse = self
            .request("/auth/signin", RequestConfig::post().json(body))
            .await?;

        self.tokens().set_token(&response.token);
        debug!(user_id = %response.user.id, "Signed in");
        Ok(response)
    }

    /// Check the stored token with the server.
    ///
    /// Never fails. Without a stored token this returns `{valid: false}`
    /// without touching the network, and any request failure is downgraded
    /// to `{valid: false}`.
    #[instrument(skip(self))]
    pub async fn verify_session(&self) -> VerifyResponse {
        let Some(token) = self.tokens().get_token() else {
            debug!("No stored token, session is anonymous");
            return VerifyResponse::invalid();
        };

        let config = RequestConfig::post().json(json!({ "token": token.expose() }));
        match self.request::<VerifyResponse>("/auth/verify", config).await {
            Ok(response) => {
                debug!(valid = response.valid, "Session verified");
                response
            }
            Err(e) => {
                warn!(error = %e, "Session verification failed, treating as invalid");
                VerifyResponse::invalid()
            }
        }
    }

    /// Forget the session: delete the token and the cached user and
    /// wishlist. No network call.
    pub fn sign_out(&self) {
        self.tokens().remove_token();
        for key in [keys::USER, keys::WISHLIST] {
            if let Err(e) = self.storage().remove(key) {
                warn!(error = %e, key, "Failed to clear cached session data");
            }
        }
        debug!("Signed out");
    }

    /// Change the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the server rejects the change or the request
    /// fails.
    #[instrument(skip(self, change))]
    pub async fn change_password(
        &self,
        change: &PasswordChange,
    ) -> Result<serde_json::Value, ApiError> {
        let config = RequestConfig::post().json_from(change)?;
        self.request("/auth/change-password", config).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::{MemoryStorage, Storage};

    #[test]
    fn test_auth_response_deserializes() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"token":"t1","user":{"id":1,"name":"A","email":"a@x.com"}}"#,
        )
        .unwrap();
        assert_eq!(response.token.expose(), "t1");
        assert_eq!(response.user.name, "A");
    }

    #[test]
    fn test_auth_response_requires_token() {
        let result = serde_json::from_str::<AuthResponse>(
            r#"{"user":{"id":1,"name":"A","email":"a@x.com"}}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_response_defaults() {
        let response: VerifyResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response, VerifyResponse::invalid());

        let response: VerifyResponse =
            serde_json::from_str(r#"{"valid":true,"userId":42}"#).unwrap();
        assert!(response.valid);
        assert_eq!(response.user_id, Some(UserId::from(42)));
    }

    #[test]
    fn test_sign_out_clears_session_keys() {
        let storage = Arc::new(MemoryStorage::new());
        for key in [keys::TOKEN, keys::USER, keys::WISHLIST, keys::LEGACY_TOKEN] {
            storage.set(key, "x").unwrap();
        }
        storage.set(keys::PRIVACY_SETTINGS, "{}").unwrap();

        let config = ClientConfig::new("http://localhost:3000").unwrap();
        let api = ApiClient::new(&config, storage.clone()).unwrap();
        api.sign_out();

        for key in [keys::TOKEN, keys::USER, keys::WISHLIST, keys::LEGACY_TOKEN] {
            assert_eq!(storage.get(key).unwrap(), None, "{key} not cleared");
        }
        assert!(storage.get(keys::PRIVACY_SETTINGS).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_verify_without_token_is_invalid() {
        let config = ClientConfig::new("http://127.0.0.1:9").unwrap();
        let api = ApiClient::new(&config, Arc::new(MemoryStorage::new())).unwrap();
        assert_eq!(api.verify_session().await, VerifyResponse::invalid());
    }
}
