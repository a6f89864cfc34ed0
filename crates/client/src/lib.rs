//! StayBNB client.
//!
//! A session-aware client for the StayBNB fashion-advice API, plus the
//! view-state synchronizer that keeps the signed-in user and wishlist in step
//! with durable storage and server responses.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use staybnb_client::{ApiClient, ClientConfig, FileStorage, StateSync};
//!
//! let config = ClientConfig::from_env()?;
//! let storage = Arc::new(FileStorage::new(&config.storage_dir));
//! let sync = StateSync::new(ApiClient::new(&config, storage)?);
//!
//! sync.bootstrap().await;
//! println!("logged in: {}", sync.snapshot().is_logged_in);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod placeholder;
pub mod storage;
pub mod sync;
pub mod token;

pub use api::{ApiClient, AuthResponse, RequestBody, RequestConfig, VerifyResponse};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, FALLBACK_MESSAGE, NetworkError};
pub use placeholder::PlaceholderAnalyzer;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use sync::{AppSnapshot, StateSync};
pub use token::{SessionToken, TokenStore};
