//! CLI command implementations.
//!
//! Every command builds a [`Context`] over the file-backed storage directory,
//! so state carries over between invocations the way it would across page
//! loads.

pub mod catalog;
pub mod profile;
pub mod session;
pub mod settings;
pub mod style;
pub mod wishlist;

use std::path::Path;
use std::sync::Arc;

use staybnb_client::{ApiClient, ApiError, ClientConfig, ConfigError, FileStorage, StateSync};
use staybnb_core::ImageUpload;
use thiserror::Error;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// API call or local validation failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A local file could not be read.
    #[error("Cannot read {path}: {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Response could not be rendered.
    #[error("Cannot render response: {0}")]
    Render(#[from] serde_json::Error),
}

/// Shared state for one CLI invocation.
pub struct Context {
    pub sync: StateSync,
}

impl Context {
    /// Build the client stack from environment configuration.
    pub fn from_env() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        tracing::debug!(
            api_base = config.api_base(),
            storage_dir = %config.storage_dir.display(),
            "Loaded configuration"
        );

        let storage = Arc::new(FileStorage::new(&config.storage_dir));
        let api = ApiClient::new(&config, storage)?;
        Ok(Self {
            sync: StateSync::new(api),
        })
    }

    pub const fn api(&self) -> &ApiClient {
        self.sync.api()
    }
}

/// Read an image file into an upload.
pub fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload".to_owned(), |n| n.to_string_lossy().into_owned());
    Ok(ImageUpload::new(file_name, bytes))
}

/// Pretty-print a server-owned JSON document.
#[allow(clippy::print_stdout)]
pub fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
