//! Local input validation.
//!
//! Every form is checked here before anything is sent to the API, so a
//! [`ValidationError`] never costs a network round trip.

use serde::Serialize;

use super::email::{Email, EmailError};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum accepted image upload size (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Bad input detected on the client.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left blank.
    #[error("{0} is required")]
    EmptyField(&'static str),

    /// New password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Password shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum length.
        min: usize,
    },

    /// Email failed to parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Upload larger than [`MAX_IMAGE_BYTES`].
    #[error("image must be at most {max_bytes} bytes")]
    ImageTooLarge {
        /// Size limit in bytes.
        max_bytes: usize,
    },

    /// Upload whose MIME type is not `image/*`.
    #[error("not an image: {0}")]
    NotAnImage(String),
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(value)
    }
}

fn check_password_length(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validated sign-in form.
#[derive(Clone)]
pub struct SignInForm<'a> {
    /// Account email.
    pub email: Email,
    /// Password as typed.
    pub password: &'a str,
}

impl<'a> SignInForm<'a> {
    /// Validate raw sign-in input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank field or a malformed email.
    pub fn parse(email: &str, password: &'a str) -> Result<Self, ValidationError> {
        let email = Email::parse(require(email, "email")?)?;
        let password = require(password, "password")?;
        Ok(Self { email, password })
    }
}

/// Validated sign-up form.
#[derive(Clone)]
pub struct SignUpForm<'a> {
    /// Display name, trimmed.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Password as typed.
    pub password: &'a str,
}

impl<'a> SignUpForm<'a> {
    /// Validate raw sign-up input.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank field, a malformed email or
    /// a password shorter than [`MIN_PASSWORD_LENGTH`].
    pub fn parse(name: &str, email: &str, password: &'a str) -> Result<Self, ValidationError> {
        let name = require(name, "name")?.trim().to_owned();
        let email = Email::parse(require(email, "email")?)?;
        let password = require(password, "password")?;
        check_password_length(password)?;
        Ok(Self {
            name,
            email,
            password,
        })
    }
}

impl std::fmt::Debug for SignInForm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for SignUpForm<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `POST /auth/change-password`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Current password.
    pub current_password: String,
    /// Replacement password.
    pub new_password: String,
}

impl std::fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

impl PasswordChange {
    /// Validate the change-password form.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any field is blank, the confirmation
    /// does not match, or the new password is too short.
    pub fn from_form(current: &str, new: &str, confirm: &str) -> Result<Self, ValidationError> {
        require(current, "current password")?;
        require(new, "new password")?;
        require(confirm, "password confirmation")?;
        if new != confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        check_password_length(new)?;

        Ok(Self {
            current_password: current.to_owned(),
            new_password: new.to_owned(),
        })
    }
}

/// An image selected for upload (analysis or avatar).
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, sent as the multipart file name.
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Create an upload, guessing the MIME type from the file extension.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_from_extension(&file_name).to_owned();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Check type and size limits.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotAnImage`] or
    /// [`ValidationError::ImageTooLarge`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.mime_type.starts_with("image/") {
            return Err(ValidationError::NotAnImage(self.file_name.clone()));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::ImageTooLarge {
                max_bytes: MAX_IMAGE_BYTES,
            });
        }
        Ok(())
    }
}

fn mime_from_extension(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}
