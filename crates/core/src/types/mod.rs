//! Core types for StayBNB.
//!
//! This module provides type-safe wrappers for the client's domain concepts.

pub mod analysis;
pub mod email;
pub mod id;
pub mod profile;
pub mod settings;
pub mod validation;

pub use analysis::*;
pub use email::{Email, EmailError};
pub use id::*;
pub use profile::{ProfileUpdate, UserProfile, member_since};
pub use settings::{NotificationSettings, PrivacySettings};
pub use validation::*;
