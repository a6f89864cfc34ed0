//! Locally persisted preference settings.
//!
//! These never leave the device; the client stores them as JSON under their
//! own storage keys. Field names are camelCase to match what earlier
//! releases wrote.

use serde::{Deserialize, Serialize};

/// Which notifications the user wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    /// General email notifications.
    pub email_notifications: bool,
    /// New style recommendations.
    pub style_recommendations: bool,
    /// New collection announcements.
    pub new_collections: bool,
    /// Changes to wishlisted items.
    pub wishlist_updates: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            style_recommendations: true,
            new_collections: false,
            wishlist_updates: true,
        }
    }
}

/// Profile visibility settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacySettings {
    /// Profile visible to other users.
    pub public_profile: bool,
    /// Email shown on the public profile.
    pub show_email: bool,
    /// Other users may send messages.
    pub allow_messages: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            public_profile: false,
            show_email: false,
            allow_messages: true,
        }
    }
}
