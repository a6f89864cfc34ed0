//! Local preference settings.
//!
//! With no flags these print the stored settings; any flag updates that field
//! and saves.

#![allow(clippy::print_stdout)]

use staybnb_core::{NotificationSettings, PrivacySettings};

use super::Context;

/// Requested notification changes; `None` leaves a field as is.
#[derive(Debug, Default)]
pub struct NotificationChanges {
    pub email_notifications: Option<bool>,
    pub style_recommendations: Option<bool>,
    pub new_collections: Option<bool>,
    pub wishlist_updates: Option<bool>,
}

impl NotificationChanges {
    const fn is_empty(&self) -> bool {
        self.email_notifications.is_none()
            && self.style_recommendations.is_none()
            && self.new_collections.is_none()
            && self.wishlist_updates.is_none()
    }

    fn apply(self, settings: &mut NotificationSettings) {
        if let Some(v) = self.email_notifications {
            settings.email_notifications = v;
        }
        if let Some(v) = self.style_recommendations {
            settings.style_recommendations = v;
        }
        if let Some(v) = self.new_collections {
            settings.new_collections = v;
        }
        if let Some(v) = self.wishlist_updates {
            settings.wishlist_updates = v;
        }
    }
}

/// Requested privacy changes; `None` leaves a field as is.
#[derive(Debug, Default)]
pub struct PrivacyChanges {
    pub public_profile: Option<bool>,
    pub show_email: Option<bool>,
    pub allow_messages: Option<bool>,
}

impl PrivacyChanges {
    const fn is_empty(&self) -> bool {
        self.public_profile.is_none() && self.show_email.is_none() && self.allow_messages.is_none()
    }

    fn apply(self, settings: &mut PrivacySettings) {
        if let Some(v) = self.public_profile {
            settings.public_profile = v;
        }
        if let Some(v) = self.show_email {
            settings.show_email = v;
        }
        if let Some(v) = self.allow_messages {
            settings.allow_messages = v;
        }
    }
}

pub fn notifications(ctx: &Context, changes: NotificationChanges) {
    let mut settings = ctx.sync.notification_settings();
    if !changes.is_empty() {
        changes.apply(&mut settings);
        ctx.sync.save_notification_settings(&settings);
        println!("Notification settings saved");
    }

    println!("Email notifications:   {}", settings.email_notifications);
    println!("Style recommendations: {}", settings.style_recommendations);
    println!("New collections:       {}", settings.new_collections);
    println!("Wishlist updates:      {}", settings.wishlist_updates);
}

pub fn privacy(ctx: &Context, changes: PrivacyChanges) {
    let mut settings = ctx.sync.privacy_settings();
    if !changes.is_empty() {
        changes.apply(&mut settings);
        ctx.sync.save_privacy_settings(&settings);
        println!("Privacy settings saved");
    }

    println!("Public profile: {}", settings.public_profile);
    println!("Show email:     {}", settings.show_email);
    println!("Allow messages: {}", settings.allow_messages);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_changes_apply_only_given_fields() {
        let mut settings = NotificationSettings::default();
        NotificationChanges {
            new_collections: Some(true),
            email_notifications: Some(false),
            ..NotificationChanges::default()
        }
        .apply(&mut settings);

        assert!(settings.new_collections);
        assert!(!settings.email_notifications);
        assert!(settings.style_recommendations);
        assert!(settings.wishlist_updates);
    }

    #[test]
    fn test_empty_changes() {
        assert!(NotificationChanges::default().is_empty());
        assert!(PrivacyChanges::default().is_empty());
        assert!(
            !PrivacyChanges {
                show_email: Some(true),
                ..PrivacyChanges::default()
            }
            .is_empty()
        );
    }
}
