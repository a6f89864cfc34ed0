//! User profile types.
//!
//! [`UserProfile`] is the client's cached copy of the server-side user. It is
//! never authoritative: writes go through [`ProfileUpdate`] and the API, and
//! the server's response replaces the cache.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::email::Email;
use super::id::UserId;
use super::validation::ValidationError;

/// The authenticated person, as returned by `/users/profile` and the auth
/// endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Server-assigned user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: Email,
    /// Self-reported skin tone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
    /// Self-reported body shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_shape: Option<String>,
    /// Free-form style preferences.
    #[serde(
        default,
        deserialize_with = "deserialize_preferences",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub preferences: Vec<String>,
    /// When the account was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Avatar initial: the upper-cased first character of the name, or `U`.
    #[must_use]
    pub fn initial(&self) -> char {
        self.name
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }

    /// Account creation date formatted like `January 5, 2024`.
    #[must_use]
    pub fn joined_on(&self) -> Option<String> {
        self.created_at
            .map(|at| at.format("%B %-d, %Y").to_string())
    }
}

/// Preferences arrive either as a JSON array or as one comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPreferences {
    List(Vec<String>),
    Text(String),
}

fn deserialize_preferences<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawPreferences>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawPreferences::List(list)) => list,
        Some(RawPreferences::Text(text)) => ProfileUpdate::parse_preferences(&text),
    })
}

/// Relative "member since" label based on the calendar-month difference.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use staybnb_core::member_since;
///
/// let now = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
/// let joined = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
/// assert_eq!(member_since(joined, now), "3 months ago");
/// ```
#[must_use]
pub fn member_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let months = (now.year() - created_at.year()) * 12
        + (i32::try_from(now.month()).unwrap_or(0) - i32::try_from(created_at.month()).unwrap_or(0));

    match months {
        i32::MIN..=0 => "This month".to_owned(),
        1 => "1 month ago".to_owned(),
        2..=11 => format!("{months} months ago"),
        _ => {
            let years = months / 12;
            if years == 1 {
                "1 year ago".to_owned()
            } else {
                format!("{years} years ago")
            }
        }
    }
}

/// Body of `PUT /users/profile`.
///
/// Optional fields are always serialized; an empty field is sent as `null`
/// so the server clears it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// New display name (required).
    pub name: String,
    /// New skin tone, or `None` to clear.
    pub skin_tone: Option<String>,
    /// New body shape, or `None` to clear.
    pub body_shape: Option<String>,
    /// New preference list, or `None` to clear.
    pub preferences: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// Build an update from raw form input.
    ///
    /// Blank optional fields become `None` and `preferences` is parsed from a
    /// comma-separated string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if the name is blank.
    pub fn from_form(
        name: &str,
        skin_tone: &str,
        body_shape: &str,
        preferences: &str,
    ) -> Result<Self, ValidationError> {
        let update = Self {
            name: name.trim().to_owned(),
            skin_tone: non_blank(skin_tone),
            body_shape: non_blank(body_shape),
            preferences: Some(Self::parse_preferences(preferences)).filter(|p| !p.is_empty()),
        };
        update.validate()?;
        Ok(update)
    }

    /// Check the update before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyField`] if the name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        Ok(())
    }

    /// Split a comma-separated preference string, trimming entries and
    /// dropping empty ones.
    #[must_use]
    pub fn parse_preferences(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
