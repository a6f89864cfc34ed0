//! Style analysis result types.
//!
//! Results carry an [`AnalysisSource`] so a front-end can always tell a
//! placeholder result apart from one produced by the remote analysis service.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Where an analysis result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    /// Uniformly sampled from fixed lists. Not real inference.
    Placeholder,
    /// Returned by the remote `/analysis` endpoints.
    Remote,
}

/// A named set of colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    /// Season name, e.g. "Autumn Warm".
    pub name: String,
    /// Short description, when the palette has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Hex colors, e.g. `#8B4513`.
    pub colors: Vec<String>,
}

/// A suggested hairstyle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hairstyle {
    /// Style name.
    pub name: String,
    /// Why it suits the user.
    pub description: String,
}

/// An outfit suggestion tied to an occasion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitSuggestion {
    /// The outfit.
    pub outfit: String,
    /// The occasion, e.g. "Business".
    pub occasion: String,
}

/// Full style analysis of an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleAnalysis {
    /// How the result was produced.
    pub source: AnalysisSource,
    /// Face shape.
    pub face_shape: String,
    /// Skin tone.
    pub skin_tone: String,
    /// Skin undertone.
    pub undertone: String,
    /// Body shape.
    pub body_shape: String,
    /// Recommended palette.
    pub palette: ColorPalette,
    /// Recommended hairstyle.
    pub hairstyle: Hairstyle,
    /// Outfit suggestions.
    pub outfits: Vec<OutfitSuggestion>,
}

impl StyleAnalysis {
    /// Whether this result is placeholder output.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.source, AnalysisSource::Placeholder)
    }
}

/// Gender used to pick recommendation sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// All genders, in display order.
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    /// Path segment and display form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid gender: {s}")),
        }
    }
}

/// One occasion with its suggested items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationCategory {
    /// Occasion, e.g. "formal".
    pub name: String,
    /// Suggested items.
    pub items: Vec<String>,
}

/// Per-occasion wardrobe suggestions for a gender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderRecommendations {
    /// How the result was produced.
    pub source: AnalysisSource,
    /// Gender the suggestions are for.
    pub gender: Gender,
    /// Suggestions grouped by occasion.
    pub categories: Vec<RecommendationCategory>,
}

impl GenderRecommendations {
    /// Whether this result is placeholder output.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self.source, AnalysisSource::Placeholder)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse_and_display() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("robot".parse::<Gender>().is_err());
        for gender in Gender::ALL {
            assert_eq!(gender.to_string().parse::<Gender>().unwrap(), gender);
        }
    }

    #[test]
    fn test_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AnalysisSource::Placeholder).unwrap(),
            "\"placeholder\""
        );
    }
}
