//! Placeholder style analysis.
//!
//! Results are uniform random picks from fixed lists and are labeled
//! [`AnalysisSource::Placeholder`]. This is not inference; real analysis goes
//! through [`crate::ApiClient::analyze_image`].

use rand::Rng;
use rand::seq::IndexedRandom;
use staybnb_core::{
    AnalysisSource, ColorPalette, Gender, GenderRecommendations, Hairstyle, OutfitSuggestion,
    RecommendationCategory, StyleAnalysis,
};

const FACE_SHAPES: &[&str] = &["Oval", "Round", "Square", "Heart", "Diamond", "Long"];
const SKIN_TONES: &[&str] = &["Fair", "Light", "Medium", "Olive", "Brown", "Dark"];
const UNDERTONES: &[&str] = &["Warm", "Cool", "Neutral"];
const BODY_SHAPES: &[&str] = &["Hourglass", "Pear", "Apple", "Rectangle", "Inverted Triangle"];

/// `(name, description, colors)`
type PaletteEntry = (&'static str, Option<&'static str>, [&'static str; 4]);

const ANALYSIS_PALETTES: &[PaletteEntry] = &[
    ("Autumn Warm", None, ["#8B4513", "#D2691E", "#CD853F", "#DEB887"]),
    ("Spring Fresh", None, ["#98FB98", "#F0E68C", "#FFB6C1", "#E6E6FA"]),
    ("Winter Cool", None, ["#000080", "#4169E1", "#708090", "#FFFFFF"]),
    ("Summer Soft", None, ["#87CEEB", "#D8BFD8", "#FFDAB9", "#F5F5DC"]),
];

const COLOR_SCIENCE_PALETTES: &[PaletteEntry] = &[
    (
        "Spring Fresh",
        Some("Bright and warm colors"),
        ["#FF6B6B", "#4ECDC4", "#FFE66D", "#95E1D3"],
    ),
    (
        "Summer Soft",
        Some("Cool and muted tones"),
        ["#A8D8EA", "#AA96DA", "#FCBAD3", "#FFFFD2"],
    ),
    (
        "Autumn Warm",
        Some("Rich and earthy tones"),
        ["#8B4513", "#D2691E", "#CD853F", "#DEB887"],
    ),
    (
        "Winter Cool",
        Some("Bold and contrast"),
        ["#000080", "#4169E1", "#DC143C", "#FFFFFF"],
    ),
];

const HAIRSTYLES: &[(&str, &str)] = &[
    ("Layered Bob", "Flatters your face shape perfectly"),
    ("Long Waves", "Adds softness and volume"),
    ("Textured Pixie", "Modern and chic look"),
    ("Side Swept Bangs", "Sophisticated and elegant"),
    ("Beachy Waves", "Casual and effortless style"),
];

const OUTFITS: &[(&str, &str)] = &[
    ("Navy blazer with cream trousers", "Business"),
    ("Rust midi dress with leather jacket", "Casual"),
    ("Burgundy formal suit", "Formal"),
    ("Denim on denim with statement belt", "Weekend"),
];

/// `(category, items)` per gender, in display order.
type Recommendations = [(&'static str, &'static [&'static str]); 4];

const MALE: Recommendations = [
    ("formal", &["Classic suits", "Oxford shirts", "Leather belts"]),
    ("business", &["Blazers", "Dress pants", "Leather shoes"]),
    ("casual", &["Polo shirts", "Chinos", "Sneakers"]),
    ("party", &["Smart casual", "Statement watches"]),
];

const FEMALE: Recommendations = [
    ("formal", &["Evening gowns", "Silk blouses", "Diamond jewelry"]),
    ("business", &["Pencil skirts", "Blazers", "Professional dresses"]),
    ("casual", &["Maxi dresses", "Denim", "Ballet flats"]),
    ("party", &["Cocktail dresses", "Statement jewelry"]),
];

const OTHER: Recommendations = [
    ("formal", &["Tailored outfits", "Statement pieces"]),
    ("business", &["Smart casual", "Layered looks"]),
    ("casual", &["Mix and match", "Comfortable fits"]),
    ("party", &["Bold choices", "Unique combinations"]),
];

/// Generator for placeholder analysis results.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderAnalyzer;

impl PlaceholderAnalyzer {
    /// A random full analysis.
    pub fn analyze<R: Rng + ?Sized>(self, rng: &mut R) -> StyleAnalysis {
        let (name, description) = pick(rng, HAIRSTYLES);

        StyleAnalysis {
            source: AnalysisSource::Placeholder,
            face_shape: pick(rng, FACE_SHAPES).to_string(),
            skin_tone: pick(rng, SKIN_TONES).to_string(),
            undertone: pick(rng, UNDERTONES).to_string(),
            body_shape: pick(rng, BODY_SHAPES).to_string(),
            palette: palette(pick(rng, ANALYSIS_PALETTES)),
            hairstyle: Hairstyle {
                name: name.to_string(),
                description: description.to_string(),
            },
            outfits: OUTFITS
                .iter()
                .map(|(outfit, occasion)| OutfitSuggestion {
                    outfit: (*outfit).to_string(),
                    occasion: (*occasion).to_string(),
                })
                .collect(),
        }
    }

    /// A random seasonal color palette with a description.
    pub fn color_science<R: Rng + ?Sized>(self, rng: &mut R) -> ColorPalette {
        palette(pick(rng, COLOR_SCIENCE_PALETTES))
    }

    /// Wardrobe suggestions for `gender`, grouped by occasion.
    #[must_use]
    pub fn gender_recommendations(self, gender: Gender) -> GenderRecommendations {
        let table = match gender {
            Gender::Male => &MALE,
            Gender::Female => &FEMALE,
            Gender::Other => &OTHER,
        };

        GenderRecommendations {
            source: AnalysisSource::Placeholder,
            gender,
            categories: table
                .iter()
                .map(|(name, items)| RecommendationCategory {
                    name: (*name).to_string(),
                    items: items.iter().map(|item| (*item).to_string()).collect(),
                })
                .collect(),
        }
    }
}

// Every list above is a non-empty constant.
#[allow(clippy::indexing_slicing)]
fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    items.choose(rng).unwrap_or(&items[0])
}

fn palette(&(name, description, colors): &PaletteEntry) -> ColorPalette {
    ColorPalette {
        name: name.to_string(),
        description: description.map(str::to_string),
        colors: colors.iter().map(|c| (*c).to_string()).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_analysis_draws_from_fixed_lists() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let analysis = PlaceholderAnalyzer.analyze(&mut rng);
            assert!(analysis.is_placeholder());
            assert!(FACE_SHAPES.contains(&analysis.face_shape.as_str()));
            assert!(SKIN_TONES.contains(&analysis.skin_tone.as_str()));
            assert!(UNDERTONES.contains(&analysis.undertone.as_str()));
            assert!(BODY_SHAPES.contains(&analysis.body_shape.as_str()));
            assert!(
                ANALYSIS_PALETTES
                    .iter()
                    .any(|(name, _, _)| *name == analysis.palette.name)
            );
            assert_eq!(analysis.palette.colors.len(), 4);
            assert_eq!(analysis.outfits.len(), OUTFITS.len());
        }
    }

    #[test]
    fn test_same_seed_same_analysis() {
        let a = PlaceholderAnalyzer.analyze(&mut StdRng::seed_from_u64(42));
        let b = PlaceholderAnalyzer.analyze(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_color_science_has_description() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let palette = PlaceholderAnalyzer.color_science(&mut rng);
            assert!(palette.description.is_some());
            assert_eq!(palette.colors.len(), 4);
        }
    }

    #[test]
    fn test_gender_recommendations_cover_all_occasions() {
        for gender in Gender::ALL {
            let recs = PlaceholderAnalyzer.gender_recommendations(gender);
            assert!(recs.is_placeholder());
            assert_eq!(recs.gender, gender);
            let names: Vec<_> = recs.categories.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, ["formal", "business", "casual", "party"]);
            assert!(recs.categories.iter().all(|c| !c.items.is_empty()));
        }

        let female = PlaceholderAnalyzer.gender_recommendations(Gender::Female);
        assert_eq!(female.categories[0].items[0], "Evening gowns");
    }
}
