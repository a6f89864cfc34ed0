//! Style analysis commands.
//!
//! `--offline`, `colors` and `recommend` use the placeholder generator and
//! say so in their output.

#![allow(clippy::print_stdout)]

use std::path::Path;

use staybnb_client::PlaceholderAnalyzer;
use staybnb_core::{ColorPalette, Gender, StyleAnalysis};

use super::{CliError, Context, print_json, read_image};

const PLACEHOLDER_NOTICE: &str = "(placeholder result, not a real analysis)";

pub async fn analyze(ctx: &Context, image: &Path, offline: bool) -> Result<(), CliError> {
    let upload = read_image(image)?;

    if offline {
        upload.validate().map_err(staybnb_client::ApiError::from)?;
        print_analysis(&PlaceholderAnalyzer.analyze(&mut rand::rng()));
        return Ok(());
    }

    let result = ctx.api().analyze_image(upload).await?;
    print_json(&result)
}

pub fn colors() {
    let palette = PlaceholderAnalyzer.color_science(&mut rand::rng());
    println!("{PLACEHOLDER_NOTICE}");
    print_palette(&palette);
}

pub fn recommend(gender: Gender) {
    let recs = PlaceholderAnalyzer.gender_recommendations(gender);
    println!("{PLACEHOLDER_NOTICE}");
    println!("Recommendations for {}:", recs.gender);
    for category in &recs.categories {
        println!("  {}: {}", category.name, category.items.join(", "));
    }
}

fn print_analysis(analysis: &StyleAnalysis) {
    if analysis.is_placeholder() {
        println!("{PLACEHOLDER_NOTICE}");
    }
    println!("Face shape:  {}", analysis.face_shape);
    println!("Skin tone:   {}", analysis.skin_tone);
    println!("Undertone:   {}", analysis.undertone);
    println!("Body shape:  {}", analysis.body_shape);
    print_palette(&analysis.palette);
    println!(
        "Hairstyle:   {} - {}",
        analysis.hairstyle.name, analysis.hairstyle.description
    );
    println!("Outfits:");
    for outfit in &analysis.outfits {
        println!("  {} ({})", outfit.outfit, outfit.occasion);
    }
}

fn print_palette(palette: &ColorPalette) {
    match &palette.description {
        Some(description) => println!("Palette:     {} - {description}", palette.name),
        None => println!("Palette:     {}", palette.name),
    }
    println!("Colors:      {}", palette.colors.join(" "));
}
