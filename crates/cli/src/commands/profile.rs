//! Profile commands.

#![allow(clippy::print_stdout)]

use std::path::Path;

use staybnb_core::{PasswordChange, ProfileUpdate, UserProfile, member_since};

use super::{CliError, Context, print_json, read_image};

pub async fn show(ctx: &Context) -> Result<(), CliError> {
    let user = ctx.sync.refresh_profile().await?;
    print_profile(&user);
    Ok(())
}

pub async fn update(
    ctx: &Context,
    name: &str,
    skin_tone: &str,
    body_shape: &str,
    preferences: &str,
) -> Result<(), CliError> {
    let update = ProfileUpdate::from_form(name, skin_tone, body_shape, preferences)
        .map_err(staybnb_client::ApiError::from)?;

    // Restore the cached user so a logged-out session is caught locally
    ctx.sync.bootstrap().await;
    let user = ctx.sync.update_profile(update).await?;
    println!("Profile updated");
    print_profile(&user);
    Ok(())
}

pub async fn change_password(
    ctx: &Context,
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), CliError> {
    let change =
        PasswordChange::from_form(current, new, confirm).map_err(staybnb_client::ApiError::from)?;
    ctx.api().change_password(&change).await?;
    println!("Password changed");
    Ok(())
}

pub async fn upload_avatar(ctx: &Context, file: &Path) -> Result<(), CliError> {
    let image = read_image(file)?;
    let response = ctx.api().upload_avatar(image).await?;
    println!("Avatar uploaded");
    print_json(&response)
}

fn print_profile(user: &UserProfile) {
    println!("[{}] {}", user.initial(), user.name);
    println!("Email:       {}", user.email);
    if let Some(tone) = &user.skin_tone {
        println!("Skin tone:   {tone}");
    }
    if let Some(shape) = &user.body_shape {
        println!("Body shape:  {shape}");
    }
    if !user.preferences.is_empty() {
        println!("Preferences: {}", user.preferences.join(", "));
    }
    if let (Some(joined), Some(created_at)) = (user.joined_on(), user.created_at) {
        println!(
            "Joined:      {joined} ({})",
            member_since(created_at, chrono::Utc::now())
        );
    }
}
