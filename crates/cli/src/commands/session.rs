//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! staybnb signup -n "Ada" -e ada@example.com -p secret1 -c secret1
//! staybnb signin -e ada@example.com -p secret1
//! staybnb status
//! staybnb signout
//! ```

#![allow(clippy::print_stdout)]

use staybnb_core::{ValidationError, member_since};

use super::{CliError, Context};

/// Restore the saved session, reconcile it with the server and report.
pub async fn status(ctx: &Context) -> Result<(), CliError> {
    ctx.sync.bootstrap().await;
    let snapshot = ctx.sync.snapshot();

    match &snapshot.current_user {
        Some(user) => {
            println!("Signed in as {} <{}>", user.name, user.email);
            if let Some(created_at) = user.created_at {
                println!("Member since: {}", member_since(created_at, chrono::Utc::now()));
            }
        }
        None => println!("Not signed in"),
    }
    println!("Wishlist: {} item(s)", snapshot.wishlist.len());
    Ok(())
}

pub async fn sign_up(
    ctx: &Context,
    name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), CliError> {
    if password != confirm {
        return Err(staybnb_client::ApiError::from(ValidationError::PasswordMismatch).into());
    }

    let user = ctx.sync.sign_up(name, email, password).await?;
    tracing::info!(user_id = %user.id, "Account created");
    println!("Welcome to StayBNB, {}!", user.name);
    Ok(())
}

pub async fn sign_in(ctx: &Context, email: &str, password: &str) -> Result<(), CliError> {
    let user = ctx.sync.sign_in(email, password).await?;
    tracing::info!(user_id = %user.id, "Signed in");
    println!("Welcome back, {}!", user.name);
    Ok(())
}

pub fn sign_out(ctx: &Context) {
    ctx.sync.sign_out();
    println!("Signed out");
}
