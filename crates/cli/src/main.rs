//! StayBNB CLI - command-line front-end for the StayBNB client.
//!
//! # Usage
//!
//! ```bash
//! # Restore the saved session and show who is signed in
//! staybnb status
//!
//! # Sign in (password can also come from STAYBNB_PASSWORD)
//! staybnb signin -e a@example.com -p secret1
//!
//! # Toggle a wishlist item
//! staybnb wishlist toggle 7
//!
//! # Placeholder style analysis without uploading
//! staybnb analyze selfie.jpg --offline
//! ```
//!
//! # Environment Variables
//!
//! - `STAYBNB_API_ORIGIN`, `STAYBNB_REQUEST_TIMEOUT_SECS`, `STAYBNB_STORAGE_DIR` - client config
//! - `RUST_LOG` - log filter (default: `staybnb_cli=info,staybnb_client=info`)
//! - `STAYBNB_LOG_FORMAT` - `json` for JSON log lines
//! - `SENTRY_DSN` - enables Sentry error tracking

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use staybnb_core::Gender;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "staybnb")]
#[command(author, version, about = "StayBNB fashion advice from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Restore the saved session and show login state
    Status,
    /// Create an account
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(short, long, env = "STAYBNB_PASSWORD", hide_env_values = true)]
        password: String,

        /// Password again
        #[arg(short, long)]
        confirm: String,
    },
    /// Sign in
    Signin {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "STAYBNB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and clear the saved session
    Signout,
    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Upload a new profile picture
    Avatar {
        /// Image file
        file: PathBuf,
    },
    /// Manage your wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Analyze a photo of yourself
    Analyze {
        /// Image file
        image: PathBuf,

        /// Generate a placeholder result locally instead of uploading
        #[arg(long)]
        offline: bool,
    },
    /// Suggest a seasonal color palette (placeholder)
    Colors,
    /// Wardrobe suggestions by occasion (placeholder)
    Recommend {
        /// male, female or other
        #[arg(short, long, default_value = "female")]
        gender: Gender,
    },
    /// Browse style reels
    Reels {
        /// Only reels featuring this cloth type
        #[arg(long)]
        cloth: Option<String>,
    },
    /// Browse or search cloth types
    Cloth {
        /// Search query
        query: Option<String>,
    },
    /// Local preference settings
    Settings {
        #[command(subcommand)]
        target: SettingsTarget,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Show your profile
    Show,
    /// Update profile fields
    Update {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Skin tone (empty to clear)
        #[arg(long, default_value = "")]
        skin_tone: String,

        /// Body shape (empty to clear)
        #[arg(long, default_value = "")]
        body_shape: String,

        /// Comma-separated style preferences
        #[arg(long, default_value = "")]
        preferences: String,
    },
    /// Change your password
    Password {
        /// Current password
        #[arg(long)]
        current: String,

        /// New password
        #[arg(long)]
        new: String,

        /// New password again
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// List wishlisted items
    List,
    /// Add an item if absent, remove it if present
    Toggle {
        /// Item ID (number or text)
        id: String,
    },
}

#[derive(Subcommand)]
enum SettingsTarget {
    /// Notification settings
    Notifications {
        #[arg(long)]
        email_notifications: Option<bool>,
        #[arg(long)]
        style_recommendations: Option<bool>,
        #[arg(long)]
        new_collections: Option<bool>,
        #[arg(long)]
        wishlist_updates: Option<bool>,
    },
    /// Privacy settings
    Privacy {
        #[arg(long)]
        public_profile: Option<bool>,
        #[arg(long)]
        show_email: Option<bool>,
        #[arg(long)]
        allow_messages: Option<bool>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|d| !d.is_empty())?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "staybnb_cli=info,staybnb_client=info".into());

    let json = std::env::var("STAYBNB_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let (plain_layer, json_layer) = if json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(plain_layer)
        .with(json_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Status => commands::session::status(&ctx).await,
        Commands::Signup {
            name,
            email,
            password,
            confirm,
        } => commands::session::sign_up(&ctx, &name, &email, &password, &confirm).await,
        Commands::Signin { email, password } => {
            commands::session::sign_in(&ctx, &email, &password).await
        }
        Commands::Signout => {
            commands::session::sign_out(&ctx);
            Ok(())
        }
        Commands::Profile { action } => match action {
            ProfileAction::Show => commands::profile::show(&ctx).await,
            ProfileAction::Update {
                name,
                skin_tone,
                body_shape,
                preferences,
            } => {
                commands::profile::update(&ctx, &name, &skin_tone, &body_shape, &preferences).await
            }
            ProfileAction::Password {
                current,
                new,
                confirm,
            } => commands::profile::change_password(&ctx, &current, &new, &confirm).await,
        },
        Commands::Avatar { file } => commands::profile::upload_avatar(&ctx, &file).await,
        Commands::Wishlist { action } => match action {
            WishlistAction::List => commands::wishlist::list(&ctx).await,
            WishlistAction::Toggle { id } => commands::wishlist::toggle(&ctx, &id).await,
        },
        Commands::Analyze { image, offline } => {
            commands::style::analyze(&ctx, &image, offline).await
        }
        Commands::Colors => {
            commands::style::colors();
            Ok(())
        }
        Commands::Recommend { gender } => {
            commands::style::recommend(gender);
            Ok(())
        }
        Commands::Reels { cloth } => commands::catalog::reels(&ctx, cloth.as_deref()).await,
        Commands::Cloth { query } => commands::catalog::cloth(&ctx, query.as_deref()).await,
        Commands::Settings { target } => {
            match target {
                SettingsTarget::Notifications {
                    email_notifications,
                    style_recommendations,
                    new_collections,
                    wishlist_updates,
                } => commands::settings::notifications(
                    &ctx,
                    commands::settings::NotificationChanges {
                        email_notifications,
                        style_recommendations,
                        new_collections,
                        wishlist_updates,
                    },
                ),
                SettingsTarget::Privacy {
                    public_profile,
                    show_email,
                    allow_messages,
                } => commands::settings::privacy(
                    &ctx,
                    commands::settings::PrivacyChanges {
                        public_profile,
                        show_email,
                        allow_messages,
                    },
                ),
            }
            Ok(())
        }
    }
}
