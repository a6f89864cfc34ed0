//! Wishlist commands.

#![allow(clippy::print_stdout)]

use staybnb_core::ItemId;

use super::{CliError, Context};

pub async fn list(ctx: &Context) -> Result<(), CliError> {
    ctx.sync.bootstrap().await;
    let snapshot = ctx.sync.snapshot();

    if snapshot.wishlist.is_empty() {
        println!("Your wishlist is empty");
        return Ok(());
    }
    for id in &snapshot.wishlist {
        println!("{id}");
    }
    Ok(())
}

pub async fn toggle(ctx: &Context, id: &str) -> Result<(), CliError> {
    ctx.sync.bootstrap().await;

    let id: ItemId = id.into();
    if ctx.sync.toggle_wishlist_item(id.clone()) {
        println!("Added {id} to wishlist");
    } else {
        println!("Removed {id} from wishlist");
    }
    Ok(())
}
