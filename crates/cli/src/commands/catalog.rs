//! Reel and cloth type browsing.

use super::{CliError, Context, print_json};

pub async fn reels(ctx: &Context, cloth: Option<&str>) -> Result<(), CliError> {
    let reels = match cloth {
        Some(cloth) => ctx.api().search_reels_by_cloth(cloth).await?,
        None => ctx.api().get_reels().await?,
    };
    print_json(&reels)
}

pub async fn cloth(ctx: &Context, query: Option<&str>) -> Result<(), CliError> {
    let types = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(query) => ctx.api().search_cloth_types(query).await?,
        None => ctx.api().get_cloth_types().await?,
    };
    print_json(&types)
}
