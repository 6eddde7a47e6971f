//! Favorites commands.

use anyhow::{bail, Result};
use hogar_core::persist::StorefrontState;
use hogar_core::ProductId;

use super::{product_not_found, FavoritesArgs, FavoritesCommand};
use crate::context::Context;

/// Run the favorites command.
pub async fn run(args: FavoritesArgs, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;

    match args.command {
        Some(FavoritesCommand::List) | None => {
            if ctx.output.is_json() {
                ctx.output.json(&state.favorites.products());
                return Ok(());
            }
            ctx.output.header("Favoritos");
            if state.favorites.is_empty() {
                ctx.output.info("No tienes favoritos todavía.");
            } else {
                ctx.output.product_table(state.favorites.products());
            }
        }
        Some(FavoritesCommand::Toggle { id }) => {
            let message = toggle_favorite(&mut state, id)?;
            state.save_favorites(&cache);
            ctx.output.success(&message);
        }
        Some(FavoritesCommand::Clear) => {
            state.favorites.clear();
            state.save_favorites(&cache);
            ctx.output.success("Favoritos eliminados");
        }
    }
    Ok(())
}

fn toggle_favorite(state: &mut StorefrontState, id: ProductId) -> Result<String> {
    let Some(product) = state.catalog.get(id) else {
        bail!(product_not_found(id));
    };
    let name = product.name.clone();
    if state.favorites.toggle(product) {
        Ok(format!("{} agregado a favoritos", name))
    } else {
        Ok(format!("{} eliminado de favoritos", name))
    }
}
