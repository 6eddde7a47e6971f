//! Hosted product table commands.

use anyhow::{bail, Context as _, Result};
use hogar_core::catalog::{Catalog, Product};
use hogar_core::persist::StorefrontState;
use hogar_core::ProductId;

use super::{confirm, needs_confirmation, preview_changes, RemoteArgs, RemoteCommand};
use crate::commands::products::validate_draft;
use crate::context::Context;

/// Run the remote command.
pub async fn run(args: RemoteArgs, ctx: &Context) -> Result<()> {
    let mut remote = ctx.remote_catalog()?;

    let spinner = ctx.output.spinner("Cargando productos...");
    let fetched = remote.fetch().await;
    spinner.finish_and_clear();
    fetched.context("Error al cargar productos")?;

    match args.command {
        RemoteCommand::List => {
            if ctx.output.is_json() {
                ctx.output.json(&remote.products());
                return Ok(());
            }
            ctx.output.header("Productos remotos");
            ctx.output.product_table(remote.products());
            ctx.output.info("");
            ctx.output
                .info(&format!("Total: {} producto(s)", remote.products().len()));
        }
        RemoteCommand::Add(form) => {
            let draft = form.to_draft();
            validate_draft(&draft, form.offer, ctx)?;

            let spinner = ctx.output.spinner("Guardando...");
            let stored = remote.add(&draft).await;
            spinner.finish_and_clear();
            let stored = stored.context("Error al agregar producto")?;
            ctx.output
                .success(&format!("Producto agregado: {} ({})", stored.name, stored.id));
        }
        RemoteCommand::Update(changes) => {
            let Some(current) = remote.get(changes.id) else {
                bail!(not_in_remote(changes.id));
            };
            let (patch, preview) = preview_changes(current, &changes)?;
            validate_draft(&preview.to_draft(), false, ctx)?;

            let spinner = ctx.output.spinner("Guardando...");
            let updated = remote.update(changes.id, &patch).await;
            spinner.finish_and_clear();
            updated.context("Error al actualizar producto")?;
            ctx.output.success(&format!("Producto actualizado: {}", preview.name));
        }
        RemoteCommand::Delete { id, yes } => {
            let Some(name) = remote.get(id).map(|p| p.name.clone()) else {
                bail!(not_in_remote(id));
            };
            if needs_confirmation(yes, 1)
                && !confirm(format!("¿Eliminar '{}' de la tabla remota de forma permanente?", name))?
            {
                ctx.output.info("Cancelado.");
                return Ok(());
            }

            let spinner = ctx.output.spinner("Eliminando...");
            let deleted = remote.delete(id).await;
            spinner.finish_and_clear();
            deleted.context("Error al eliminar producto")?;
            ctx.output.success(&format!("Producto eliminado: {}", name));
        }
        RemoteCommand::Pull { yes } => {
            let (cache, mut state) = ctx.state()?;
            let local = state.catalog.len();
            if needs_confirmation(yes, local)
                && !confirm(format!(
                    "¿Reemplazar los {} producto(s) locales con {} producto(s) remotos?",
                    local,
                    remote.products().len()
                ))?
            {
                ctx.output.info("Cancelado.");
                return Ok(());
            }

            let count = pull_into(&mut state, remote.products());
            state.save_catalog(&cache);
            tracing::info!(count, "remote catalog pulled");
            ctx.output.success(&format!(
                "{} producto(s) copiados al almacenamiento local",
                count
            ));
        }
    }
    Ok(())
}

fn not_in_remote(id: ProductId) -> String {
    format!("Producto {} no encontrado en la tabla remota", id)
}

/// Replace the local active products with `products`. The trash is kept.
fn pull_into(state: &mut StorefrontState, products: &[Product]) -> usize {
    let trash = state.catalog.trash().to_vec();
    state.catalog = Catalog::from_parts(products.to_vec(), trash);
    state.catalog.len()
}
