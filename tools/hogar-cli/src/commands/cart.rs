//! Shopping cart commands.

use anyhow::{bail, Result};
use hogar_core::cart::{AddOutcome, CartProduct, OrderSummary, QuantityOutcome};
use hogar_core::format::format_price;
use hogar_core::persist::StorefrontState;
use hogar_core::ProductId;

use super::{product_not_found, CartArgs, CartCommand};
use crate::context::Context;

const REMOVED: &str = "Producto eliminado del carrito";

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(CartCommand::Show) | None => show_cart(ctx),
        Some(CartCommand::Add { id }) => add_to_cart(id, ctx),
        Some(CartCommand::Remove { id }) => remove_from_cart(id, ctx),
        Some(CartCommand::Set { id, quantity }) => set_quantity(id, quantity, ctx),
        Some(CartCommand::Clear) => clear_cart(ctx),
        Some(CartCommand::Toggle) => toggle_cart(ctx),
    }
}

fn show_cart(ctx: &Context) -> Result<()> {
    let (_, state) = ctx.state()?;
    let summary = OrderSummary::compute(&state.cart, &state.coupons);

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    ctx.output.header("Carrito");
    if state.cart.is_empty() {
        ctx.output.info("Tu carrito está vacío.");
        return Ok(());
    }
    print_summary(&summary, ctx);
    Ok(())
}

pub(crate) fn print_summary(summary: &OrderSummary, ctx: &Context) {
    const WIDTHS: [usize; 5] = [14, 34, 6, 12, 12];
    ctx.output
        .table_row(&["ID", "PRODUCTO", "CANT", "PRECIO", "SUBTOTAL"], &WIDTHS);
    for line in &summary.lines {
        let id = line.product_id.to_string();
        let qty = line.quantity.to_string();
        let price = format_price(line.unit_price);
        let subtotal = format_price(line.subtotal);
        ctx.output
            .table_row(&[&id, &line.name, &qty, &price, &subtotal], &WIDTHS);
    }
    ctx.output.info("");
    ctx.output.kv("productos", &summary.total_items.to_string());
    ctx.output.kv("subtotal", &format_price(summary.subtotal));
    if let Some(discount) = discount_line(summary) {
        ctx.output.kv("descuento", &discount);
    }
    ctx.output.kv("total", &format_price(summary.grand_total));
}

/// "-$6.000 (BIENVENIDO10, 10%)" when a coupon is applied.
fn discount_line(summary: &OrderSummary) -> Option<String> {
    summary.coupon_code.as_ref().map(|code| {
        format!(
            "-{} ({}, {:.0}%)",
            format_price(summary.discount),
            code,
            summary.discount_percentage()
        )
    })
}

/// Add one unit of a catalog product to the cart.
fn add_product(state: &mut StorefrontState, id: ProductId) -> Result<AddOutcome> {
    let Some(product) = state.catalog.get(id) else {
        bail!(product_not_found(id));
    };
    Ok(state.cart.add_item(CartProduct::from(product)))
}

/// Message for a quantity change, or an error when the line is missing.
fn quantity_message(outcome: QuantityOutcome, id: ProductId, quantity: i64) -> Result<String> {
    match outcome {
        QuantityOutcome::Updated => Ok(format!("Cantidad actualizada: {}", quantity)),
        QuantityOutcome::Removed => Ok(REMOVED.to_string()),
        QuantityOutcome::AboveStock => {
            Ok("No hay más stock disponible de este producto".to_string())
        }
        QuantityOutcome::NotInCart => bail!(not_in_cart(id)),
    }
}

fn not_in_cart(id: ProductId) -> String {
    format!("El producto {} no está en el carrito", id)
}

fn visibility_label(is_open: bool) -> &'static str {
    if is_open {
        "Carrito abierto"
    } else {
        "Carrito cerrado"
    }
}

fn add_to_cart(id: ProductId, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    let outcome = add_product(&mut state, id)?;
    if let Some(message) = outcome.rejection_message() {
        ctx.output.warn(message);
        return Ok(());
    }
    state.save_cart(&cache);
    ctx.output.success(&outcome.to_string());
    Ok(())
}

fn remove_from_cart(id: ProductId, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    if !state.cart.remove_item(id) {
        bail!(not_in_cart(id));
    }
    state.save_cart(&cache);
    ctx.output.success(REMOVED);
    Ok(())
}

fn set_quantity(id: ProductId, quantity: i64, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    let outcome = state.cart.update_quantity(id, quantity);
    let message = quantity_message(outcome, id, quantity)?;
    if outcome == QuantityOutcome::AboveStock {
        ctx.output.warn(&message);
        return Ok(());
    }
    state.save_cart(&cache);
    ctx.output.success(&message);
    Ok(())
}

fn clear_cart(ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    state.cart.clear();
    state.coupons.clear_applied();
    state.save_cart(&cache);
    state.save_coupons(&cache);
    ctx.output.success("Carrito vaciado");
    Ok(())
}

fn toggle_cart(ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    state.cart.toggle();
    state.save_cart(&cache);
    ctx.output.info(visibility_label(state.cart.is_open));
    Ok(())
}
