//! WhatsApp checkout handoff.

use anyhow::{bail, Result};
use hogar_core::checkout::{Handoff, WhatsApp};
use hogar_core::persist::StorefrontState;
use hogar_core::ProductId;

use super::{product_not_found, CheckoutArgs};
use crate::commands::cart::print_summary;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let whatsapp = ctx.whatsapp();

    if let Some(id) = args.ask {
        let (_, state) = ctx.state()?;
        let (message, link) = inquiry(&state, &whatsapp, id)?;
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({ "product": id, "link": link }));
        } else {
            ctx.output.info(&message);
            ctx.output.info("");
            println!("{}", link);
        }
        return Ok(());
    }

    let (cache, mut state) = ctx.state()?;
    let handoff = hand_off(&mut state, &whatsapp, args.keep)?;
    state.save_cart(&cache);
    state.save_coupons(&cache);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "summary": handoff.summary,
            "link": handoff.link,
            "couponUses": handoff.coupon_uses,
        }));
        return Ok(());
    }

    ctx.output.header("Pedido por WhatsApp");
    print_summary(&handoff.summary, ctx);
    ctx.output.info("");
    ctx.output.success("Abre este enlace para enviar tu pedido:");
    println!("{}", handoff.link);
    Ok(())
}

/// Inquiry message and link for one product.
fn inquiry(state: &StorefrontState, whatsapp: &WhatsApp, id: ProductId) -> Result<(String, String)> {
    let Some(product) = state.catalog.get(id) else {
        bail!(product_not_found(id));
    };
    Ok((
        WhatsApp::product_message(&product.name, product.price),
        whatsapp.product_inquiry_link(product),
    ))
}

/// Build the order link and count the coupon use. The cart and its coupon
/// are cleared unless `keep` is set.
fn hand_off(state: &mut StorefrontState, whatsapp: &WhatsApp, keep: bool) -> Result<Handoff> {
    let Some(handoff) = whatsapp.checkout(&state.cart, &mut state.coupons) else {
        bail!("Tu carrito está vacío");
    };
    if !keep {
        state.cart.clear();
        state.coupons.clear_applied();
    }
    Ok(handoff)
}
