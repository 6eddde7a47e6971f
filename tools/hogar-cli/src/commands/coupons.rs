//! Coupon commands.

use anyhow::{bail, Context as _, Result};
use chrono::{DateTime, NaiveDate, Utc};
use hogar_core::cart::Coupon;
use hogar_core::format::{format_date, format_price};

use super::{CouponArgs, CouponCommand};
use crate::context::Context;

/// Run the coupon command.
pub async fn run(args: CouponArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(CouponCommand::List) | None => list_coupons(ctx),
        Some(CouponCommand::Apply { code }) => apply_coupon(&code, ctx),
        Some(CouponCommand::Clear) => clear_coupon(ctx),
        Some(CouponCommand::Add {
            code,
            percent,
            fixed,
            min_purchase,
            max_uses,
            expires,
        }) => {
            let coupon = build_coupon(code, percent, fixed, min_purchase, max_uses, expires)?;
            add_coupon(coupon, ctx)
        }
        Some(CouponCommand::Delete { code }) => delete_coupon(&code, ctx),
        Some(CouponCommand::Toggle { code }) => toggle_coupon(&code, ctx),
    }
}

/// Turn the `coupon add` flags into a coupon. A percentage wins over a
/// fixed amount.
fn build_coupon(
    code: String,
    percent: Option<f64>,
    fixed: Option<f64>,
    min_purchase: Option<f64>,
    max_uses: Option<u32>,
    expires: Option<NaiveDate>,
) -> Result<Coupon> {
    let mut coupon = match (percent, fixed) {
        (Some(p), _) => Coupon::percentage(code, p),
        (None, Some(f)) => Coupon::fixed(code, f),
        (None, None) => bail!("Indica --percent o --fixed"),
    };
    if let Some(min) = min_purchase {
        coupon = coupon.with_min_purchase(min);
    }
    if let Some(max) = max_uses {
        coupon = coupon.with_max_uses(max);
    }
    if let Some(date) = expires {
        coupon = coupon.with_expiry(end_of_day(date)?);
    }
    Ok(coupon)
}

/// Coupons stay valid through the whole expiry day.
fn end_of_day(date: NaiveDate) -> Result<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc())
        .context("Fecha de expiración inválida")
}

/// "3/50" with a limit, the bare count without one. A zero limit is unlimited.
fn uses_cell(coupon: &Coupon) -> String {
    match coupon.max_uses {
        Some(max) if max > 0 => format!("{}/{}", coupon.used_count, max),
        _ => coupon.used_count.to_string(),
    }
}

fn list_coupons(ctx: &Context) -> Result<()> {
    let (_, state) = ctx.state()?;

    if ctx.output.is_json() {
        ctx.output.json(&state.coupons);
        return Ok(());
    }

    ctx.output.header("Cupones");
    const WIDTHS: [usize; 6] = [16, 10, 12, 10, 12, 10];
    ctx.output.table_row(
        &["CÓDIGO", "DESCUENTO", "MÍNIMO", "USOS", "EXPIRA", "ESTADO"],
        &WIDTHS,
    );
    for c in state.coupons.coupons() {
        let minimum = c.min_purchase.map(format_price).unwrap_or_else(|| "-".into());
        let uses = uses_cell(c);
        let expires = c.expires_at.as_ref().map(format_date).unwrap_or_else(|| "-".into());
        let status = if c.is_active {
            console::style("activo").green().to_string()
        } else {
            console::style("inactivo").dim().to_string()
        };
        ctx.output.table_row(
            &[&c.code, &c.rate_label(), &minimum, &uses, &expires, &status],
            &WIDTHS,
        );
    }
    if let Some(applied) = state.coupons.applied() {
        ctx.output.info("");
        ctx.output.info(&format!("Aplicado al carrito: {}", applied.code));
    }
    Ok(())
}

fn apply_coupon(code: &str, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    if state.cart.is_empty() {
        bail!("Tu carrito está vacío");
    }
    let subtotal = state.cart.total_price();
    match state.coupons.apply(code, subtotal) {
        Ok(applied) => {
            state.save_coupons(&cache);
            ctx.output.success(&applied.message);
            ctx.output.kv("descuento", &format_price(applied.discount));
        }
        Err(rejection) => ctx.output.warn(&rejection.to_string()),
    }
    Ok(())
}

fn clear_coupon(ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    state.coupons.clear_applied();
    state.save_coupons(&cache);
    ctx.output.success("Cupón removido");
    Ok(())
}

fn add_coupon(coupon: Coupon, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    let code = coupon.code.clone();
    state.coupons.add_coupon(coupon)?;
    state.save_coupons(&cache);
    ctx.output.success(&format!("Cupón {} creado", code));
    Ok(())
}

fn coupon_not_found(code: &str) -> String {
    format!("Cupón {} no encontrado", code)
}

fn delete_coupon(code: &str, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    if !state.coupons.remove_coupon(code) {
        bail!(coupon_not_found(code));
    }
    state.save_coupons(&cache);
    ctx.output.success(&format!("Cupón {} eliminado", code));
    Ok(())
}

fn toggle_coupon(code: &str, ctx: &Context) -> Result<()> {
    let (cache, mut state) = ctx.state()?;
    let Some(active) = state.coupons.toggle_active(code) else {
        bail!(coupon_not_found(code));
    };
    state.save_coupons(&cache);
    ctx.output.success(&format!(
        "Cupón {} {}",
        code,
        if active { "activado" } else { "desactivado" }
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use hogar_core::cart::CouponType;
    use hogar_core::Money;

    #[test]
    fn test_build_percentage_coupon() {
        let expires = NaiveDate::from_ymd_opt(2030, 12, 31);
        let coupon = build_coupon(
            "NAVIDAD25".into(),
            Some(25.0),
            None,
            Some(80000.0),
            Some(10),
            expires,
        )
        .unwrap();

        assert_eq!(coupon.coupon_type, CouponType::Percentage);
        assert_eq!(coupon.discount, 25.0);
        assert_eq!(coupon.min_purchase, Some(Money::new(80000.0)));
        assert_eq!(coupon.max_uses, Some(10));
        let at = coupon.expires_at.unwrap();
        assert_eq!(at.date_naive(), expires.unwrap());
        assert_eq!((at.hour(), at.minute(), at.second()), (23, 59, 59));
    }

    #[test]
    fn test_build_fixed_coupon() {
        let coupon = build_coupon("RETIRO".into(), None, Some(3000.0), None, None, None).unwrap();
        assert_eq!(coupon.coupon_type, CouponType::Fixed);
        assert_eq!(coupon.rate_label(), "$3.000");
        assert!(coupon.is_active);
    }

    #[test]
    fn test_build_coupon_needs_a_rate() {
        let err = build_coupon("VACIO".into(), None, None, None, None, None).unwrap_err();
        assert_eq!(err.to_string(), "Indica --percent o --fixed");
    }

    #[test]
    fn test_uses_cell() {
        let mut coupon = Coupon::percentage("X", 5.0).with_max_uses(50);
        coupon.used_count = 3;
        assert_eq!(uses_cell(&coupon), "3/50");

        coupon.max_uses = Some(0);
        assert_eq!(uses_cell(&coupon), "3");
        coupon.max_uses = None;
        assert_eq!(uses_cell(&coupon), "3");
    }
}
