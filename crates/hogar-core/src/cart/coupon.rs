//! Coupon rules and the single applied-coupon slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CommerceError;
use crate::format::{format_number, format_price};
use crate::money::Money;

/// How a coupon's `discount` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    /// `discount` is a percent of the subtotal.
    Percentage,
    /// `discount` is a flat peso amount.
    Fixed,
}

/// A discount rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: String,
    pub discount: f64,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_purchase: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Coupon {
    /// An active percent-off coupon.
    pub fn percentage(code: impl Into<String>, percent: f64) -> Self {
        Self::new(code, percent, CouponType::Percentage)
    }

    /// An active flat-amount coupon.
    pub fn fixed(code: impl Into<String>, amount: impl Into<Money>) -> Self {
        Self::new(code, amount.into().amount(), CouponType::Fixed)
    }

    fn new(code: impl Into<String>, discount: f64, coupon_type: CouponType) -> Self {
        Self {
            code: code.into(),
            discount,
            coupon_type,
            min_purchase: None,
            max_uses: None,
            used_count: 0,
            expires_at: None,
            is_active: true,
        }
    }

    pub fn with_min_purchase(mut self, amount: impl Into<Money>) -> Self {
        self.min_purchase = Some(amount.into());
        self
    }

    pub fn with_max_uses(mut self, max: u32) -> Self {
        self.max_uses = Some(max);
        self
    }

    pub fn with_expiry(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Case-insensitive code comparison, including accented letters.
    pub fn matches(&self, code: &str) -> bool {
        normalize_code(&self.code) == normalize_code(code)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(false, |at| at < now)
    }

    /// A limit of zero means unlimited.
    pub fn is_exhausted(&self) -> bool {
        self.max_uses
            .filter(|&max| max > 0)
            .map_or(false, |max| self.used_count >= max)
    }

    /// Discount this coupon gives on `subtotal`. Fixed amounts are not
    /// capped at the subtotal.
    pub fn discount_for(&self, subtotal: Money) -> Money {
        match self.coupon_type {
            CouponType::Percentage => subtotal.percentage(self.discount),
            CouponType::Fixed => Money::new(self.discount),
        }
    }

    /// The rate as shown to the shopper: "10%" or "$5.000".
    pub fn rate_label(&self) -> String {
        match self.coupon_type {
            CouponType::Percentage => format!("{}%", format_number(self.discount)),
            CouponType::Fixed => format_price(Money::new(self.discount)),
        }
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Why a code could not be applied. Checks run in declaration order and the
/// first failing one is reported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CouponRejection {
    #[error("Cupón no válido")]
    InvalidCode,

    #[error("Este cupón ya no está activo")]
    Inactive,

    #[error("Este cupón ha expirado")]
    Expired,

    #[error("Este cupón ha alcanzado su límite de usos")]
    UsageLimitReached,

    #[error("Compra mínima de {minimum} requerida")]
    MinimumPurchaseNotMet { minimum: Money },
}

/// A successful application.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponApplied {
    pub code: String,
    /// Discount on the subtotal the coupon was applied against.
    pub discount: Money,
    pub message: String,
}

/// The coupon list plus the cart session's applied slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CouponBook {
    pub coupons: Vec<Coupon>,
    /// Copy of the coupon as it was when applied.
    #[serde(default)]
    pub applied_coupon: Option<Coupon>,
}

impl Default for CouponBook {
    fn default() -> Self {
        Self::new(default_coupons())
    }
}

impl CouponBook {
    pub fn new(coupons: Vec<Coupon>) -> Self {
        Self {
            coupons,
            applied_coupon: None,
        }
    }

    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    pub fn applied(&self) -> Option<&Coupon> {
        self.applied_coupon.as_ref()
    }

    pub fn find(&self, code: &str) -> Option<&Coupon> {
        self.coupons.iter().find(|c| c.matches(code))
    }

    /// Register a coupon. Its use counter starts at zero.
    pub fn add_coupon(&mut self, mut coupon: Coupon) -> Result<(), CommerceError> {
        if coupon.code.trim().is_empty() {
            return Err(CommerceError::ValidationError(
                "el código del cupón no puede estar vacío".to_string(),
            ));
        }
        if self.find(&coupon.code).is_some() {
            return Err(CommerceError::DuplicateCoupon(coupon.code));
        }
        coupon.used_count = 0;
        tracing::debug!(code = %coupon.code, "coupon added");
        self.coupons.push(coupon);
        Ok(())
    }

    /// Drop a coupon. An applied copy stays in the slot until cleared.
    pub fn remove_coupon(&mut self, code: &str) -> bool {
        let before = self.coupons.len();
        self.coupons.retain(|c| !c.matches(code));
        self.coupons.len() != before
    }

    /// Flip a coupon's active flag. Returns the new state.
    pub fn toggle_active(&mut self, code: &str) -> Option<bool> {
        let coupon = self.coupons.iter_mut().find(|c| c.matches(code))?;
        coupon.is_active = !coupon.is_active;
        Some(coupon.is_active)
    }

    /// Apply `code` against `subtotal` at the current time.
    pub fn apply(&mut self, code: &str, subtotal: Money) -> Result<CouponApplied, CouponRejection> {
        self.apply_at(code, subtotal, Utc::now())
    }

    /// Apply `code` against `subtotal`, judging expiry at `now`.
    ///
    /// On success the coupon fills the applied slot, replacing any previous
    /// one. The use counter is left alone; see [`redeem_applied`](Self::redeem_applied).
    pub fn apply_at(
        &mut self,
        code: &str,
        subtotal: Money,
        now: DateTime<Utc>,
    ) -> Result<CouponApplied, CouponRejection> {
        let coupon = self.find(code).ok_or(CouponRejection::InvalidCode)?;

        if !coupon.is_active {
            return Err(CouponRejection::Inactive);
        }
        if coupon.is_expired_at(now) {
            return Err(CouponRejection::Expired);
        }
        if coupon.is_exhausted() {
            return Err(CouponRejection::UsageLimitReached);
        }
        if let Some(minimum) = coupon.min_purchase {
            if subtotal < minimum {
                return Err(CouponRejection::MinimumPurchaseNotMet { minimum });
            }
        }

        let applied = CouponApplied {
            code: coupon.code.clone(),
            discount: coupon.discount_for(subtotal),
            message: format!("¡Cupón aplicado! Descuento: {}", coupon.rate_label()),
        };
        self.applied_coupon = Some(coupon.clone());
        tracing::debug!(code = %applied.code, discount = applied.discount.amount(), "coupon applied");
        Ok(applied)
    }

    /// Discount of the applied coupon on `subtotal`; zero when none is
    /// applied. Not clamped to the subtotal.
    pub fn calculate_discount(&self, subtotal: Money) -> Money {
        self.applied_coupon
            .as_ref()
            .map_or(Money::zero(), |c| c.discount_for(subtotal))
    }

    pub fn clear_applied(&mut self) {
        self.applied_coupon = None;
    }

    /// Count one use of the applied coupon. Returns the new count, or `None`
    /// when nothing is applied or the coupon has since been removed.
    pub fn redeem_applied(&mut self) -> Option<u32> {
        let applied = self.applied_coupon.as_mut()?;
        let coupon = self.coupons.iter_mut().find(|c| c.matches(&applied.code))?;
        coupon.used_count = coupon.used_count.saturating_add(1);
        applied.used_count = coupon.used_count;
        tracing::debug!(code = %coupon.code, used = coupon.used_count, "coupon redeemed");
        Some(coupon.used_count)
    }
}

/// Coupons shipped with the store.
pub fn default_coupons() -> Vec<Coupon> {
    vec![
        Coupon::percentage("BIENVENIDO10", 10.0).with_min_purchase(50000.0),
        Coupon::fixed("ENVIOGRATIS", 5000.0).with_min_purchase(100000.0),
        Coupon::percentage("VERANO20", 20.0)
            .with_min_purchase(150000.0)
            .with_max_uses(50),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_welcome_coupon_discount() {
        let mut book = CouponBook::default();
        let applied = book.apply("BIENVENIDO10", Money::new(60000.0)).unwrap();
        assert_eq!(applied.discount, Money::new(6000.0));
        assert_eq!(applied.message, "¡Cupón aplicado! Descuento: 10%");
        assert_eq!(book.applied().map(|c| c.code.as_str()), Some("BIENVENIDO10"));
    }

    #[test]
    fn test_minimum_purchase_rejection() {
        let mut book = CouponBook::default();
        let err = book.apply("BIENVENIDO10", Money::new(40000.0)).unwrap_err();
        assert_eq!(
            err,
            CouponRejection::MinimumPurchaseNotMet {
                minimum: Money::new(50000.0)
            }
        );
        assert_eq!(err.to_string(), "Compra mínima de $50.000 requerida");
        assert!(book.applied().is_none());
    }

    #[test]
    fn test_code_is_case_insensitive() {
        let mut book = CouponBook::default();
        assert!(book.apply("bienvenido10", Money::new(60000.0)).is_ok());
    }

    #[test]
    fn test_unknown_code() {
        let mut book = CouponBook::default();
        let err = book.apply("NOEXISTE", Money::new(60000.0)).unwrap_err();
        assert_eq!(err.to_string(), "Cupón no válido");
    }

    #[test]
    fn test_rejection_order() {
        let now = Utc::now();
        let coupon = Coupon::percentage("MALO", 10.0)
            .with_expiry(now - Duration::days(1))
            .with_max_uses(1)
            .with_min_purchase(1_000_000.0)
            .inactive();
        let mut book = CouponBook::new(vec![coupon]);

        assert_eq!(book.apply_at("MALO", Money::zero(), now), Err(CouponRejection::Inactive));
        book.toggle_active("MALO");
        assert_eq!(book.apply_at("MALO", Money::zero(), now), Err(CouponRejection::Expired));
        book.coupons[0].expires_at = None;
        book.coupons[0].used_count = 1;
        assert_eq!(
            book.apply_at("MALO", Money::zero(), now),
            Err(CouponRejection::UsageLimitReached)
        );
        book.coupons[0].max_uses = None;
        assert!(matches!(
            book.apply_at("MALO", Money::zero(), now),
            Err(CouponRejection::MinimumPurchaseNotMet { .. })
        ));
    }

    #[test]
    fn test_apply_does_not_count_use() {
        let mut book = CouponBook::default();
        book.apply("VERANO20", Money::new(200000.0)).unwrap();
        assert_eq!(book.find("VERANO20").unwrap().used_count, 0);

        assert_eq!(book.redeem_applied(), Some(1));
        assert_eq!(book.find("VERANO20").unwrap().used_count, 1);
        assert_eq!(book.applied().unwrap().used_count, 1);
    }

    #[test]
    fn test_redeem_without_applied() {
        let mut book = CouponBook::default();
        assert_eq!(book.redeem_applied(), None);
    }

    #[test]
    fn test_fixed_coupon() {
        let mut book = CouponBook::default();
        let applied = book.apply("ENVIOGRATIS", Money::new(120000.0)).unwrap();
        assert_eq!(applied.discount, Money::new(5000.0));
        assert_eq!(applied.message, "¡Cupón aplicado! Descuento: $5.000");
    }

    #[test]
    fn test_calculate_discount_follows_subtotal() {
        let mut book = CouponBook::default();
        assert_eq!(book.calculate_discount(Money::new(100000.0)), Money::zero());

        book.apply("BIENVENIDO10", Money::new(60000.0)).unwrap();
        assert_eq!(book.calculate_discount(Money::new(80000.0)), Money::new(8000.0));

        book.clear_applied();
        assert_eq!(book.calculate_discount(Money::new(80000.0)), Money::zero());
    }

    #[test]
    fn test_fixed_discount_is_not_clamped() {
        let mut book = CouponBook::new(vec![Coupon::fixed("FIJO", 5000.0)]);
        book.apply("FIJO", Money::new(1000.0)).unwrap();
        let discount = book.calculate_discount(Money::new(1000.0));
        assert!((Money::new(1000.0) - discount).is_negative());
    }

    #[test]
    fn test_coupon_admin() {
        let mut book = CouponBook::default();
        let mut coupon = Coupon::percentage("OTONO15", 15.0);
        coupon.used_count = 9;
        book.add_coupon(coupon).unwrap();
        assert_eq!(book.find("otono15").unwrap().used_count, 0);

        let err = book.add_coupon(Coupon::fixed("otono15", 1000.0)).unwrap_err();
        assert!(matches!(err, CommerceError::DuplicateCoupon(_)));
        assert_eq!(err.to_string(), "El cupón otono15 ya existe");
        let err = book.add_coupon(Coupon::fixed("  ", 1000.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Dato inválido: el código del cupón no puede estar vacío"
        );

        assert_eq!(book.toggle_active("OTONO15"), Some(false));
        assert_eq!(book.toggle_active("NADA"), None);
        assert!(book.remove_coupon("OTONO15"));
        assert!(!book.remove_coupon("OTONO15"));
        assert_eq!(book.coupons().len(), 3);
    }

    #[test]
    fn test_accented_code_matches_any_case() {
        let mut book = CouponBook::default();
        book.add_coupon(Coupon::percentage("OTOÑO15", 15.0)).unwrap();

        let applied = book.apply(" otoño15 ", Money::new(10000.0)).unwrap();
        assert_eq!(applied.code, "OTOÑO15");
        assert!(matches!(
            book.add_coupon(Coupon::fixed("Otoño15", 1000.0)),
            Err(CommerceError::DuplicateCoupon(_))
        ));
        assert_eq!(book.toggle_active("otoño15"), Some(false));
    }

    #[test]
    fn test_zero_max_uses_is_unlimited() {
        let json = r#"{"code":"LIBRE","discount":5,"type":"percentage","maxUses":0,"usedCount":12,"isActive":true}"#;
        let coupon: Coupon = serde_json::from_str(json).unwrap();
        assert!(!coupon.is_exhausted());

        let mut book = CouponBook::new(vec![coupon]);
        assert!(book.apply("LIBRE", Money::new(1000.0)).is_ok());

        let limited = Coupon::percentage("UNO", 5.0).with_max_uses(1);
        let mut limited_used = limited.clone();
        limited_used.used_count = 1;
        assert!(!limited.is_exhausted());
        assert!(limited_used.is_exhausted());
    }

    #[test]
    fn test_coupon_json_shape() {
        let json = serde_json::to_value(&default_coupons()[2]).unwrap();
        assert_eq!(json["type"], "percentage");
        assert_eq!(json["minPurchase"], 150000.0);
        assert_eq!(json["maxUses"], 50);
        assert_eq!(json["isActive"], true);
    }
}
