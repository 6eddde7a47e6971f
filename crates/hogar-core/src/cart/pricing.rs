//! Order totals for checkout.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CouponBook};
use crate::ids::ProductId;
use crate::money::Money;

/// Pricing breakdown for a cart with its applied coupon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Discount from the applied coupon, unclamped.
    pub discount: Money,
    /// Amount payable: subtotal minus discount, never below zero.
    pub grand_total: Money,
    /// Code of the applied coupon, if any.
    pub coupon_code: Option<String>,
    /// Total units.
    pub total_items: u32,
    /// Per-line breakdown, in cart order.
    pub lines: Vec<LinePricing>,
}

impl OrderSummary {
    /// Price the cart against the book's applied coupon.
    pub fn compute(cart: &Cart, coupons: &CouponBook) -> Self {
        let lines: Vec<LinePricing> = cart
            .items
            .iter()
            .map(|item| LinePricing {
                product_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: item.quantity,
                subtotal: item.line_total(),
            })
            .collect();

        let subtotal = cart.total_price();
        let discount = coupons.calculate_discount(subtotal);

        Self {
            subtotal,
            discount,
            grand_total: (subtotal - discount).max(Money::zero()),
            coupon_code: coupons.applied().map(|c| c.code.clone()),
            total_items: cart.total_items(),
            lines,
        }
    }

    /// Check if a coupon contributed a discount.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }

    /// Discount as a percentage of the subtotal.
    pub fn discount_percentage(&self) -> f64 {
        if self.subtotal.is_zero() {
            return 0.0;
        }
        (self.discount.amount() / self.subtotal.amount()) * 100.0
    }
}

/// Pricing for a single cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    /// Unit price times quantity.
    pub subtotal: Money,
}
