//! Shopping cart module.
//!
//! Contains the cart and its lines, the coupon engine, and order pricing.

mod cart;
mod coupon;
mod pricing;

pub use cart::{AddOutcome, Cart, CartItem, CartProduct, QuantityOutcome};
pub use coupon::{default_coupons, Coupon, CouponApplied, CouponBook, CouponRejection, CouponType};
pub use pricing::{LinePricing, OrderSummary};
