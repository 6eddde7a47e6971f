//! Storefront domain types and state transitions for Hogar.
//!
//! This crate holds the state layer of a furniture and home-decor shop:
//!
//! - **Catalog**: Products, categories, trash, admin sorting, JSON import/export
//! - **Cart**: Cart lines with a stock ceiling, the coupon engine, order pricing
//! - **Search**: Shop filters, sort options, pagination
//! - **Favorites** and **Reviews**: per-shopper lists and rating aggregates
//! - **Checkout**: WhatsApp order and inquiry links
//!
//! Stores are plain values with no I/O. With the `storage` feature (on by
//! default) the [`persist`] module loads and saves them through a
//! [`hogar_cache::Cache`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hogar_core::prelude::*;
//!
//! let catalog = Catalog::seeded();
//! let mut cart = Cart::new();
//! cart.add_item(CartProduct::from(&catalog.products()[0]));
//!
//! let mut coupons = CouponBook::default();
//! coupons.apply("BIENVENIDO10", cart.total_price())?;
//!
//! let summary = OrderSummary::compute(&cart, &coupons);
//! println!("Total: {}", summary.grand_total.display());
//! ```

pub mod error;
pub mod format;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod favorites;
pub mod reviews;
pub mod search;
pub mod stats;

#[cfg(feature = "storage")]
pub mod persist;

pub use error::CommerceError;
pub use ids::{ProductId, ReviewId};
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::{ProductId, ReviewId};
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{
        Badge, Catalog, Category, DeletedProduct, ImportError, Product, ProductDraft,
        ProductPatch, SortCriteria,
    };

    // Cart
    pub use crate::cart::{
        AddOutcome, Cart, CartItem, CartProduct, Coupon, CouponApplied, CouponBook,
        CouponRejection, CouponType, OrderSummary, QuantityOutcome,
    };

    // Search
    pub use crate::search::{
        Filter, Pagination, PriceRange, RatingLookup, SearchQuery, SearchResults, SortOption,
    };

    pub use crate::checkout::WhatsApp;
    pub use crate::favorites::Favorites;
    pub use crate::reviews::{NewReview, Review, ReviewLog};
    pub use crate::stats::CatalogStats;

    #[cfg(feature = "storage")]
    pub use crate::persist::StorefrontState;
}
