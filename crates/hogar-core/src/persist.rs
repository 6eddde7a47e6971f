//! Persistence adapter between the stores and a [`Cache`].
//!
//! Stores never touch storage themselves; the caller loads state once and
//! saves the store it mutated. Each store lives under its own key. Reads
//! fall back to defaults and writes are best-effort: failures are logged,
//! never returned.

use hogar_cache::Cache;
use serde::{de::DeserializeOwned, Serialize};

use crate::cart::{Cart, CouponBook};
use crate::catalog::{Catalog, DeletedProduct, Product};
use crate::favorites::Favorites;
use crate::reviews::ReviewLog;

/// Storage keys, one per store.
pub mod keys {
    pub const PRODUCTS: &str = "georgina_products";
    pub const TRASH: &str = "georgina_trash";
    pub const CART: &str = "georgina-cart";
    pub const FAVORITES: &str = "georgina-favorites";
    pub const REVIEWS: &str = "georgina-reviews";
    pub const COUPONS: &str = "georgina-coupons";
}

/// Every store of the storefront.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StorefrontState {
    pub catalog: Catalog,
    pub cart: Cart,
    pub coupons: CouponBook,
    pub favorites: Favorites,
    pub reviews: ReviewLog,
}

impl StorefrontState {
    /// Load every store. Missing or unreadable entries fall back to their
    /// defaults; the catalog falls back to the seed products.
    pub fn load(cache: &Cache) -> Self {
        Self {
            catalog: load_catalog(cache),
            cart: load_or_default(cache, keys::CART),
            coupons: load_or_default(cache, keys::COUPONS),
            favorites: load_or_default(cache, keys::FAVORITES),
            reviews: load_or_default(cache, keys::REVIEWS),
        }
    }

    pub fn save(&self, cache: &Cache) {
        self.save_catalog(cache);
        self.save_cart(cache);
        self.save_coupons(cache);
        self.save_favorites(cache);
        self.save_reviews(cache);
    }

    /// Save the active collection and the trash.
    pub fn save_catalog(&self, cache: &Cache) {
        store(cache, keys::PRODUCTS, &self.catalog.products());
        store(cache, keys::TRASH, &self.catalog.trash());
    }

    pub fn save_cart(&self, cache: &Cache) {
        store(cache, keys::CART, &self.cart);
    }

    pub fn save_coupons(&self, cache: &Cache) {
        store(cache, keys::COUPONS, &self.coupons);
    }

    pub fn save_favorites(&self, cache: &Cache) {
        store(cache, keys::FAVORITES, &self.favorites);
    }

    pub fn save_reviews(&self, cache: &Cache) {
        store(cache, keys::REVIEWS, &self.reviews);
    }
}

fn load_catalog(cache: &Cache) -> Catalog {
    let products = match cache.get::<Vec<Product>>(keys::PRODUCTS) {
        Ok(Some(products)) => products,
        Ok(None) => return Catalog::seeded(),
        Err(e) => {
            tracing::warn!(key = keys::PRODUCTS, error = %e, "unreadable catalog, using seed products");
            return Catalog::seeded();
        }
    };
    let trash: Vec<DeletedProduct> = load_or_default(cache, keys::TRASH);
    Catalog::from_parts(products, trash)
}

fn load_or_default<T: DeserializeOwned + Default>(cache: &Cache, key: &str) -> T {
    match cache.get(key) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "unreadable entry, using default");
            T::default()
        }
    }
}

fn store<T: Serialize>(cache: &Cache, key: &str, value: &T) {
    if let Err(e) = cache.set(key, value) {
        tracing::warn!(key, error = %e, "failed to persist");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartProduct;

    #[test]
    fn test_empty_cache_loads_seed() {
        let cache = Cache::in_memory();
        let state = StorefrontState::load(&cache);
        assert_eq!(state.catalog.len(), 12);
        assert!(state.cart.is_empty());
        assert_eq!(state.coupons.coupons().len(), 3);
    }

    #[test]
    fn test_corrupt_catalog_falls_back_to_seed() {
        let cache = Cache::in_memory();
        cache.set(keys::PRODUCTS, &"not a product list").unwrap();
        let state = StorefrontState::load(&cache);
        assert_eq!(state.catalog.len(), 12);
    }

    #[test]
    fn test_save_and_reload() {
        let cache = Cache::in_memory();
        let mut state = StorefrontState::load(&cache);

        let sofa = state.catalog.products()[0].clone();
        state.catalog.delete(sofa.id);
        state.cart.add_item(CartProduct::from(&state.catalog.products()[0]));
        state.favorites.add(state.catalog.products()[1].clone());
        state.save(&cache);

        let reloaded = StorefrontState::load(&cache);
        assert_eq!(reloaded, state);
        assert_eq!(reloaded.catalog.trash()[0].product, sofa);
    }
}
