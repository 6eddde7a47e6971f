//! Favorites list: products keyed by id, no duplicates.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::ids::ProductId;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Favorites {
    pub favorites: Vec<Product>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product unless it is already a favorite.
    pub fn add(&mut self, product: Product) -> bool {
        if self.is_favorite(product.id) {
            return false;
        }
        tracing::debug!(id = %product.id, "favorite added");
        self.favorites.push(product);
        true
    }

    pub fn remove(&mut self, id: ProductId) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|p| p.id != id);
        self.favorites.len() != before
    }

    /// Add when absent, remove when present. Returns whether the product is
    /// a favorite afterwards.
    pub fn toggle(&mut self, product: &Product) -> bool {
        if self.remove(product.id) {
            false
        } else {
            self.add(product.clone())
        }
    }

    pub fn is_favorite(&self, id: ProductId) -> bool {
        self.favorites.iter().any(|p| p.id == id)
    }

    pub fn clear(&mut self) {
        self.favorites.clear();
    }

    pub fn products(&self) -> &[Product] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }
}
