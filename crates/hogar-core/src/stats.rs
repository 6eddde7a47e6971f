//! Admin dashboard figures.

use serde::Serialize;

use crate::catalog::{Category, Product};
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub product_count: usize,
    /// Sum of list prices, one unit each.
    pub total_value: Money,
    /// Products with an original price.
    pub on_sale: usize,
    /// Products whose tracked stock is at or below the low-stock threshold.
    pub low_stock: usize,
    pub per_category: Vec<(Category, usize)>,
}

impl CatalogStats {
    pub fn compute(products: &[Product]) -> Self {
        Self {
            product_count: products.len(),
            total_value: products.iter().map(|p| p.price).sum(),
            on_sale: products.iter().filter(|p| p.is_on_sale()).count(),
            low_stock: products.iter().filter(|p| p.is_low_stock()).count(),
            per_category: Category::ALL
                .into_iter()
                .map(|c| (c, products.iter().filter(|p| p.category == c).count()))
                .collect(),
        }
    }
}
