//! Storefront filters.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::money::Money;

/// Upper bound of the shop's price slider.
pub const DEFAULT_MAX_PRICE: Money = Money::new(2_000_000.0);

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

impl PriceRange {
    pub fn new(min: impl Into<Money>, max: impl Into<Money>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn contains(&self, price: Money) -> bool {
        price >= self.min && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::new(Money::zero(), DEFAULT_MAX_PRICE)
    }
}

/// A single product filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Category wire value, compared case-insensitively.
    Category(String),
    /// Subcategory name, compared case-insensitively.
    Subcategory(String),
    /// Price within inclusive bounds.
    PriceRange(PriceRange),
    /// Case-insensitive substring of name, category, subcategory,
    /// description or any tag.
    Text(String),
}

impl Filter {
    pub fn category(value: impl Into<String>) -> Self {
        Filter::Category(value.into())
    }

    pub fn subcategory(value: impl Into<String>) -> Self {
        Filter::Subcategory(value.into())
    }

    pub fn price_range(min: impl Into<Money>, max: impl Into<Money>) -> Self {
        Filter::PriceRange(PriceRange::new(min, max))
    }

    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// Whether `product` passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Category(category) => product.category.as_str().eq_ignore_ascii_case(category),
            Filter::Subcategory(subcategory) => product
                .subcategory
                .as_deref()
                .map_or(false, |s| s.to_lowercase() == subcategory.to_lowercase()),
            Filter::PriceRange(range) => range.contains(product.price),
            Filter::Text(query) => matches_text(product, &query.to_lowercase()),
        }
    }
}

fn matches_text(product: &Product, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(product.name.as_str())
        || contains(product.category.as_str())
        || product.subcategory.as_deref().map_or(false, contains)
        || contains(product.description.as_str())
        || product.tags.iter().any(|t| contains(t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, ProductDraft};
    use crate::ids::ProductId;
    use chrono::Utc;

    fn product() -> Product {
        let draft = ProductDraft::new("Sitial Terciopelo", Category::Muebles, 189990.0)
            .with_subcategory("Sitiales")
            .with_description("Sitial tapizado en terciopelo verde")
            .with_tags(["living", "Verde"]);
        Product::from_draft(ProductId::new(1), draft, Utc::now())
    }

    #[test]
    fn test_category_filter_ignores_case() {
        assert!(Filter::category("MUEBLES").matches(&product()));
        assert!(!Filter::category("decoracion").matches(&product()));
    }

    #[test]
    fn test_subcategory_filter() {
        assert!(Filter::subcategory("sitiales").matches(&product()));
        assert!(!Filter::subcategory("Sofás").matches(&product()));

        let mut p = product();
        p.subcategory = None;
        assert!(!Filter::subcategory("sitiales").matches(&p));
    }

    #[test]
    fn test_price_range_is_inclusive() {
        assert!(Filter::price_range(189990.0, 189990.0).matches(&product()));
        assert!(!Filter::price_range(0.0, 189989.0).matches(&product()));
        assert!(PriceRange::default().contains(Money::new(2_000_000.0)));
    }

    #[test]
    fn test_text_filter_fields() {
        let p = product();
        assert!(Filter::text("terciopelo").matches(&p));
        assert!(Filter::text("MUEB").matches(&p));
        assert!(Filter::text("sitiales").matches(&p));
        assert!(Filter::text("verde").matches(&p));
        assert!(Filter::text("LIVING").matches(&p));
        assert!(!Filter::text("lampara").matches(&p));
    }
}
