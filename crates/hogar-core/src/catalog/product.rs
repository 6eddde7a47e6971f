//! Product records, drafts and partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::Category;
use crate::ids::ProductId;
use crate::money::Money;

/// Stock at or below this count is reported as low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Promotional label attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Nuevo,
    Bestseller,
    Exclusivo,
    Oferta,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Nuevo => "nuevo",
            Badge::Bestseller => "bestseller",
            Badge::Exclusivo => "exclusivo",
            Badge::Oferta => "oferta",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Badge::Nuevo => "Nuevo",
            Badge::Bestseller => "Más Vendido",
            Badge::Exclusivo => "Exclusivo",
            Badge::Oferta => "Oferta",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "nuevo" => Some(Badge::Nuevo),
            "bestseller" => Some(Badge::Bestseller),
            "exclusivo" => Some(Badge::Exclusivo),
            "oferta" => Some(Badge::Oferta),
            _ => None,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub price: Money,
    /// Pre-discount price; only signals a markdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Units available; `None` means unlimited.
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a record from a draft.
    pub fn from_draft(id: ProductId, draft: ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            category: draft.category,
            subcategory: draft.subcategory,
            price: draft.price,
            original_price: draft.original_price,
            description: draft.description,
            badge: draft.badge,
            image: draft.image,
            images: draft.images,
            stock: draft.stock,
            sku: draft.sku,
            material: draft.material,
            dimensions: draft.dimensions,
            weight: draft.weight,
            color: draft.color,
            tags: draft.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// The writable fields of this record.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            category: self.category,
            subcategory: self.subcategory.clone(),
            price: self.price,
            original_price: self.original_price,
            description: self.description.clone(),
            badge: self.badge,
            image: self.image.clone(),
            images: self.images.clone(),
            stock: self.stock,
            sku: self.sku.clone(),
            material: self.material.clone(),
            dimensions: self.dimensions.clone(),
            weight: self.weight.clone(),
            color: self.color.clone(),
            tags: self.tags.clone(),
        }
    }

    /// Whether an original price marks this product as discounted.
    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some()
    }

    /// Whether at least one unit can be sold.
    pub fn in_stock(&self) -> bool {
        self.stock.map_or(true, |s| s > 0)
    }

    /// Whether a tracked stock is at or below [`LOW_STOCK_THRESHOLD`].
    pub fn is_low_stock(&self) -> bool {
        self.stock.map_or(false, |s| s <= LOW_STOCK_THRESHOLD)
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badge == Some(badge)
    }
}

/// Writable product fields, as submitted by the admin form or an import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub price: Money,
    #[serde(default)]
    pub original_price: Option<Money>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub badge: Option<Badge>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProductDraft {
    /// A draft with the required fields and everything else empty.
    pub fn new(name: impl Into<String>, category: Category, price: impl Into<Money>) -> Self {
        Self {
            name: name.into(),
            category,
            subcategory: None,
            price: price.into(),
            original_price: None,
            description: String::new(),
            badge: None,
            image: None,
            images: Vec::new(),
            stock: None,
            sku: None,
            material: None,
            dimensions: None,
            weight: None,
            color: None,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn with_badge(mut self, badge: Badge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_original_price(mut self, price: impl Into<Money>) -> Self {
        self.original_price = Some(price.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// A partial update. Absent fields are left untouched; for optional
/// attributes an explicit `null` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    #[serde(deserialize_with = "double_option")]
    pub subcategory: Option<Option<String>>,
    pub price: Option<Money>,
    #[serde(deserialize_with = "double_option")]
    pub original_price: Option<Option<Money>>,
    pub description: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub badge: Option<Option<Badge>>,
    #[serde(deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    #[serde(deserialize_with = "double_option")]
    pub stock: Option<Option<u32>>,
    #[serde(deserialize_with = "double_option")]
    pub sku: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub material: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub dimensions: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub weight: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl ProductPatch {
    /// Merge the patch into `product`. Timestamps are the caller's concern.
    pub fn apply_to(&self, product: &mut Product) {
        fn merge<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        merge(&mut product.name, &self.name);
        merge(&mut product.category, &self.category);
        merge(&mut product.subcategory, &self.subcategory);
        merge(&mut product.price, &self.price);
        merge(&mut product.original_price, &self.original_price);
        merge(&mut product.description, &self.description);
        merge(&mut product.badge, &self.badge);
        merge(&mut product.image, &self.image);
        merge(&mut product.images, &self.images);
        merge(&mut product.stock, &self.stock);
        merge(&mut product.sku, &self.sku);
        merge(&mut product.material, &self.material);
        merge(&mut product.dimensions, &self.dimensions);
        merge(&mut product.weight, &self.weight);
        merge(&mut product.color, &self.color);
        merge(&mut product.tags, &self.tags);
    }

    pub fn is_empty(&self) -> bool {
        *self == ProductPatch::default()
    }
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
