//! Row shapes of the hosted product table.
//!
//! The table uses snake_case columns and nullable fields; the catalog uses
//! the camelCase record. Conversion happens here and nowhere else.

use chrono::{DateTime, Utc};
use hogar_core::catalog::{Badge, Category, Product, ProductDraft, ProductPatch};
use hogar_core::{Money, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// A row as returned by `select *`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub stock: Option<i64>,
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
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProductRow> for Product {
    type Error = GatewayError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = Category::parse(&row.category).ok_or_else(|| {
            GatewayError::Decode(format!("row {}: unknown category '{}'", row.id, row.category))
        })?;
        // Unknown badges are dropped rather than failing the whole row.
        let badge = row.badge.as_deref().and_then(Badge::parse);
        // Negative stock is not representable; treat it as sold out.
        let stock = row.stock.map(|s| u32::try_from(s).unwrap_or(0));

        Ok(Product {
            id: ProductId::new(row.id),
            name: row.name,
            category,
            subcategory: row.subcategory,
            price: Money::new(row.price),
            original_price: row.original_price.map(Money::new),
            description: row.description.unwrap_or_default(),
            badge,
            image: row.image,
            images: row.images.unwrap_or_default(),
            stock,
            sku: row.sku,
            material: row.material,
            dimensions: row.dimensions,
            weight: row.weight,
            color: row.color,
            tags: row.tags.unwrap_or_default(),
            updated_at: row.updated_at.unwrap_or(row.created_at),
            created_at: row.created_at,
        })
    }
}

/// Decode a `select` response body, skipping rows that do not map.
pub fn decode_rows(body: Value) -> Result<Vec<Product>, GatewayError> {
    let Value::Array(rows) = body else {
        return Err(GatewayError::Decode("expected an array of rows".into()));
    };

    let mut products = Vec::with_capacity(rows.len());
    for (index, raw) in rows.into_iter().enumerate() {
        let mapped = serde_json::from_value::<ProductRow>(raw)
            .map_err(|e| GatewayError::Decode(e.to_string()))
            .and_then(Product::try_from);
        match mapped {
            Ok(product) => products.push(product),
            Err(e) => tracing::warn!(index, error = %e, "skipping product row"),
        }
    }
    Ok(products)
}

/// Insert payload. The table assigns `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProductRow {
    pub name: String,
    pub category: &'static str,
    pub subcategory: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub description: String,
    pub image: Option<String>,
    pub images: Vec<String>,
    pub badge: Option<&'static str>,
    pub stock: Option<u32>,
    pub sku: Option<String>,
    pub material: Option<String>,
    pub dimensions: Option<String>,
    pub weight: Option<String>,
    pub color: Option<String>,
    pub tags: Vec<String>,
}

impl From<&ProductDraft> for NewProductRow {
    fn from(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            category: draft.category.as_str(),
            subcategory: draft.subcategory.clone(),
            price: draft.price.amount(),
            original_price: draft.original_price.map(Money::amount),
            description: draft.description.clone(),
            image: draft.image.clone(),
            images: draft.images.clone(),
            badge: draft.badge.map(|b| b.as_str()),
            stock: draft.stock,
            sku: draft.sku.clone(),
            material: draft.material.clone(),
            dimensions: draft.dimensions.clone(),
            weight: draft.weight.clone(),
            color: draft.color.clone(),
            tags: draft.tags.clone(),
        }
    }
}

/// Update payload. Absent fields are left out of the body; `Some(None)`
/// clears the column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductUpdateRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Option<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub updated_at: DateTime<Utc>,
}

impl ProductUpdateRow {
    pub fn from_patch(patch: &ProductPatch, now: DateTime<Utc>) -> Self {
        Self {
            name: patch.name.clone(),
            category: patch.category.map(|c| c.as_str()),
            subcategory: patch.subcategory.clone(),
            price: patch.price.map(Money::amount),
            original_price: patch.original_price.map(|p| p.map(Money::amount)),
            description: patch.description.clone(),
            image: patch.image.clone(),
            images: patch.images.clone(),
            badge: patch.badge.map(|b| b.map(|b| b.as_str())),
            stock: patch.stock,
            sku: patch.sku.clone(),
            material: patch.material.clone(),
            dimensions: patch.dimensions.clone(),
            weight: patch.weight.clone(),
            color: patch.color.clone(),
            tags: patch.tags.clone(),
            updated_at: now,
        }
    }
}
