//! The product catalog with its trash.
//!
//! All operations are pure state transitions. Operations on an id that is
//! not present are no-ops and report `false`/`None`; persisting the result is
//! the caller's job (see `persist` when the `storage` feature is on).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::catalog::{seed_products, Category, Product, ProductDraft, ProductPatch};
use crate::error::CommerceError;
use crate::format::name_key;
use crate::ids::{next_timestamp_id, ProductId};

/// Suffix appended to the name of a duplicated product.
pub const COPY_SUFFIX: &str = " (Copia)";

/// A product in the trash, with the time it was deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub deleted_at: DateTime<Utc>,
}

/// Admin ordering of the active collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortCriteria {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    DateAsc,
    DateDesc,
}

impl SortCriteria {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortCriteria::NameAsc => "name-asc",
            SortCriteria::NameDesc => "name-desc",
            SortCriteria::PriceAsc => "price-asc",
            SortCriteria::PriceDesc => "price-desc",
            SortCriteria::DateAsc => "date-asc",
            SortCriteria::DateDesc => "date-desc",
        }
    }
}

impl FromStr for SortCriteria {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name-asc" => Ok(SortCriteria::NameAsc),
            "name-desc" => Ok(SortCriteria::NameDesc),
            "price-asc" => Ok(SortCriteria::PriceAsc),
            "price-desc" => Ok(SortCriteria::PriceDesc),
            "date-asc" => Ok(SortCriteria::DateAsc),
            "date-desc" => Ok(SortCriteria::DateDesc),
            other => Err(format!("unknown sort criteria: {other}")),
        }
    }
}

/// Why a snapshot import was refused. Nothing is imported in any case.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("JSON invalido: {0}")]
    Malformed(String),

    #[error("El archivo debe contener un array de productos")]
    NotAnArray,

    #[error("Estructura de producto invalida (registro {index}): {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Active products plus soft-deleted ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
    trash: Vec<DeletedProduct>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The starter catalog.
    pub fn seeded() -> Self {
        Self::from_parts(seed_products(Utc::now()), Vec::new())
    }

    pub fn from_parts(products: Vec<Product>, trash: Vec<DeletedProduct>) -> Self {
        Self { products, trash }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn trash(&self) -> &[DeletedProduct] {
        &self.trash
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn get_deleted(&self, id: ProductId) -> Option<&DeletedProduct> {
        self.trash.iter().find(|d| d.product.id == id)
    }

    /// Add a product with a fresh identity and timestamps.
    pub fn add(&mut self, draft: ProductDraft) -> ProductId {
        let id = self.allocate_id();
        let product = Product::from_draft(id, draft, Utc::now());
        tracing::debug!(id = %id, name = %product.name, "product added");
        self.products.push(product);
        id
    }

    /// Merge `patch` into the product and refresh its update time.
    pub fn update(&mut self, id: ProductId, patch: &ProductPatch) -> bool {
        let Some(product) = self.products.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        patch.apply_to(product);
        product.updated_at = Utc::now();
        tracing::debug!(id = %id, "product updated");
        true
    }

    /// Move a product into the trash.
    pub fn delete(&mut self, id: ProductId) -> bool {
        let Some(index) = self.products.iter().position(|p| p.id == id) else {
            return false;
        };
        let product = self.products.remove(index);
        self.trash.push(DeletedProduct {
            product,
            deleted_at: Utc::now(),
        });
        tracing::debug!(id = %id, "product moved to trash");
        true
    }

    /// Clone a product under a new identity with a " (Copia)" name.
    pub fn duplicate(&mut self, id: ProductId) -> Option<ProductId> {
        let source = self.get(id)?.clone();
        let new_id = self.allocate_id();
        let now = Utc::now();
        let copy = Product {
            id: new_id,
            name: format!("{}{}", source.name, COPY_SUFFIX),
            created_at: now,
            updated_at: now,
            ..source
        };
        tracing::debug!(source = %id, id = %new_id, "product duplicated");
        self.products.push(copy);
        Some(new_id)
    }

    /// Move a product from the trash back to the active collection.
    pub fn restore(&mut self, id: ProductId) -> bool {
        let Some(index) = self.trash.iter().position(|d| d.product.id == id) else {
            return false;
        };
        let deleted = self.trash.remove(index);
        self.products.push(deleted.product);
        tracing::debug!(id = %id, "product restored");
        true
    }

    /// Permanently drop everything in the trash. Returns how many records
    /// were destroyed.
    pub fn empty_trash(&mut self) -> usize {
        let count = self.trash.len();
        self.trash.clear();
        if count > 0 {
            tracing::debug!(count, "trash emptied");
        }
        count
    }

    /// Reorder the active collection. Ties keep their prior order.
    pub fn sort(&mut self, criteria: SortCriteria) {
        match criteria {
            SortCriteria::NameAsc => self
                .products
                .sort_by_cached_key(|p| name_key(&p.name)),
            SortCriteria::NameDesc => self
                .products
                .sort_by(|a, b| name_key(&b.name).cmp(&name_key(&a.name))),
            SortCriteria::PriceAsc => self.products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortCriteria::PriceDesc => self.products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            SortCriteria::DateAsc => self.products.sort_by_key(|p| p.created_at),
            SortCriteria::DateDesc => self
                .products
                .sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }
        tracing::debug!(criteria = criteria.as_str(), "catalog sorted");
    }

    /// Admin list filter: case-insensitive substring over name and
    /// description, optionally restricted to one category.
    pub fn filtered(&self, query: &str, category: Option<Category>) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .filter(|p| {
                needle.is_empty()
                    || p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// The active collection as pretty-printed JSON.
    pub fn export_snapshot(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string_pretty(&self.products)?)
    }

    /// Replace the active collection with the records in `text`.
    ///
    /// Every record needs a non-empty `name`, a known `category` and a
    /// numeric `price`. Records get fresh identities and update times; a
    /// `createdAt` in the input is kept. If any record is rejected the
    /// catalog is left untouched.
    pub fn import_snapshot(&mut self, text: &str) -> Result<usize, ImportError> {
        let parsed: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;
        let records = parsed.as_array().ok_or(ImportError::NotAnArray)?;

        let now = Utc::now();
        let mut floor = self.max_id();
        let mut imported = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            check_required_fields(record).map_err(|reason| ImportError::InvalidRecord {
                index,
                reason: reason.to_string(),
            })?;
            let invalid = |e: serde_json::Error| ImportError::InvalidRecord {
                index,
                reason: e.to_string(),
            };

            let draft = ProductDraft::deserialize(record).map_err(invalid)?;
            let created_at = match record.get("createdAt") {
                Some(v) if !v.is_null() => {
                    Some(DateTime::<Utc>::deserialize(v).map_err(invalid)?)
                }
                _ => None,
            };

            floor = next_timestamp_id(floor);
            let mut product = Product::from_draft(ProductId::new(floor), draft, now);
            if let Some(created_at) = created_at {
                product.created_at = created_at;
            }
            imported.push(product);
        }

        let count = imported.len();
        self.products = imported;
        tracing::info!(count, "catalog imported");
        Ok(count)
    }

    fn max_id(&self) -> i64 {
        self.products
            .iter()
            .map(|p| p.id.get())
            .chain(self.trash.iter().map(|d| d.product.id.get()))
            .max()
            .unwrap_or(0)
    }

    fn allocate_id(&self) -> ProductId {
        ProductId::new(next_timestamp_id(self.max_id()))
    }
}

fn check_required_fields(record: &serde_json::Value) -> Result<(), &'static str> {
    let non_empty_str = |key: &str| {
        record
            .get(key)
            .and_then(|v| v.as_str())
            .map_or(false, |s| !s.is_empty())
    };
    if !record.is_object() {
        return Err("record is not an object");
    }
    if !non_empty_str("name") {
        return Err("missing name");
    }
    if !non_empty_str("category") {
        return Err("missing category");
    }
    if !record.get("price").map_or(false, |v| v.is_number()) {
        return Err("price must be a number");
    }
    Ok(())
}
