//! Product catalog module.
//!
//! Contains product records, the fixed category set, admin form validation,
//! the starter catalog, and the catalog store with its trash.

mod category;
mod product;
mod seed;
mod store;
mod validate;

pub use category::Category;
pub use product::{Badge, Product, ProductDraft, ProductPatch, LOW_STOCK_THRESHOLD};
pub use seed::seed_products;
pub use store::{Catalog, DeletedProduct, ImportError, SortCriteria, COPY_SUFFIX};
pub use validate::{FieldError, MAX_PRICE};
