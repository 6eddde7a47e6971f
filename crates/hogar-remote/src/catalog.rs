//! Catalog state mirrored from the hosted table.
//!
//! Every successful write is followed by a full refetch, so the local list
//! always reflects the table's ordering and server-assigned fields. A
//! failed call records its message in the error slot and leaves the list
//! untouched.

use std::sync::Arc;

use hogar_core::catalog::{Product, ProductDraft, ProductPatch};
use hogar_core::ProductId;

use crate::error::{GatewayError, GatewayResult};
use crate::table::ProductTable;

pub struct RemoteCatalog {
    table: Arc<dyn ProductTable>,
    products: Vec<Product>,
    is_loading: bool,
    error: Option<String>,
}

impl std::fmt::Debug for RemoteCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCatalog")
            .field("products", &self.products.len())
            .field("is_loading", &self.is_loading)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl RemoteCatalog {
    /// An empty mirror; call [`fetch`](Self::fetch) to load it.
    pub fn new(table: Arc<dyn ProductTable>) -> Self {
        Self {
            table,
            products: Vec::new(),
            is_loading: false,
            error: None,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message of the last failed call, cleared by the next successful fetch.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the list with the table's rows.
    pub async fn fetch(&mut self) -> GatewayResult<()> {
        self.is_loading = true;
        let result = self.table.select_all().await;
        self.is_loading = false;

        match result {
            Ok(products) => {
                tracing::info!(count = products.len(), "remote catalog synced");
                self.products = products;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.record(e, "fetch")),
        }
    }

    /// Insert a product and refetch. Returns the stored row.
    pub async fn add(&mut self, draft: &ProductDraft) -> GatewayResult<Product> {
        let stored = match self.table.insert(draft).await {
            Ok(product) => product,
            Err(e) => return Err(self.record(e, "insert")),
        };
        self.fetch().await?;
        Ok(stored)
    }

    pub async fn update(&mut self, id: ProductId, patch: &ProductPatch) -> GatewayResult<()> {
        if let Err(e) = self.table.update(id, patch).await {
            return Err(self.record(e, "update"));
        }
        self.fetch().await
    }

    /// Hard delete; the hosted table keeps no trash.
    pub async fn delete(&mut self, id: ProductId) -> GatewayResult<()> {
        if let Err(e) = self.table.delete(id).await {
            return Err(self.record(e, "delete"));
        }
        self.fetch().await
    }

    fn record(&mut self, error: GatewayError, operation: &'static str) -> GatewayError {
        tracing::warn!(operation, error = %error, "remote catalog call failed");
        self.error = Some(error.to_string());
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use hogar_core::catalog::Category;
    use std::sync::Mutex;

    /// In-memory table that can be told to fail.
    #[derive(Default)]
    struct FakeTable {
        rows: Mutex<Vec<Product>>,
        fail: Mutex<bool>,
    }

    impl FakeTable {
        fn failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn guard(&self) -> GatewayResult<()> {
            if *self.fail.lock().unwrap() {
                Err(GatewayError::Status {
                    status: 500,
                    message: "down".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ProductTable for FakeTable {
        async fn select_all(&self) -> GatewayResult<Vec<Product>> {
            self.guard()?;
            let mut rows = self.rows.lock().unwrap().clone();
            rows.reverse();
            Ok(rows)
        }

        async fn insert(&self, draft: &ProductDraft) -> GatewayResult<Product> {
            self.guard()?;
            let mut rows = self.rows.lock().unwrap();
            let id = ProductId::new(rows.len() as i64 + 1);
            let product = Product::from_draft(id, draft.clone(), Utc::now());
            rows.push(product.clone());
            Ok(product)
        }

        async fn update(&self, id: ProductId, patch: &ProductPatch) -> GatewayResult<()> {
            self.guard()?;
            if let Some(p) = self.rows.lock().unwrap().iter_mut().find(|p| p.id == id) {
                patch.apply_to(p);
            }
            Ok(())
        }

        async fn delete(&self, id: ProductId) -> GatewayResult<()> {
            self.guard()?;
            self.rows.lock().unwrap().retain(|p| p.id != id);
            Ok(())
        }
    }

    fn draft(name: &str) -> ProductDraft {
        ProductDraft::new(name, Category::Muebles, 100000.0)
    }

    #[tokio::test]
    async fn test_writes_refetch() {
        let table = Arc::new(FakeTable::default());
        let mut catalog = RemoteCatalog::new(table.clone());

        catalog.add(&draft("Rack TV")).await.unwrap();
        let second = catalog.add(&draft("Sitial")).await.unwrap();
        let names: Vec<_> = catalog.products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Sitial", "Rack TV"]);

        let patch = ProductPatch {
            name: Some("Sitial Boucle".into()),
            ..ProductPatch::default()
        };
        catalog.update(second.id, &patch).await.unwrap();
        assert_eq!(catalog.get(second.id).unwrap().name, "Sitial Boucle");

        catalog.delete(second.id).await.unwrap();
        assert_eq!(catalog.products().len(), 1);
        assert!(!catalog.is_loading());
    }

    #[tokio::test]
    async fn test_failure_keeps_state_and_records_error() {
        let table = Arc::new(FakeTable::default());
        let mut catalog = RemoteCatalog::new(table.clone());
        catalog.add(&draft("Rack TV")).await.unwrap();

        table.failing(true);
        assert!(catalog.add(&draft("Sitial")).await.is_err());
        assert_eq!(catalog.products().len(), 1);
        assert!(catalog.error().unwrap().contains("500"));

        table.failing(false);
        catalog.fetch().await.unwrap();
        assert!(catalog.error().is_none());
    }
}
