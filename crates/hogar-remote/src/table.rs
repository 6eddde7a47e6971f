//! The hosted product table.

use async_trait::async_trait;
use chrono::Utc;
use hogar_core::catalog::{Product, ProductDraft, ProductPatch};
use hogar_core::ProductId;
use hogar_data::{FetchClient, Response};
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::row::{decode_rows, NewProductRow, ProductUpdateRow};

/// The four table operations the storefront consumes.
#[async_trait]
pub trait ProductTable: Send + Sync {
    /// Every row, newest first.
    async fn select_all(&self) -> GatewayResult<Vec<Product>>;

    /// Insert one row and return it as stored.
    async fn insert(&self, draft: &ProductDraft) -> GatewayResult<Product>;

    async fn update(&self, id: ProductId, patch: &ProductPatch) -> GatewayResult<()>;

    async fn delete(&self, id: ProductId) -> GatewayResult<()>;
}

/// [`ProductTable`] over a PostgREST endpoint.
#[derive(Debug, Clone)]
pub struct RestProductTable {
    client: FetchClient,
    table: String,
}

impl RestProductTable {
    /// `client` must already carry the REST root and the auth headers,
    /// see [`GatewayConfig::client`](crate::GatewayConfig::client).
    pub fn new(client: FetchClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn path(&self) -> String {
        format!("/{}", self.table)
    }
}

fn check(response: Response) -> GatewayResult<Response> {
    response.error_for_status().map_err(GatewayError::from_fetch)
}

#[async_trait]
impl ProductTable for RestProductTable {
    async fn select_all(&self) -> GatewayResult<Vec<Product>> {
        let response = self
            .client
            .get(self.path())
            .query("select", "*")
            .query("order", "created_at.desc")
            .accept("application/json")
            .send()
            .await?;
        let body: Value = check(response)?.json()?;
        decode_rows(body)
    }

    async fn insert(&self, draft: &ProductDraft) -> GatewayResult<Product> {
        let response = self
            .client
            .post(self.path())
            .header("Prefer", "return=representation")
            .json(&NewProductRow::from(draft))?
            .send()
            .await?;
        let body: Value = check(response)?.json()?;
        decode_rows(body)?
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::Decode("insert returned no row".into()))
    }

    async fn update(&self, id: ProductId, patch: &ProductPatch) -> GatewayResult<()> {
        let response = self
            .client
            .patch(self.path())
            .query("id", format!("eq.{}", id))
            .json(&ProductUpdateRow::from_patch(patch, Utc::now()))?
            .send()
            .await?;
        check(response)?;
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> GatewayResult<()> {
        let response = self
            .client
            .delete(self.path())
            .query("id", format!("eq.{}", id))
            .send()
            .await?;
        check(response)?;
        Ok(())
    }
}
