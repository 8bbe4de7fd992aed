//! Products API

use crate::{normalize, ClientError, ClientResult, HttpClient};
use serde_json::Value;
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::response::ListEnvelope;

impl HttpClient {
    /// List products, optionally filtered server-side by category and/or
    /// search term. The result is normalized, invalid rows are dropped
    /// and the list is sorted ascending by id. Whether the backend
    /// actually honored the filter is the catalog store's concern.
    pub async fn list_products(
        &self,
        category: Option<&str>,
        search: Option<&str>,
    ) -> ClientResult<Vec<Product>> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            query.push(("categoria", category));
        }
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.push(("buscar", search));
        }

        let envelope: ListEnvelope = self.get_with_query("/productos", &query).await?;
        Ok(normalize::products(envelope))
    }

    /// Fetch a single product.
    pub async fn get_product(&self, id: i64) -> ClientResult<Product> {
        let row: Value = self.get(&format!("/productos/{}", id)).await?;
        normalize::product(&row)
            .ok_or_else(|| ClientError::InvalidResponse(format!("producto {} sin forma válida", id)))
    }

    /// Create a product.
    pub async fn create_product(&self, product: &ProductCreate) -> ClientResult<Value> {
        self.post("/productos", product).await
    }

    /// Update a product.
    pub async fn update_product(&self, id: i64, update: &ProductUpdate) -> ClientResult<Value> {
        self.put(&format!("/productos/{}", id), update).await
    }

    /// Delete a product.
    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/productos/{}", id)).await
    }
}
