//! Sales API

use crate::{ClientResult, HttpClient};
use shared::models::{Sale, SaleCreate};
use shared::response::ListEnvelope;

impl HttpClient {
    /// List all sales.
    pub async fn list_sales(&self) -> ClientResult<Vec<Sale>> {
        let envelope: ListEnvelope = self.get("/ventas").await?;
        let mut sales: Vec<Sale> = envelope
            .into_items()
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();
        sales.sort_by_key(|s: &Sale| s.id);
        Ok(sales)
    }

    /// Submit a sale record at checkout. The backend persists it and
    /// performs the authoritative stock decrement.
    pub async fn create_sale(&self, sale: &SaleCreate) -> ClientResult<Sale> {
        self.post("/ventas", sale).await
    }

    /// Fetch a single sale.
    pub async fn get_sale(&self, id: i64) -> ClientResult<Sale> {
        self.get(&format!("/ventas/{}", id)).await
    }

    /// Replace a sale record.
    pub async fn update_sale(&self, id: i64, sale: &SaleCreate) -> ClientResult<Sale> {
        self.put(&format!("/ventas/{}", id), sale).await
    }

    /// Delete a sale record.
    pub async fn delete_sale(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("/ventas/{}", id)).await
    }
}
