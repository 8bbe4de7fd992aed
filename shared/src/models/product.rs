//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity as seen by the client.
///
/// This is the normalized shape: the backend emits heterogeneous field
/// names (`precio`/`price`/`cost`, ...) which the client's normalization
/// adapter maps onto these fields before anything else touches them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
    pub image: Option<String>,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

/// Create product payload (backend wire names)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "precio")]
    pub price: f64,
    pub stock: i64,
    #[serde(rename = "categoria")]
    pub category: String,
}

/// Update product payload (backend wire names)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precio", skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductUpdate {
    /// Stock-only update, used after a sale to decrement counters.
    pub fn stock(stock: i64) -> Self {
        Self {
            stock: Some(stock),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_serializes_wire_names_and_skips_none() {
        let update = ProductUpdate {
            name: Some("Arroz".to_string()),
            price: Some(3.5),
            ..ProductUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["nombre"], "Arroz");
        assert_eq!(json["precio"], 3.5);
        assert!(json.get("stock").is_none());
        assert!(json.get("categoria").is_none());
    }

    #[test]
    fn stock_update_only_carries_stock() {
        let json = serde_json::to_value(ProductUpdate::stock(4)).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
        assert_eq!(json["stock"], 4);
    }
}
