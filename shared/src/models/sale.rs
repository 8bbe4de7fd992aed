//! Sale Model

use serde::{Deserialize, Serialize};

/// One sold line inside a sale (backend wire names).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleItem {
    #[serde(rename = "id_producto")]
    pub product_id: i64,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Sale entity as returned by the backend's sales routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "id_venta", alias = "id", default)]
    pub id: Option<i64>,
    #[serde(rename = "id_usuario", default)]
    pub user_id: Option<i64>,
    #[serde(rename = "fecha_venta", default)]
    pub date: Option<String>,
    pub total: f64,
    #[serde(rename = "detalles", default)]
    pub items: Vec<SaleItem>,
}

/// Outgoing sale record submitted at checkout.
///
/// The backend is the sole authority on persistence and the authoritative
/// stock decrement; this is only ever sent, never read back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleCreate {
    #[serde(rename = "detalles")]
    pub items: Vec<SaleItem>,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_create_uses_backend_wire_names() {
        let sale = SaleCreate {
            items: vec![SaleItem {
                product_id: 7,
                quantity: 2,
                unit_price: 2.5,
                subtotal: 5.0,
            }],
            total: 5.0,
        };
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["detalles"][0]["id_producto"], 7);
        assert_eq!(json["detalles"][0]["cantidad"], 2);
        assert_eq!(json["detalles"][0]["precio_unitario"], 2.5);
        assert_eq!(json["total"], 5.0);
    }

    #[test]
    fn sale_decodes_both_id_spellings() {
        let a: Sale = serde_json::from_str(r#"{"id_venta":3,"total":1.0}"#).unwrap();
        let b: Sale = serde_json::from_str(r#"{"id":3,"total":1.0}"#).unwrap();
        assert_eq!(a.id, Some(3));
        assert_eq!(b.id, Some(3));
    }
}
