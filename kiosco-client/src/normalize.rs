//! Field-name normalization adapter
//!
//! The backend emits heterogeneous field names depending on the route and
//! its own history (`nombre` vs `name` vs `title`, string-typed numbers,
//! three different list envelopes). This module is the single place where
//! those shapes are resolved: a declarative list of candidate source
//! fields per target field, applied once at the client boundary.

use serde_json::Value;
use shared::models::{Product, User};
use shared::response::ListEnvelope;

// Candidate source fields per target field, first present wins.
const PRODUCT_ID: &[&str] = &["id_producto", "id", "_id", "ID"];
const PRODUCT_NAME: &[&str] = &["nombre", "name", "title"];
const PRODUCT_DESCRIPTION: &[&str] = &["descripcion", "description"];
const PRODUCT_PRICE: &[&str] = &["precio", "price", "cost"];
const PRODUCT_STOCK: &[&str] = &["stock", "quantity", "available"];
const PRODUCT_CATEGORY: &[&str] = &["categoria", "category"];
const PRODUCT_IMAGE: &[&str] = &["imagen", "image"];

const USER_ID: &[&str] = &["id_usuario", "id", "_id"];
const USER_USERNAME: &[&str] = &["nombre_usuario", "username"];
const USER_FULL_NAME: &[&str] = &["nombre_completo", "full_name", "nombre"];
const USER_EMAIL: &[&str] = &["correo", "email"];
const USER_PHONE: &[&str] = &["telefono", "phone"];
const USER_ROLE: &[&str] = &["rol", "role"];

fn pick<'a>(row: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    candidates.iter().find_map(|field| {
        row.get(field).filter(|v| !v.is_null())
    })
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok().or_else(|| {
            s.trim().parse::<f64>().ok().map(|f| f as i64)
        }),
        _ => None,
    }
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalize one raw product row. Returns `None` for rows that must be
/// filtered out of the catalog: missing id or name, or a price that is
/// negative or not a finite number.
pub fn product(row: &Value) -> Option<Product> {
    let id = pick(row, PRODUCT_ID).and_then(coerce_i64)?;
    let name = pick(row, PRODUCT_NAME).and_then(coerce_string)?;
    let price = pick(row, PRODUCT_PRICE).and_then(coerce_f64).unwrap_or(f64::NAN);
    if !price.is_finite() || price < 0.0 {
        tracing::warn!(id, %name, "producto con precio inválido descartado");
        return None;
    }

    Some(Product {
        id,
        name,
        description: pick(row, PRODUCT_DESCRIPTION)
            .and_then(coerce_string)
            .unwrap_or_else(|| "Sin descripción disponible".to_string()),
        price,
        stock: pick(row, PRODUCT_STOCK).and_then(coerce_i64).unwrap_or(0),
        category: pick(row, PRODUCT_CATEGORY)
            .and_then(coerce_string)
            .unwrap_or_else(|| "general".to_string()),
        image: pick(row, PRODUCT_IMAGE).and_then(coerce_string),
    })
}

/// Normalize a full product list response: unwrap the envelope, drop
/// invalid rows and sort ascending by id for deterministic rendering.
pub fn products(envelope: ListEnvelope) -> Vec<Product> {
    let mut products: Vec<Product> = envelope.into_items().iter().filter_map(product).collect();
    products.sort_by_key(|p| p.id);
    products
}

/// Normalize one raw user row.
pub fn user(row: &Value) -> Option<User> {
    Some(User {
        id: pick(row, USER_ID).and_then(coerce_i64)?,
        username: pick(row, USER_USERNAME).and_then(coerce_string)?,
        full_name: pick(row, USER_FULL_NAME).and_then(coerce_string).unwrap_or_default(),
        email: pick(row, USER_EMAIL).and_then(coerce_string).unwrap_or_default(),
        phone: pick(row, USER_PHONE).and_then(coerce_string),
        role: pick(row, USER_ROLE)
            .and_then(coerce_string)
            .unwrap_or_else(|| "cliente".to_string()),
    })
}

/// Normalize a full user list.
pub fn users(rows: Vec<Value>) -> Vec<User> {
    let mut users: Vec<User> = rows.iter().filter_map(user).collect();
    users.sort_by_key(|u| u.id);
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_typed_fields_become_numeric() {
        let row = json!({"id": 1, "nombre": "Arroz", "precio": "3.5", "stock": "10"});
        let p = product(&row).unwrap();
        assert_eq!(p.id, 1);
        assert_eq!(p.name, "Arroz");
        assert_eq!(p.price, 3.5);
        assert_eq!(p.stock, 10);
    }

    #[test]
    fn first_present_candidate_wins() {
        let row = json!({"id_producto": 7, "id": 99, "title": "Atún", "cost": 2.5});
        let p = product(&row).unwrap();
        assert_eq!(p.id, 7);
        assert_eq!(p.name, "Atún");
        assert_eq!(p.price, 2.5);
    }

    #[test]
    fn invalid_rows_are_filtered() {
        assert!(product(&json!({"nombre": "sin id", "precio": 1.0})).is_none());
        assert!(product(&json!({"id": 2, "precio": 1.0})).is_none());
        assert!(product(&json!({"id": 3, "nombre": "negativo", "precio": -1.0})).is_none());
        assert!(product(&json!({"id": 4, "nombre": "no numérico", "precio": "caro"})).is_none());
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let p = product(&json!({"id": 5, "nombre": "Pan", "precio": 1.2})).unwrap();
        assert_eq!(p.description, "Sin descripción disponible");
        assert_eq!(p.category, "general");
        assert_eq!(p.stock, 0);
        assert!(p.image.is_none());
    }

    #[test]
    fn list_is_sorted_ascending_by_id() {
        let envelope: ListEnvelope = serde_json::from_value(json!({
            "productos": [
                {"id": 9, "nombre": "b", "precio": 1},
                {"id": 2, "nombre": "a", "precio": 1},
                {"nombre": "inválido"},
            ]
        }))
        .unwrap();
        let list = products(envelope);
        assert_eq!(list.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 9]);
    }

    #[test]
    fn user_maps_correo_onto_email() {
        let u = user(&json!({
            "id": 3,
            "nombre_usuario": "ana",
            "correo": "ana@example.com",
            "rol": "administrador"
        }))
        .unwrap();
        assert_eq!(u.email, "ana@example.com");
        assert_eq!(u.role, "administrador");
        assert!(u.phone.is_none());
    }
}
