// kiosco-client/tests/client.rs
// Offline integration tests: configuration and normalization pipeline.

use kiosco_client::{normalize, ClientConfig};
use shared::response::ListEnvelope;

#[test]
fn config_from_env_falls_back_to_default() {
    // Serialized by cargo's per-process env; the variable is absent in CI.
    if std::env::var("KIOSCO_API_URL").is_err() {
        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, "http://localhost:8000");
    }
}

#[tokio::test]
async fn client_builds_without_network() {
    let client = ClientConfig::new("http://localhost:8000").with_token("t").build_client();
    assert_eq!(client.token(), Some("t"));
}

#[test]
fn full_catalog_normalization_pipeline() {
    // A realistic backend answer: wrapped envelope, mixed field names,
    // string-typed numbers and one broken row.
    let raw = r#"{
        "data": [
            {"id_producto": 7, "nombre": "Atún en Lata", "precio": "2.50", "stock": "5", "categoria": "Enlatados"},
            {"id": 1, "name": "Arroz", "price": 3.5, "quantity": 10, "category": "granos"},
            {"id": 2, "title": "Roto", "cost": "no-numérico"}
        ]
    }"#;
    let envelope: ListEnvelope = serde_json::from_str(raw).unwrap();
    let products = normalize::products(envelope);

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, 1);
    assert_eq!(products[0].name, "Arroz");
    assert_eq!(products[0].price, 3.5);
    assert_eq!(products[0].stock, 10);
    assert_eq!(products[1].id, 7);
    assert_eq!(products[1].stock, 5);
}
