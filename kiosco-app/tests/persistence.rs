//! End-to-end persistence behavior: what survives a process restart and
//! what a dead token drags down with it.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use kiosco_app::state::cart::CartStore;
use kiosco_app::state::session::SessionStore;
use kiosco_app::storage::{LocalStore, KEY_CART, KEY_TOKEN};
use shared::models::Product;
use shared::util::now_secs;
use tempfile::TempDir;

fn product(id: i64, name: &str, price: f64, stock: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: String::new(),
        price,
        stock,
        category: "general".to_string(),
        image: None,
    }
}

fn token(payload: serde_json::Value) -> String {
    format!("h.{}.s", URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload).unwrap()))
}

#[test]
fn cart_and_session_survive_restart_independently() {
    let dir = TempDir::new().unwrap();

    {
        let mut store = LocalStore::open(dir.path()).unwrap();
        let mut session = SessionStore::hydrate(&store);
        let mut cart = CartStore::default();

        let valid = token(serde_json::json!({
            "sub": "9", "nombre": "Ana", "rol": "cliente", "exp": now_secs() + 3600
        }));
        session.set_token(&mut store, &valid).unwrap();
        cart.add(&mut store, &product(1, "Arroz", 3.5, 10)).unwrap();
        cart.add(&mut store, &product(1, "Arroz", 3.5, 10)).unwrap();
    }

    // "Restart": fresh stores over the same directory.
    let mut store = LocalStore::open(dir.path()).unwrap();
    let mut session = SessionStore::hydrate(&store);
    let cart = CartStore::hydrate(&store);

    assert!(session.is_authenticated(&mut store));
    assert_eq!(cart.get("1").unwrap().quantity, 2);
    assert_eq!(cart.total(), 7.0);
}

#[test]
fn expired_session_leaves_the_cart_alone() {
    let dir = TempDir::new().unwrap();
    let mut store = LocalStore::open(dir.path()).unwrap();
    let mut session = SessionStore::hydrate(&store);
    let mut cart = CartStore::default();

    let expired = token(serde_json::json!({"rol": "cliente", "exp": 1}));
    session.set_token(&mut store, &expired).unwrap();
    cart.add(&mut store, &product(7, "Atún en Lata", 2.5, 5)).unwrap();

    // Touching the claims invalidates the session and clears the token,
    // but the persisted cart is untouched.
    assert!(!session.is_authenticated(&mut store));
    assert_eq!(store.get(KEY_TOKEN), None);
    assert!(store.get(KEY_CART).is_some());

    let rehydrated = CartStore::hydrate(&store);
    assert_eq!(rehydrated.get("7").unwrap().quantity, 1);
}

#[test]
fn cart_persists_as_a_json_array() {
    let dir = TempDir::new().unwrap();
    let mut store = LocalStore::open(dir.path()).unwrap();
    let mut cart = CartStore::default();
    cart.add(&mut store, &product(3, "Pan", 1.2, 4)).unwrap();

    let raw = store.get(KEY_CART).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(raw).unwrap();
    assert!(parsed.is_array());
    assert_eq!(parsed[0]["id"], "3");
    assert_eq!(parsed[0]["quantity"], 1);
}
