//! Checkout
//!
//! Validates the cart into an outgoing sale record and tracks the
//! submission lifecycle. Validation is entirely local; the network call
//! itself lives with the caller so a failed submission can be retried
//! without rebuilding the cart.

use crate::state::cart::CartStore;
use shared::models::{SaleCreate, SaleItem};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    #[error("El carrito está vacío")]
    EmptyCart,

    #[error("Línea inválida en el carrito: {0}")]
    InvalidLine(String),

    #[error("El total de la venta no es válido")]
    InvalidTotal,
}

/// One line of a confirmed sale, for the on-screen receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Everything the confirmation screen shows after a successful sale.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub customer: String,
    pub lines: Vec<ReceiptLine>,
    pub total: f64,
    pub sale_id: Option<i64>,
}

/// Submission lifecycle of the active checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CheckoutState {
    #[default]
    Idle,
    /// A submission is in flight; further attempts are ignored.
    Submitting,
    Succeeded(Receipt),
    Failed {
        message: String,
    },
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Turn the cart into an outgoing sale record, or explain why it can't
/// be sold. Subtotals and the total are rounded to cents.
pub fn validate(cart: &CartStore) -> Result<SaleCreate, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut items = Vec::with_capacity(cart.len());
    let mut total = 0.0;
    for line in cart.lines() {
        if line.quantity == 0 {
            return Err(CheckoutError::InvalidLine(line.name.clone()));
        }
        if !line.unit_price.is_finite() || line.unit_price <= 0.0 {
            return Err(CheckoutError::InvalidLine(line.name.clone()));
        }
        let product_id: i64 = line
            .id
            .parse()
            .map_err(|_| CheckoutError::InvalidLine(line.name.clone()))?;

        let subtotal = round2(line.subtotal());
        total += subtotal;
        items.push(SaleItem {
            product_id,
            quantity: line.quantity as i64,
            unit_price: line.unit_price,
            subtotal,
        });
    }

    let total = round2(total);
    if !total.is_finite() || total <= 0.0 {
        return Err(CheckoutError::InvalidTotal);
    }

    Ok(SaleCreate { items, total })
}

/// Snapshot the cart into a receipt before it is cleared.
pub fn build_receipt(cart: &CartStore, customer: String) -> Receipt {
    let lines = cart
        .lines()
        .map(|line| ReceiptLine {
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            subtotal: round2(line.subtotal()),
        })
        .collect();
    Receipt {
        customer,
        lines,
        total: round2(cart.total()),
        sale_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;
    use shared::models::Product;
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

    fn setup() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn empty_cart_cannot_check_out() {
        let cart = CartStore::default();
        assert_eq!(validate(&cart), Err(CheckoutError::EmptyCart));
    }

    #[test]
    fn two_line_cart_totals_to_the_cent() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        let rice = product(1, "Arroz", 3.5, 10);
        let tuna = product(7, "Atún en Lata", 2.5, 5);
        cart.add(&mut store, &rice).unwrap();
        cart.add(&mut store, &rice).unwrap();
        cart.add(&mut store, &rice).unwrap();
        cart.add(&mut store, &tuna).unwrap();
        cart.add(&mut store, &tuna).unwrap();

        let sale = validate(&cart).unwrap();
        assert_eq!(sale.total, 15.5);
        assert_eq!(sale.items.len(), 2);
        let rice_item = sale.items.iter().find(|i| i.product_id == 1).unwrap();
        assert_eq!(rice_item.quantity, 3);
        assert_eq!(rice_item.subtotal, 10.5);
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        cart.add(&mut store, &product(2, "Regalo", 1.0, 3)).unwrap();
        // Simulate a stale line whose price decayed to zero in storage.
        store
            .set(
                crate::storage::KEY_CART,
                r#"[{"id":"2","name":"Regalo","unit_price":0.0,"quantity":1,"stock_snapshot":3,"image":null}]"#,
            )
            .unwrap();
        let cart = CartStore::hydrate(&store);
        assert_eq!(
            validate(&cart),
            Err(CheckoutError::InvalidLine("Regalo".into()))
        );
    }

    #[test]
    fn receipt_mirrors_the_cart() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        cart.add(&mut store, &product(7, "Atún en Lata", 2.5, 5)).unwrap();
        cart.add(&mut store, &product(7, "Atún en Lata", 2.5, 5)).unwrap();

        let receipt = build_receipt(&cart, "Ana".into());
        assert_eq!(receipt.customer, "Ana");
        assert_eq!(receipt.total, 5.0);
        assert_eq!(
            receipt.lines,
            vec![ReceiptLine {
                name: "Atún en Lata".into(),
                quantity: 2,
                unit_price: 2.5,
                subtotal: 5.0,
            }]
        );
    }
}
