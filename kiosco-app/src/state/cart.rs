//! Cart store
//!
//! A map from product id to cart line, mirrored to durable storage on
//! every mutation. Quantities are bounded by the stock snapshot cached
//! on the line, refreshed from the catalog whenever one is at hand.
//! All operations run on the UI thread in response to discrete key
//! events, so no locking is needed.

use crate::storage::{LocalStore, StorageError, KEY_CART};
use serde::{Deserialize, Serialize};
use shared::models::Product;
use std::collections::BTreeMap;
use thiserror::Error;

/// One entry in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub stock_snapshot: i64,
    pub image: Option<String>,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Producto sin stock")]
    OutOfStock,

    #[error("Producto no encontrado")]
    NotInCatalog,

    #[error("Stock máximo alcanzado ({0} disponibles)")]
    StockCeiling(i64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One user-visible adjustment made by [`CartStore::reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileNotice {
    /// The product no longer exists in the catalog; the line was dropped.
    Removed { name: String },
    /// The quantity exceeded the freshly observed stock and was clamped.
    Clamped { name: String, quantity: u32 },
}

impl ReconcileNotice {
    pub fn message(&self) -> String {
        match self {
            Self::Removed { name } => format!("{} ya no está disponible y se quitó del carrito", name),
            Self::Clamped { name, quantity } => {
                format!("{} ajustado a {} unidades por stock", name, quantity)
            }
        }
    }
}

/// Cart contents keyed by product id.
#[derive(Default)]
pub struct CartStore {
    lines: BTreeMap<String, CartLine>,
}

impl CartStore {
    /// Rebuild the cart from durable storage. The canonical persisted
    /// form is a JSON array; the legacy object form is also accepted.
    /// Lines without a positive quantity are dropped on hydration.
    pub fn hydrate(store: &LocalStore) -> Self {
        let mut lines = BTreeMap::new();
        if let Some(raw) = store.get(KEY_CART) {
            let parsed: Vec<CartLine> = serde_json::from_str::<Vec<CartLine>>(raw)
                .or_else(|_| {
                    serde_json::from_str::<BTreeMap<String, CartLine>>(raw)
                        .map(|map| map.into_values().collect())
                })
                .unwrap_or_default();
            for line in parsed {
                if !line.id.is_empty() && line.quantity > 0 {
                    lines.insert(line.id.clone(), line);
                }
            }
        }
        Self { lines }
    }

    fn persist(&self, store: &mut LocalStore) -> Result<(), StorageError> {
        let serialized = serde_json::to_string(&self.lines.values().collect::<Vec<_>>())?;
        store.set(KEY_CART, serialized)
    }

    /// Add one unit of `product`. An existing line is incremented only
    /// while below the current stock; a new line starts at quantity 1.
    pub fn add(&mut self, store: &mut LocalStore, product: &Product) -> Result<u32, CartError> {
        if product.stock <= 0 {
            return Err(CartError::OutOfStock);
        }

        let id = product.id.to_string();
        let quantity = match self.lines.get_mut(&id) {
            Some(line) => {
                if (line.quantity as i64) >= product.stock {
                    return Err(CartError::StockCeiling(product.stock));
                }
                line.quantity += 1;
                line.stock_snapshot = product.stock;
                line.quantity
            }
            None => {
                self.lines.insert(
                    id,
                    CartLine {
                        id: product.id.to_string(),
                        name: product.name.clone(),
                        unit_price: product.price,
                        quantity: 1,
                        stock_snapshot: product.stock,
                        image: product.image.clone(),
                    },
                );
                1
            }
        };

        self.persist(store)?;
        Ok(quantity)
    }

    /// Raise a line's quantity by one, bounded by the freshest stock
    /// figure available (catalog stock when given, else the snapshot).
    pub fn increment(
        &mut self,
        store: &mut LocalStore,
        id: &str,
        catalog_stock: Option<i64>,
    ) -> Result<u32, CartError> {
        let line = self.lines.get_mut(id).ok_or(CartError::NotInCatalog)?;
        let ceiling = catalog_stock.unwrap_or(line.stock_snapshot);
        if (line.quantity as i64) >= ceiling {
            return Err(CartError::StockCeiling(ceiling));
        }
        line.quantity += 1;
        line.stock_snapshot = ceiling;
        let quantity = line.quantity;
        self.persist(store)?;
        Ok(quantity)
    }

    /// Lower a line's quantity by one; reaching zero removes the line.
    /// Returns the remaining quantity, `None` once removed.
    pub fn decrement(&mut self, store: &mut LocalStore, id: &str) -> Result<Option<u32>, CartError> {
        let line = self.lines.get_mut(id).ok_or(CartError::NotInCatalog)?;
        line.quantity -= 1;
        let remaining = if line.quantity == 0 {
            self.lines.remove(id);
            None
        } else {
            Some(line.quantity)
        };
        self.persist(store)?;
        Ok(remaining)
    }

    /// Delete a line unconditionally.
    pub fn remove(&mut self, store: &mut LocalStore, id: &str) -> Result<(), CartError> {
        if self.lines.remove(id).is_some() {
            self.persist(store)?;
        }
        Ok(())
    }

    /// Empty the cart (confirmed checkout or explicit "empty cart").
    pub fn clear(&mut self, store: &mut LocalStore) -> Result<(), CartError> {
        self.lines.clear();
        self.persist(store)?;
        Ok(())
    }

    /// Adjust the cart against a freshly fetched catalog: drop lines
    /// whose product vanished, clamp quantities above current stock.
    /// Idempotent for a fixed catalog.
    pub fn reconcile(
        &mut self,
        store: &mut LocalStore,
        catalog: &[Product],
    ) -> Result<Vec<ReconcileNotice>, CartError> {
        let mut notices = Vec::new();
        let ids: Vec<String> = self.lines.keys().cloned().collect();

        for id in ids {
            let product = catalog.iter().find(|p| p.id.to_string() == id);
            match product {
                None => {
                    if let Some(line) = self.lines.remove(&id) {
                        notices.push(ReconcileNotice::Removed { name: line.name });
                    }
                }
                Some(product) => {
                    let Some(line) = self.lines.get_mut(&id) else {
                        continue;
                    };
                    if (line.quantity as i64) > product.stock {
                        if product.stock <= 0 {
                            let name = line.name.clone();
                            self.lines.remove(&id);
                            notices.push(ReconcileNotice::Removed { name });
                        } else {
                            line.quantity = product.stock as u32;
                            line.stock_snapshot = product.stock;
                            notices.push(ReconcileNotice::Clamped {
                                name: line.name.clone(),
                                quantity: line.quantity,
                            });
                        }
                    } else {
                        line.stock_snapshot = product.stock;
                    }
                }
            }
        }

        if !notices.is_empty() {
            self.persist(store)?;
        }
        Ok(notices)
    }

    pub fn get(&self, id: &str) -> Option<&CartLine> {
        self.lines.get(id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of subtotals.
    pub fn total(&self) -> f64 {
        self.lines.values().map(CartLine::subtotal).sum()
    }

    /// Total unit count, for the cart badge.
    pub fn total_quantity(&self) -> u64 {
        self.lines.values().map(|l| l.quantity as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn increment_caps_at_stock_snapshot() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        let tuna = product(7, "Atún en Lata", 2.5, 5);

        cart.add(&mut store, &tuna).unwrap();
        cart.add(&mut store, &tuna).unwrap();
        assert_eq!(cart.get("7").unwrap().quantity, 2);

        // Three more increments: capped at the stock ceiling of 5.
        assert_eq!(cart.increment(&mut store, "7", Some(5)).unwrap(), 3);
        assert_eq!(cart.increment(&mut store, "7", Some(5)).unwrap(), 4);
        assert_eq!(cart.increment(&mut store, "7", Some(5)).unwrap(), 5);
        for _ in 0..3 {
            match cart.increment(&mut store, "7", Some(5)) {
                Err(CartError::StockCeiling(5)) => {}
                other => panic!("unexpected: {other:?}"),
            }
        }
        assert_eq!(cart.get("7").unwrap().quantity, 5);
    }

    #[test]
    fn add_rejects_zero_stock() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        match cart.add(&mut store, &product(1, "Agotado", 1.0, 0)) {
            Err(CartError::OutOfStock) => {}
            other => panic!("unexpected: {other:?}"),
        }
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_to_zero_removes_the_line() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        cart.add(&mut store, &product(1, "Pan", 1.2, 9)).unwrap();

        assert_eq!(cart.decrement(&mut store, "1").unwrap(), None);
        assert!(cart.get("1").is_none());
        assert!(cart.lines().all(|l| l.quantity > 0));
    }

    #[test]
    fn mutations_round_trip_through_storage() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        cart.add(&mut store, &product(1, "Arroz", 3.5, 10)).unwrap();
        cart.add(&mut store, &product(1, "Arroz", 3.5, 10)).unwrap();
        cart.add(&mut store, &product(2, "Leche", 1.8, 4)).unwrap();
        cart.remove(&mut store, "2").unwrap();
        cart.add(&mut store, &product(3, "Pan", 1.2, 2)).unwrap();

        let reloaded = CartStore::hydrate(&store);
        let original: Vec<_> = cart.lines().cloned().collect();
        let restored: Vec<_> = reloaded.lines().cloned().collect();
        assert_eq!(original, restored);
        assert_eq!(reloaded.total_quantity(), 3);
    }

    #[test]
    fn hydrate_accepts_the_legacy_object_form() {
        let (_dir, mut store) = setup();
        store
            .set(
                KEY_CART,
                r#"{"1":{"id":"1","name":"Arroz","unit_price":3.5,"quantity":2,"stock_snapshot":10,"image":null}}"#,
            )
            .unwrap();
        let cart = CartStore::hydrate(&store);
        assert_eq!(cart.get("1").unwrap().quantity, 2);
    }

    #[test]
    fn reconcile_drops_vanished_and_clamps_overstock() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        cart.add(&mut store, &product(1, "Arroz", 3.5, 10)).unwrap();
        for _ in 0..5 {
            let _ = cart.increment(&mut store, "1", Some(10));
        }
        cart.add(&mut store, &product(2, "Leche", 1.8, 4)).unwrap();
        cart.add(&mut store, &product(3, "Pan", 1.2, 2)).unwrap();

        // Fresh catalog: product 2 vanished, product 1 stock fell to 3.
        let catalog = vec![product(1, "Arroz", 3.5, 3), product(3, "Pan", 1.2, 2)];
        let notices = cart.reconcile(&mut store, &catalog).unwrap();

        assert_eq!(notices.len(), 2);
        assert!(notices.contains(&ReconcileNotice::Removed { name: "Leche".into() }));
        assert!(notices.contains(&ReconcileNotice::Clamped { name: "Arroz".into(), quantity: 3 }));
        assert_eq!(cart.get("1").unwrap().quantity, 3);
        assert!(cart.get("2").is_none());

        // Idempotent: a second pass with the same catalog changes nothing.
        let again = cart.reconcile(&mut store, &catalog).unwrap();
        assert!(again.is_empty());
        assert_eq!(cart.get("1").unwrap().quantity, 3);
    }

    #[test]
    fn reconcile_removes_lines_clamped_to_zero() {
        let (_dir, mut store) = setup();
        let mut cart = CartStore::default();
        cart.add(&mut store, &product(1, "Arroz", 3.5, 10)).unwrap();

        let catalog = vec![product(1, "Arroz", 3.5, 0)];
        let notices = cart.reconcile(&mut store, &catalog).unwrap();
        assert_eq!(notices, vec![ReconcileNotice::Removed { name: "Arroz".into() }]);
        assert!(cart.is_empty());
    }
}
