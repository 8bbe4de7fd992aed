//! Catalog store
//!
//! Holds the displayed product list plus the last full (unfiltered)
//! fetch. Fetches are tagged with a monotonically increasing sequence
//! number; a response is applied only if it is the latest issued, so a
//! slow category-filter response can never overwrite a newer search.
//!
//! Server-side filtering is trusted only when it visibly did something:
//! a filtered result the same size as the full catalog means the backend
//! ignored the parameter, and the store falls back to filtering the last
//! full fetch client-side.

use shared::models::Product;

/// Active category / search criteria.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_none()
    }

    fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let term = search.to_lowercase();
            let hit = product.name.to_lowercase().contains(&term)
                || product.description.to_lowercase().contains(&term)
                || product.category.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Product catalog with request sequencing and fallback filtering.
#[derive(Default)]
pub struct CatalogStore {
    /// Products currently displayed (already filtered).
    products: Vec<Product>,
    /// Last successful unfiltered fetch; basis for client-side filtering.
    full: Vec<Product>,
    /// Sequence number of the latest issued fetch.
    seq: u64,
    loading: bool,
    error: Option<String>,
}

impl CatalogStore {
    /// Register a new outgoing fetch and return its sequence number.
    pub fn begin_fetch(&mut self) -> u64 {
        self.seq += 1;
        self.loading = true;
        self.seq
    }

    /// Apply a completed fetch. Returns `false` when the response was
    /// stale (a newer fetch has been issued since) and was discarded.
    pub fn apply(
        &mut self,
        seq: u64,
        result: Result<Vec<Product>, String>,
        filter: &CatalogFilter,
    ) -> bool {
        if seq != self.seq {
            tracing::debug!(seq, latest = self.seq, "respuesta de catálogo obsoleta descartada");
            return false;
        }
        self.loading = false;

        match result {
            Ok(products) => {
                self.error = None;
                if filter.is_empty() {
                    self.full = products.clone();
                    self.products = products;
                } else if !self.full.is_empty() && products.len() == self.full.len() {
                    // Backend ignored the filter; fall back to the local one.
                    tracing::debug!("el backend no filtró, aplicando filtro local");
                    self.full = products;
                    self.products = self.filter_local(filter);
                } else {
                    self.products = products;
                }
            }
            Err(message) => {
                // Keep whatever was last shown; the UI renders the error
                // with a retry affordance instead of faking success.
                self.error = Some(message);
            }
        }
        true
    }

    /// Filter the last full fetch client-side.
    pub fn filter_local(&self, filter: &CatalogFilter) -> Vec<Product> {
        self.full.iter().filter(|p| filter.matches(p)).cloned().collect()
    }

    /// Unique category names from the full catalog, capitalized for the
    /// picker, in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for product in &self.full {
            let category = capitalize(&product.category);
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    /// Look up a product in the displayed list by its cart id.
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.to_string() == id)
    }

    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Stock figure for a product, looked up in the full catalog so an
    /// active filter cannot hide it.
    pub fn stock_of(&self, id: i64) -> Option<i64> {
        self.full.iter().find(|p| p.id == id).map(|p| p.stock)
    }

    /// Best-effort local stock decrement after a confirmed sale, floored
    /// at zero. The backend already holds the authoritative figures.
    pub fn decrement_stock(&mut self, id: i64, sold: i64) {
        for list in [&mut self.products, &mut self.full] {
            if let Some(product) = list.iter_mut().find(|p| p.id == id) {
                product.stock = (product.stock - sold).max(0);
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn full(&self) -> &[Product] {
        &self.full
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, category: &str, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: format!("{} fresco", name),
            price: 1.0,
            stock,
            category: category.to_string(),
            image: None,
        }
    }

    fn full_catalog() -> Vec<Product> {
        vec![
            product(1, "Arroz", "granos", 10),
            product(2, "Leche", "lácteos", 4),
            product(3, "Yogur", "lácteos", 6),
        ]
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut store = CatalogStore::default();
        let old_seq = store.begin_fetch();
        let new_seq = store.begin_fetch();

        assert!(!store.apply(old_seq, Ok(vec![product(9, "Viejo", "x", 1)]), &CatalogFilter::default()));
        assert!(store.products().is_empty());

        assert!(store.apply(new_seq, Ok(full_catalog()), &CatalogFilter::default()));
        assert_eq!(store.products().len(), 3);
    }

    #[test]
    fn ignored_server_filter_falls_back_to_local() {
        let mut store = CatalogStore::default();
        let seq = store.begin_fetch();
        store.apply(seq, Ok(full_catalog()), &CatalogFilter::default());

        // Backend "filters" by category but returns the full set.
        let filter = CatalogFilter { category: Some("lácteos".into()), search: None };
        let seq = store.begin_fetch();
        store.apply(seq, Ok(full_catalog()), &filter);

        let shown: Vec<i64> = store.products().iter().map(|p| p.id).collect();
        assert_eq!(shown, vec![2, 3]);
    }

    #[test]
    fn honored_server_filter_is_trusted() {
        let mut store = CatalogStore::default();
        let seq = store.begin_fetch();
        store.apply(seq, Ok(full_catalog()), &CatalogFilter::default());

        let filter = CatalogFilter { category: Some("granos".into()), search: None };
        let seq = store.begin_fetch();
        store.apply(seq, Ok(vec![product(1, "Arroz", "granos", 10)]), &filter);
        assert_eq!(store.products().len(), 1);
        assert_eq!(store.products()[0].id, 1);
    }

    #[test]
    fn search_matches_name_description_and_category() {
        let mut store = CatalogStore::default();
        let seq = store.begin_fetch();
        store.apply(seq, Ok(full_catalog()), &CatalogFilter::default());

        let by_name = CatalogFilter { category: None, search: Some("ARROZ".into()) };
        assert_eq!(store.filter_local(&by_name).len(), 1);

        let by_category = CatalogFilter { category: None, search: Some("lácte".into()) };
        assert_eq!(store.filter_local(&by_category).len(), 2);
    }

    #[test]
    fn fetch_failure_keeps_last_products_and_sets_error() {
        let mut store = CatalogStore::default();
        let seq = store.begin_fetch();
        store.apply(seq, Ok(full_catalog()), &CatalogFilter::default());

        let seq = store.begin_fetch();
        store.apply(seq, Err("sin conexión".into()), &CatalogFilter::default());
        assert_eq!(store.products().len(), 3);
        assert_eq!(store.error(), Some("sin conexión"));
        assert!(!store.is_loading());
    }

    #[test]
    fn stock_decrement_floors_at_zero() {
        let mut store = CatalogStore::default();
        let seq = store.begin_fetch();
        store.apply(seq, Ok(full_catalog()), &CatalogFilter::default());

        store.decrement_stock(2, 10);
        assert_eq!(store.get(2).unwrap().stock, 0);
        store.decrement_stock(1, 4);
        assert_eq!(store.get(1).unwrap().stock, 6);
    }

    #[test]
    fn stock_lookup_ignores_the_active_filter() {
        let mut store = CatalogStore::default();
        let seq = store.begin_fetch();
        store.apply(seq, Ok(full_catalog()), &CatalogFilter::default());

        // Honored filter narrows the display to "granos"; Leche (id 2)
        // drops out of the displayed list but stays in the full catalog.
        let filter = CatalogFilter { category: Some("granos".into()), search: None };
        let seq = store.begin_fetch();
        store.apply(seq, Ok(vec![product(1, "Arroz", "granos", 10)]), &filter);
        assert!(store.get(2).is_none());

        store.decrement_stock(2, 1);
        assert_eq!(store.stock_of(2), Some(3));
        assert_eq!(store.stock_of(99), None);
    }

    #[test]
    fn categories_are_unique_and_capitalized() {
        let mut store = CatalogStore::default();
        let seq = store.begin_fetch();
        store.apply(seq, Ok(full_catalog()), &CatalogFilter::default());
        assert_eq!(store.categories(), vec!["Granos".to_string(), "Lácteos".to_string()]);
    }
}
