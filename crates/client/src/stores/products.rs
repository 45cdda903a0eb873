//! Product catalog repository.

use std::collections::BTreeSet;

use buylog_core::{Product, ProductId};

use crate::api::{ApiError, NewProduct, ProductApi};

use super::{LoadSequence, LoadToken};

/// Repository of catalog products.
#[derive(Debug, Default)]
pub struct ProductStore {
    items: Vec<Product>,
    loads: LoadSequence,
}

impl ProductStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            loads: LoadSequence::new(),
        }
    }

    /// The current collection.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product_by_id(&self, id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id == id)
    }

    /// Product for display: the catalog entry, or a placeholder with
    /// the id preserved and the name "Unknown Product" when the
    /// catalog no longer has it. Aggregation degrades, never fails.
    #[must_use]
    pub fn product_or_placeholder(&self, id: ProductId) -> Product {
        self.product_by_id(id)
            .cloned()
            .unwrap_or_else(|| Product::placeholder(id))
    }

    /// Unique brands, empty filtered, stably sorted.
    #[must_use]
    pub fn brands(&self) -> Vec<String> {
        Self::distinct(self.items.iter().map(|p| p.brand.clone()))
    }

    /// Unique volumes, empty filtered, stably sorted.
    #[must_use]
    pub fn volumes(&self) -> Vec<String> {
        Self::distinct(self.items.iter().map(|p| p.volume.clone()))
    }

    /// Unique default tags across the catalog, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let tags: BTreeSet<String> = self
            .items
            .iter()
            .flat_map(|p| p.default_tags.iter().cloned())
            .filter(|t| !t.is_empty())
            .collect();
        tags.into_iter().collect()
    }

    fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
        let mut values: Vec<String> = values.filter(|v| !v.is_empty()).collect();
        values.sort();
        values.dedup();
        values
    }

    /// Replace the collection with a fresh fetch.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; the local collection is untouched on
    /// failure.
    pub async fn load(&mut self, api: &impl ProductApi) -> Result<(), ApiError> {
        let token = self.loads.begin();
        let products = api.fetch_products().await?;
        self.apply_loaded(token, products);
        Ok(())
    }

    /// Issue a load token without performing I/O.
    pub fn begin_load(&mut self) -> LoadToken {
        self.loads.begin()
    }

    /// Apply a fetched payload; stale tokens are discarded.
    pub fn apply_loaded(&mut self, token: LoadToken, products: Vec<Product>) -> bool {
        if !self.loads.is_current(token) {
            tracing::debug!("Discarding stale product load response");
            return false;
        }
        self.items = products;
        true
    }

    /// Create a product on the service and append it once confirmed.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; nothing is appended on failure.
    pub async fn create(
        &mut self,
        api: &impl ProductApi,
        req: &NewProduct,
    ) -> Result<Product, ApiError> {
        let created = api.create_product(req).await?;
        self.items.push(created.clone());
        Ok(created)
    }

    /// Update a product on the service and replace the local entry
    /// once confirmed.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; the old entry stays on failure.
    pub async fn update(
        &mut self,
        api: &impl ProductApi,
        product: &Product,
    ) -> Result<Product, ApiError> {
        let updated = api.update_product(product).await?;
        if let Some(entry) = self.items.iter_mut().find(|p| p.id == updated.id) {
            *entry = updated.clone();
        }
        Ok(updated)
    }

    /// Drop the local collection (logout path).
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
