//! Session-local cache of purchases for the receipt being built.
//!
//! Staged purchases never touch the committed purchase repository:
//! they exist only here until [`crate::checkout`] writes them to the
//! service, and the list order is the order they are presented and
//! committed in.

use std::collections::BTreeSet;

use buylog_core::{ProductId, Purchase, StagedId, StagedPurchase};

/// Ordered collection of not-yet-committed purchases.
#[derive(Debug, Default)]
pub struct StagingCache {
    purchases: Vec<StagedPurchase>,
}

impl StagingCache {
    /// Create an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            purchases: Vec::new(),
        }
    }

    /// Stage a new purchase and return a copy of the created entry.
    ///
    /// The temp id is unique even across rapid consecutive calls and
    /// can never collide with a service-assigned id.
    pub fn add(
        &mut self,
        product_id: ProductId,
        price_cents: i64,
        quantity: i64,
        tags: BTreeSet<String>,
    ) -> StagedPurchase {
        let staged = StagedPurchase {
            temp_id: StagedId::generate(),
            product_id,
            price_cents,
            quantity,
            tags,
        };
        self.purchases.push(staged.clone());
        staged
    }

    /// Remove a staged purchase. A no-op when the id is absent.
    pub fn remove(&mut self, temp_id: &StagedId) {
        self.purchases.retain(|p| &p.temp_id != temp_id);
    }

    /// Replace the fields of a staged purchase, keeping its position
    /// and temp id. A no-op when the id is absent.
    pub fn update(
        &mut self,
        temp_id: &StagedId,
        product_id: ProductId,
        price_cents: i64,
        quantity: i64,
        tags: BTreeSet<String>,
    ) {
        if let Some(entry) = self.purchases.iter_mut().find(|p| &p.temp_id == temp_id) {
            entry.product_id = product_id;
            entry.price_cents = price_cents;
            entry.quantity = quantity;
            entry.tags = tags;
        }
    }

    /// Union `tags` into every staged purchase's tag set.
    ///
    /// Applied to all entries in one pass over local state, so the
    /// cache can never end up with some entries tagged and others not.
    pub fn bulk_add_tags<I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = String>,
    {
        let tags: BTreeSet<String> = tags.into_iter().collect();
        for entry in &mut self.purchases {
            entry.tags.extend(tags.iter().cloned());
        }
    }

    /// Re-stage committed purchases for editing their receipt.
    ///
    /// Copies product, price, quantity, and tags into fresh staged
    /// entries; the originals are deleted separately once the edited
    /// receipt is recommitted.
    pub fn stage_purchases(&mut self, purchases: &[Purchase]) {
        for purchase in purchases {
            self.add(
                purchase.product_id,
                purchase.price_cents,
                purchase.quantity,
                purchase.tags.clone(),
            );
        }
    }

    /// Drop everything. Called after a full commit succeeds or when
    /// the in-progress receipt is abandoned.
    pub fn clear(&mut self) {
        self.purchases.clear();
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }

    /// Number of staged purchases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.purchases.len()
    }

    /// Staged purchases in insertion order.
    #[must_use]
    pub fn list(&self) -> &[StagedPurchase] {
        &self.purchases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_add_then_remove_leaves_empty() {
        let mut cache = StagingCache::new();
        let temp_id = cache
            .add(ProductId::new(1), 100, 1, tags(&["food"]))
            .temp_id;
        assert!(!cache.is_empty());

        cache.remove(&temp_id);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_rapid_adds_get_distinct_ids() {
        let mut cache = StagingCache::new();
        let a = cache.add(ProductId::new(1), 100, 1, tags(&[])).temp_id;
        let b = cache.add(ProductId::new(1), 100, 1, tags(&[])).temp_id;
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cache = StagingCache::new();
        cache.add(ProductId::new(1), 100, 1, tags(&[]));
        cache.remove(&StagedId::generate());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_bulk_add_tags_unions_without_duplicates() {
        let mut cache = StagingCache::new();
        cache.add(ProductId::new(1), 100, 1, tags(&["a"]));
        cache.add(ProductId::new(2), 200, 1, tags(&["a", "x"]));

        cache.bulk_add_tags(vec!["x".to_string()]);

        for entry in cache.list() {
            assert_eq!(entry.tags, tags(&["a", "x"]));
        }
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut cache = StagingCache::new();
        cache.add(ProductId::new(1), 100, 1, tags(&[]));
        cache.add(ProductId::new(2), 200, 1, tags(&[]));
        cache.add(ProductId::new(3), 300, 1, tags(&[]));

        let order: Vec<i64> = cache.list().iter().map(|p| p.product_id.as_i64()).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn test_update_keeps_position_and_id() {
        let mut cache = StagingCache::new();
        let temp_id = cache.add(ProductId::new(1), 100, 1, tags(&[])).temp_id;
        cache.add(ProductId::new(2), 200, 1, tags(&[]));

        cache.update(&temp_id, ProductId::new(5), 150, 3, tags(&["food"]));

        let first = cache.list().first().expect("entry");
        assert_eq!(first.temp_id, temp_id);
        assert_eq!(first.product_id, ProductId::new(5));
        assert_eq!(first.quantity, 3);
    }

    #[test]
    fn test_clear_empties_cache() {
        let mut cache = StagingCache::new();
        cache.add(ProductId::new(1), 100, 1, tags(&[]));
        cache.clear();
        assert!(cache.is_empty());
    }
}
