//! Purchase repository.
//!
//! Holds the authoritative list of committed purchases. Receipts are
//! derived from this collection by [`crate::receipts::compute_receipts`];
//! staged purchases never appear here.

use buylog_core::{Purchase, PurchaseId, ReceiptId};

use crate::api::{ApiError, CreatePurchaseRequest, PurchaseApi};

use super::{LoadSequence, LoadToken};

/// Repository of committed purchases.
#[derive(Debug, Default)]
pub struct PurchaseStore {
    items: Vec<Purchase>,
    loads: LoadSequence,
}

impl PurchaseStore {
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
    pub fn items(&self) -> &[Purchase] {
        &self.items
    }

    /// Unique store names across all purchases, empty names filtered,
    /// stably sorted. Recomputed per call; never mutates the source.
    #[must_use]
    pub fn shops(&self) -> Vec<String> {
        let mut shops: Vec<String> = self
            .items
            .iter()
            .map(|p| p.store.clone())
            .filter(|s| !s.is_empty())
            .collect();
        shops.sort();
        shops.dedup();
        shops
    }

    /// Purchases belonging to one receipt, in collection order.
    #[must_use]
    pub fn purchases_for_receipt(&self, receipt_id: ReceiptId) -> Vec<Purchase> {
        self.items
            .iter()
            .filter(|p| p.receipt_id.unwrap_or(ReceiptId::UNASSIGNED) == receipt_id)
            .cloned()
            .collect()
    }

    /// Replace the collection with a fresh fetch.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; the local collection is untouched on
    /// failure.
    pub async fn load(&mut self, api: &impl PurchaseApi) -> Result<(), ApiError> {
        let token = self.loads.begin();
        let purchases = api.fetch_purchases().await?;
        self.apply_loaded(token, purchases);
        Ok(())
    }

    /// Issue a load token without performing I/O. Paired with
    /// [`Self::apply_loaded`]; lets callers drive overlapping loads.
    pub fn begin_load(&mut self) -> LoadToken {
        self.loads.begin()
    }

    /// Apply a fetched payload, replacing (never merging) the current
    /// collection. Returns false and leaves state untouched when the
    /// token is stale, so an in-flight response issued before a newer
    /// load cannot clobber it.
    pub fn apply_loaded(&mut self, token: LoadToken, purchases: Vec<Purchase>) -> bool {
        if !self.loads.is_current(token) {
            tracing::debug!("Discarding stale purchase load response");
            return false;
        }
        self.items = purchases;
        true
    }

    /// Create a purchase on the service and append it locally once
    /// confirmed.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; nothing is appended on failure.
    pub async fn create(
        &mut self,
        api: &impl PurchaseApi,
        req: &CreatePurchaseRequest,
    ) -> Result<Purchase, ApiError> {
        let created = api.create_purchase(req).await?;
        self.items.push(created.clone());
        Ok(created)
    }

    /// Delete a purchase on the service, then remove it locally.
    ///
    /// Local removal happens only after server confirmation; an
    /// optimistic delete could silently diverge from the service.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; the entry stays present on failure.
    pub async fn delete(&mut self, api: &impl PurchaseApi, id: PurchaseId) -> Result<(), ApiError> {
        api.delete_purchase(id).await?;
        self.items.retain(|p| p.id != id);
        Ok(())
    }

    /// Delete every purchase of a receipt, one confirmed delete at a
    /// time. Stops at the first failure; purchases already deleted
    /// stay removed locally (partial progress is real progress, not
    /// rolled back).
    ///
    /// # Errors
    ///
    /// Propagates the first `ApiError` encountered.
    pub async fn delete_receipt(
        &mut self,
        api: &impl PurchaseApi,
        receipt_id: ReceiptId,
    ) -> Result<(), ApiError> {
        let ids: Vec<PurchaseId> = self
            .purchases_for_receipt(receipt_id)
            .iter()
            .map(|p| p.id)
            .collect();
        for id in ids {
            self.delete(api, id).await?;
        }
        Ok(())
    }

    /// Drop the local collection (logout path).
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buylog_core::{ProductId, UserId};

    fn purchase(id: i64, store: &str, receipt_id: Option<i64>) -> Purchase {
        Purchase {
            id: PurchaseId::new(id),
            product_id: ProductId::new(1),
            price_cents: 100,
            quantity: 1,
            tags: std::collections::BTreeSet::new(),
            store: store.to_string(),
            date: "2025-07-10T00:00:00Z".parse().expect("valid date"),
            receipt_id: receipt_id.map(ReceiptId::new),
            user_id: Some(UserId::new(1)),
        }
    }

    #[test]
    fn test_load_replaces_not_merges() {
        let mut store = PurchaseStore::new();

        let token = store.begin_load();
        assert!(store.apply_loaded(token, vec![purchase(1, "A", None), purchase(2, "B", None)]));

        let token = store.begin_load();
        assert!(store.apply_loaded(token, vec![purchase(3, "C", None)]));

        let ids: Vec<i64> = store.items().iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut store = PurchaseStore::new();

        let stale = store.begin_load();
        let fresh = store.begin_load();

        // Newer request's response arrives first
        assert!(store.apply_loaded(fresh, vec![purchase(2, "B", None)]));
        // Older response arrives late and must be ignored
        assert!(!store.apply_loaded(stale, vec![purchase(1, "A", None)]));

        let ids: Vec<i64> = store.items().iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_shops_dedup_filter_sort() {
        let mut store = PurchaseStore::new();
        let token = store.begin_load();
        store.apply_loaded(
            token,
            vec![
                purchase(1, "Market", None),
                purchase(2, "", None),
                purchase(3, "Bakery", None),
                purchase(4, "Market", None),
            ],
        );

        assert_eq!(store.shops(), vec!["Bakery".to_string(), "Market".to_string()]);
    }

    #[test]
    fn test_purchases_for_receipt_includes_sentinel() {
        let mut store = PurchaseStore::new();
        let token = store.begin_load();
        store.apply_loaded(
            token,
            vec![purchase(1, "A", Some(9)), purchase(2, "A", None)],
        );

        let in_receipt = store.purchases_for_receipt(ReceiptId::new(9));
        assert_eq!(in_receipt.len(), 1);
        let unassigned = store.purchases_for_receipt(ReceiptId::UNASSIGNED);
        assert_eq!(unassigned.len(), 1);
    }
}
