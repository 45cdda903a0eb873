//! Committed and staged purchases.
//!
//! A purchase goes through two shapes in its lifetime: a
//! [`StagedPurchase`] while the receipt is being built locally (no
//! durable id yet), and a [`Purchase`] once the service has accepted
//! the write and assigned an id. Keeping them as separate types makes
//! it impossible to mix staged entries into committed collections.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::{ProductId, PurchaseId, ReceiptId, UserId};

/// A committed purchase as stored by the BuyLog service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub product_id: ProductId,
    /// Price per unit in minor currency units. Always positive.
    #[serde(rename = "price")]
    pub price_cents: i64,
    /// Units bought. The service may omit it for legacy rows; a
    /// missing quantity means one unit.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub store: String,
    pub date: DateTime<Utc>,
    /// Checkout-session grouping. Missing on purchases that predate
    /// receipt grouping; those fall into [`ReceiptId::UNASSIGNED`].
    #[serde(default)]
    pub receipt_id: Option<ReceiptId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

const fn default_quantity() -> i64 {
    1
}

impl Purchase {
    /// Line total in minor units. A non-positive quantity is treated
    /// as one unit so malformed rows degrade instead of poisoning the
    /// receipt total.
    #[must_use]
    pub const fn line_total_cents(&self) -> i64 {
        let quantity = if self.quantity >= 1 { self.quantity } else { 1 };
        self.price_cents * quantity
    }
}

/// Temporary identifier of a staged purchase.
///
/// Prefixed so it can never be confused with a service-assigned id,
/// and uuid-backed so two rapid allocations never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StagedId(String);

impl StagedId {
    /// Allocate a fresh temporary id.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("temp_{}", Uuid::new_v4()))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StagedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A purchase that has not yet been written to the service.
///
/// Lives only in the staging cache; committing converts it into a
/// [`Purchase`] via the external write API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPurchase {
    pub temp_id: StagedId,
    pub product_id: ProductId,
    pub price_cents: i64,
    pub quantity: i64,
    pub tags: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_ids_are_unique_and_prefixed() {
        let a = StagedId::generate();
        let b = StagedId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("temp_"));
    }

    #[test]
    fn test_purchase_deserializes_service_row() {
        let json = r#"{
            "id": 10,
            "product_id": 3,
            "price": 1250,
            "quantity": 2,
            "tags": ["food", "milk"],
            "store": "Supermarket A",
            "date": "2025-07-10T00:00:00Z",
            "receipt_id": 1752105600,
            "user_id": 1
        }"#;
        let purchase: Purchase = serde_json::from_str(json).expect("deserialize");
        assert_eq!(purchase.line_total_cents(), 2500);
        assert_eq!(purchase.receipt_id, Some(ReceiptId::new(1_752_105_600)));
    }

    #[test]
    fn test_legacy_row_defaults() {
        // No quantity, tags, or receipt_id on rows from before grouping
        let json = r#"{"id": 1, "product_id": 2, "price": 500, "date": "2024-01-02T00:00:00Z"}"#;
        let purchase: Purchase = serde_json::from_str(json).expect("deserialize");
        assert_eq!(purchase.quantity, 1);
        assert_eq!(purchase.receipt_id, None);
        assert_eq!(purchase.line_total_cents(), 500);
    }

    #[test]
    fn test_line_total_treats_zero_quantity_as_one() {
        let json = r#"{"id": 1, "product_id": 2, "price": 300, "quantity": 0, "date": "2024-01-02T00:00:00Z"}"#;
        let purchase: Purchase = serde_json::from_str(json).expect("deserialize");
        assert_eq!(purchase.line_total_cents(), 300);
    }
}
