//! Derived receipt view.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{PurchaseId, ReceiptId};

/// A grouping of purchases sharing a receipt id - one checkout trip.
///
/// Receipts are a view, not a source of truth: they are recomputed on
/// demand from the committed purchase collection and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    /// Date of the first purchase inserted into the group.
    pub date: DateTime<Utc>,
    /// Store of the first purchase inserted into the group.
    pub store: String,
    /// Tags present on every purchase of the receipt.
    pub common_tags: BTreeSet<String>,
    pub purchase_ids: Vec<PurchaseId>,
    /// Sum of line totals in minor units.
    pub total_cents: i64,
}
