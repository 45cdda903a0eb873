//! Committing a staged receipt to the service.
//!
//! There is no batch endpoint: a receipt is committed as one purchase
//! write per staged entry, in staging order, all carrying the same
//! receipt id, store, and date. A write failure stops the sequence
//! immediately; entries already written stay committed and the
//! remainder stays staged, so the user retries only what is left.

use chrono::{DateTime, Utc};
use thiserror::Error;

use buylog_core::{Purchase, ReceiptId, StagedPurchase};

use crate::api::{ApiError, CreatePurchaseRequest, PurchaseApi};
use crate::staging::StagingCache;
use crate::stores::PurchaseStore;

/// Pre-commit validation failures. Checked before any network call so
/// a bad receipt never produces a partial write.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No purchases are staged.
    #[error("Nothing to commit: no purchases staged")]
    EmptyReceipt,

    /// The receipt header has no store name.
    #[error("Store name must not be empty")]
    EmptyStore,

    /// A staged purchase has a non-positive price.
    #[error("Price must be positive")]
    NonPositivePrice,

    /// A staged purchase has a quantity below one.
    #[error("Quantity must be at least 1")]
    QuantityBelowOne,
}

/// Receipt-level fields shared by every purchase in one commit.
#[derive(Debug, Clone)]
pub struct ReceiptHeader {
    pub receipt_id: ReceiptId,
    pub store: String,
    pub date: DateTime<Utc>,
}

/// Where a commit stopped, when it did not finish.
#[derive(Debug)]
pub struct CommitFailure {
    /// The staged entry whose write failed; it and everything after it
    /// remain staged.
    pub failed: StagedPurchase,
    pub error: ApiError,
}

/// Result of a commit attempt. Partial success is a terminal state,
/// not an error: the caller reports it and leaves the remainder staged
/// for a retry.
#[derive(Debug)]
pub struct CommitOutcome {
    /// Purchases the service confirmed, in commit order.
    pub committed: Vec<Purchase>,
    /// Present when the sequence stopped early.
    pub failure: Option<CommitFailure>,
}

impl CommitOutcome {
    /// Whether every staged purchase was written.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

fn validate(staging: &StagingCache, header: &ReceiptHeader) -> Result<(), ValidationError> {
    if staging.is_empty() {
        return Err(ValidationError::EmptyReceipt);
    }
    if header.store.trim().is_empty() {
        return Err(ValidationError::EmptyStore);
    }
    for entry in staging.list() {
        if entry.price_cents <= 0 {
            return Err(ValidationError::NonPositivePrice);
        }
        if entry.quantity < 1 {
            return Err(ValidationError::QuantityBelowOne);
        }
    }
    Ok(())
}

/// Commit every staged purchase as one receipt.
///
/// Writes sequentially in staging order. Each confirmed write removes
/// its entry from the cache and appends the service's purchase to the
/// repository; the first failure stops the sequence with the remainder
/// still staged. Validation failures happen before any write.
///
/// # Errors
///
/// Returns [`ValidationError`] when the staged receipt is invalid.
/// Write failures are not errors; they are reported in the outcome.
pub async fn commit_receipt(
    api: &impl PurchaseApi,
    staging: &mut StagingCache,
    purchases: &mut PurchaseStore,
    header: &ReceiptHeader,
) -> Result<CommitOutcome, ValidationError> {
    validate(staging, header)?;

    let entries: Vec<StagedPurchase> = staging.list().to_vec();
    let mut committed = Vec::with_capacity(entries.len());

    for entry in entries {
        let req = CreatePurchaseRequest {
            product_id: entry.product_id,
            price_cents: entry.price_cents,
            quantity: entry.quantity,
            tags: entry.tags.iter().cloned().collect(),
            store: header.store.clone(),
            date: header.date,
            receipt_id: header.receipt_id,
        };
        match purchases.create(api, &req).await {
            Ok(purchase) => {
                staging.remove(&entry.temp_id);
                committed.push(purchase);
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    committed = committed.len(),
                    remaining = staging.len(),
                    "Receipt commit stopped early"
                );
                return Ok(CommitOutcome {
                    committed,
                    failure: Some(CommitFailure {
                        failed: entry,
                        error,
                    }),
                });
            }
        }
    }

    Ok(CommitOutcome {
        committed,
        failure: None,
    })
}
