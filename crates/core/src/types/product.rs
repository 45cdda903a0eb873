//! Product catalog entry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::id::{ProductId, UserId};

/// Name substituted when a purchase references a product that is
/// missing from the catalog.
pub(crate) const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";

/// A product known to the catalog.
///
/// Immutable once fetched except through explicit update operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub brand: String,
    /// Tags pre-applied when the product is added to a receipt.
    #[serde(default)]
    pub default_tags: BTreeSet<String>,
    pub user_id: UserId,
}

impl Product {
    /// Placeholder for a purchase whose product has been deleted from
    /// the catalog. The id is preserved so the reference stays intact;
    /// aggregation must degrade rather than fail.
    #[must_use]
    pub fn placeholder(id: ProductId) -> Self {
        Self {
            id,
            name: UNKNOWN_PRODUCT_NAME.to_string(),
            volume: String::new(),
            brand: String::new(),
            default_tags: BTreeSet::new(),
            user_id: UserId::new(0),
        }
    }
}
