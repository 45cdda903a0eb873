//! Owned repositories over the BuyLog service.
//!
//! Each store holds one authoritative collection fetched from the
//! service and exposes derived projections as pure recomputations.
//! The contract is the same everywhere:
//!
//! - `load` replaces the collection, never merges, so entries deleted
//!   elsewhere cannot linger as ghosts
//! - writes mutate local state only after the service confirms them
//! - a stale load response (issued before a newer one) is discarded
//!   via [`LoadSequence`], so the last *issued* request wins
//!
//! Stores are plain owned values: construct one per application state
//! (or per test), no process-wide singletons.

mod group;
mod invites;
mod products;
mod purchases;

pub use group::{GroupStore, MemberInfo};
pub use invites::{InviteStore, RelationState, relation_between};
pub use products::ProductStore;
pub use purchases::PurchaseStore;

/// Monotonic request-token guard for collection loads.
///
/// Loads are asynchronous; when a reload is issued while an older one
/// is still in flight, the older response may arrive last. Tokens are
/// handed out in issue order and only the latest issued token may
/// apply its payload.
#[derive(Debug, Default)]
pub struct LoadSequence {
    issued: u64,
}

/// Token identifying one issued load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

impl LoadSequence {
    /// Create a sequence with no requests issued.
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Issue a token for a new load request.
    pub fn begin(&mut self) -> LoadToken {
        self.issued += 1;
        LoadToken(self.issued)
    }

    /// Whether a response carrying `token` is still the latest issued.
    #[must_use]
    pub const fn is_current(&self, token: LoadToken) -> bool {
        token.0 == self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_issued_token_wins() {
        let mut seq = LoadSequence::new();
        let first = seq.begin();
        let second = seq.begin();

        // The older request's response arrives after the newer one was
        // issued; it must be discarded.
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }
}
