//! Owned application state tying the client pieces together.
//!
//! [`AppState`] is the root object a frontend constructs once per
//! session: the API client plus one store per collection, the staging
//! cache, and the receipt id source. It is a plain owned value with no
//! interior mutability; embedders that need sharing wrap it themselves
//! (e.g. in a `tokio::sync::Mutex`).

use chrono::{DateTime, Utc};

use buylog_core::{Purchase, Receipt, ReceiptId};

use crate::api::{ApiClient, InviteApi, SendInviteOutcome};
use crate::checkout::{self, CommitOutcome, ReceiptHeader};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::receipts::{self, DayGroup, ReceiptIdSource};
use crate::staging::StagingCache;
use crate::stores::{GroupStore, InviteStore, ProductStore, PurchaseStore};

/// Root state for one client session.
pub struct AppState {
    config: ClientConfig,
    api: ApiClient,
    pub purchases: PurchaseStore,
    pub products: ProductStore,
    pub group: GroupStore,
    pub invites: InviteStore,
    pub staging: StagingCache,
    receipt_ids: ReceiptIdSource,
}

impl AppState {
    /// Build a session from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be constructed
    /// (e.g. the configured token is not a valid header value).
    pub fn new(config: ClientConfig) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            config,
            api,
            purchases: PurchaseStore::new(),
            products: ProductStore::new(),
            group: GroupStore::new(),
            invites: InviteStore::new(),
            staging: StagingCache::new(),
            receipt_ids: ReceiptIdSource::new(),
        })
    }

    /// The configuration this session was built from.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying API client (cheaply cloneable).
    #[must_use]
    pub fn api(&self) -> ApiClient {
        self.api.clone()
    }

    /// Load every collection from the service.
    ///
    /// Purchases and products first (the data the main views need),
    /// then membership and invites. A membership fetch failure degrades
    /// to empty membership inside [`GroupStore::load`]; session expiry
    /// from any call propagates.
    ///
    /// # Errors
    ///
    /// Propagates the first failure; collections already loaded keep
    /// their fresh data.
    pub async fn load_all(&mut self) -> Result<()> {
        let api = self.api.clone();
        self.purchases.load(&api).await?;
        self.products.load(&api).await?;
        self.group.load(&api).await?;
        self.invites.load(&api).await?;
        Ok(())
    }

    /// Receipts derived from the purchase collection, newest first.
    #[must_use]
    pub fn receipts(&self) -> Vec<Receipt> {
        receipts::sorted_by_date_desc(receipts::compute_receipts(self.purchases.items()))
    }

    /// Receipts bucketed per calendar day, newest day first.
    #[must_use]
    pub fn receipts_by_day(&self) -> Vec<DayGroup> {
        receipts::group_by_day(&self.receipts())
    }

    /// Commit the staged purchases as a new receipt.
    ///
    /// Assigns a fresh receipt id and writes sequentially; see
    /// [`checkout::commit_receipt`] for the partial-failure contract.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any write when the staged
    /// receipt is invalid.
    pub async fn commit_staged(
        &mut self,
        store: String,
        date: DateTime<Utc>,
    ) -> Result<CommitOutcome> {
        let header = ReceiptHeader {
            receipt_id: self.receipt_ids.next(),
            store,
            date,
        };
        let api = self.api.clone();
        let outcome =
            checkout::commit_receipt(&api, &mut self.staging, &mut self.purchases, &header)
                .await?;
        Ok(outcome)
    }

    /// Copy a receipt's purchases into the staging cache for editing.
    ///
    /// The committed originals stay in place; the caller deletes them
    /// with [`Self::delete_receipt`] once the edited receipt commits.
    #[must_use]
    pub fn stage_receipt_for_edit(&mut self, receipt_id: ReceiptId) -> Vec<Purchase> {
        let originals = self.purchases.purchases_for_receipt(receipt_id);
        self.staging.stage_purchases(&originals);
        originals
    }

    /// Delete every purchase of a receipt on the service.
    ///
    /// # Errors
    ///
    /// Propagates the first failure; already deleted purchases stay
    /// removed.
    pub async fn delete_receipt(&mut self, receipt_id: ReceiptId) -> Result<()> {
        let api = self.api.clone();
        self.purchases.delete_receipt(&api, receipt_id).await?;
        Ok(())
    }

    /// Send (or reciprocate) an invite.
    ///
    /// When the service reports a mutual invite it has already merged
    /// both users into a group, so membership and invites are reloaded
    /// before returning.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; server rejections (self-invite,
    /// duplicate) carry the server's message.
    pub async fn send_invite(&mut self, login: &str) -> Result<SendInviteOutcome> {
        let api = self.api.clone();
        let outcome = api.send_invite(login).await?;
        if outcome.mutual_invite {
            tracing::info!(login = %login, "Mutual invite resolved; reloading membership");
            self.group.load(&api).await?;
            self.invites.load(&api).await?;
        }
        Ok(outcome)
    }

    /// Leave the current group and reload purchases, which shrink back
    /// to the user's own.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; membership is untouched on failure.
    pub async fn leave_group(&mut self) -> Result<()> {
        let api = self.api.clone();
        self.group.leave(&api).await?;
        self.purchases.load(&api).await?;
        Ok(())
    }

    /// Log out: drop all local state. The service is not called; the
    /// auth collaborator owns token revocation. This is also the
    /// required response to [`crate::AppError::is_session_expired`].
    pub fn logout(&mut self) {
        self.reset();
    }

    /// Drop all local state. The service is not called.
    pub fn reset(&mut self) {
        self.purchases.clear();
        self.products.clear();
        self.group.clear();
        self.invites.clear();
        self.staging.clear();
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("purchases", &self.purchases.items().len())
            .field("products", &self.products.items().len())
            .field("group_members", &self.group.members().len())
            .field("invites", &self.invites.items().len())
            .field("staged", &self.staging.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let config = ClientConfig::for_url("http://localhost:8080").expect("valid url");
        let state = AppState::new(config).expect("state");

        assert!(state.purchases.items().is_empty());
        assert!(state.receipts().is_empty());
        assert!(state.staging.is_empty());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::for_url("http://localhost:8080")
            .expect("valid url")
            .with_token(secrecy::SecretString::from("tok"));
        let state = AppState::new(config).expect("state");

        let debug_output = format!("{state:?}");
        assert!(!debug_output.contains("tok\""));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
