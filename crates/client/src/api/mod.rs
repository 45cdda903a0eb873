//! BuyLog service API client.
//!
//! # Architecture
//!
//! - The service is the source of truth for committed data - no local
//!   sync, direct REST calls with JSON bodies
//! - Bearer token auth; a 401 response is surfaced as
//!   [`ApiError::SessionExpired`] and must never be retried
//! - Server error text is preserved unaltered so frontends can show it
//!
//! The store layer talks to the service through the narrow
//! [`PurchaseApi`]/[`ProductApi`]/[`GroupApi`]/[`InviteApi`] traits;
//! [`ApiClient`] implements all four against the real service, tests
//! substitute in-memory fakes.

mod client;

pub use client::ApiClient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use buylog_core::{
    GroupMember, Invite, Product, ProductId, Purchase, PurchaseId, ReceiptId, UserId,
};

/// Errors that can occur when talking to the BuyLog service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (transport level).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status. The message is the
    /// server-provided text, or a fixed fallback when the body was
    /// empty.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service rejected the token. Triggers logout, never retry.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// The configured token is not a valid header value.
    #[error("Invalid API token")]
    InvalidToken,
}

// =============================================================================
// Wire Types
// =============================================================================

/// Body of `POST /purchases`. The service assigns `id` and `user_id`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePurchaseRequest {
    pub product_id: ProductId,
    #[serde(rename = "price")]
    pub price_cents: i64,
    pub quantity: i64,
    pub tags: Vec<String>,
    pub store: String,
    pub date: DateTime<Utc>,
    pub receipt_id: ReceiptId,
}

/// Body of `POST /products`. The service assigns `id` and `user_id`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub volume: String,
    pub brand: String,
    pub default_tags: Vec<String>,
}

/// Response of `GET /group`.
///
/// A user outside any group gets an empty member list; the field
/// defaults keep old server versions without `current_user_id` working.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupResponse {
    #[serde(default)]
    pub members: Vec<GroupMember>,
    #[serde(default)]
    pub current_user_id: Option<UserId>,
}

/// Response of `POST /invite`.
///
/// `mutual_invite` is true when this invite was the reciprocal half of
/// an existing one and the service merged both users into a group. The
/// client must then reload membership and invites; member numbers are
/// server-assigned and never guessed locally.
#[derive(Debug, Clone, Deserialize)]
pub struct SendInviteOutcome {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub mutual_invite: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PurchasesEnvelope {
    #[serde(default)]
    pub purchases: Vec<Purchase>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope {
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InvitesEnvelope {
    #[serde(default)]
    pub invites: Vec<Invite>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeletePurchaseRequest {
    pub id: PurchaseId,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendInviteRequest<'a> {
    pub login: &'a str,
}

// =============================================================================
// Backend Traits
// =============================================================================

/// Purchase endpoints of the BuyLog service.
#[allow(async_fn_in_trait)]
pub trait PurchaseApi {
    /// Fetch all purchases visible to the current user (own plus group).
    async fn fetch_purchases(&self) -> Result<Vec<Purchase>, ApiError>;

    /// Create one purchase; the service assigns the durable id.
    async fn create_purchase(&self, req: &CreatePurchaseRequest) -> Result<Purchase, ApiError>;

    /// Delete one purchase by id.
    async fn delete_purchase(&self, id: PurchaseId) -> Result<(), ApiError>;
}

/// Product catalog endpoints.
#[allow(async_fn_in_trait)]
pub trait ProductApi {
    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError>;
    async fn create_product(&self, req: &NewProduct) -> Result<Product, ApiError>;
    async fn update_product(&self, product: &Product) -> Result<Product, ApiError>;
}

/// Group membership endpoints.
#[allow(async_fn_in_trait)]
pub trait GroupApi {
    async fn fetch_group_members(&self) -> Result<GroupResponse, ApiError>;
    async fn leave_group(&self) -> Result<(), ApiError>;
}

/// Invite endpoints. Accepting an invite is sending the reciprocal one.
#[allow(async_fn_in_trait)]
pub trait InviteApi {
    async fn fetch_invites(&self) -> Result<Vec<Invite>, ApiError>;
    async fn send_invite(&self, login: &str) -> Result<SendInviteOutcome, ApiError>;
}
