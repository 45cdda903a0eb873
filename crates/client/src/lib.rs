//! BuyLog client core.
//!
//! The pieces every BuyLog frontend builds on:
//!
//! - [`api`] - REST client for the BuyLog service
//! - [`stores`] - owned repositories for purchases, products, group
//!   membership, and invites
//! - [`receipts`] - pure derivation of receipts from purchases
//! - [`staging`] - session-local cache of not-yet-committed purchases
//! - [`checkout`] - validation and sequential commit of a staged receipt
//! - [`state`] - [`state::AppState`], the owned root object tying the
//!   above together
//!
//! # Architecture
//!
//! The service is the source of truth for committed data; local
//! collections are replaced on load, never merged, and mutated only
//! after the service confirms a write. Everything derived (receipts,
//! shop/brand/tag lists, member colors) is recomputed from the current
//! collections by pure functions.
//!
//! # Example
//!
//! ```rust,ignore
//! use buylog_client::config::ClientConfig;
//! use buylog_client::state::AppState;
//!
//! let config = ClientConfig::from_env()?;
//! let mut app = AppState::new(config)?;
//! app.load_all().await?;
//!
//! for receipt in app.receipts() {
//!     println!("{} {} {}", receipt.date, receipt.store, receipt.total_cents);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod error;
pub mod receipts;
pub mod staging;
pub mod state;
pub mod stores;

pub use error::{AppError, Result};
