//! BuyLog Core - Shared domain types.
//!
//! This crate provides the types shared by all BuyLog components:
//! - `client` - Client core (repositories, receipt aggregation, staging)
//! - embedding UIs built on top of the client core
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, domain entities, and the member color palette

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
