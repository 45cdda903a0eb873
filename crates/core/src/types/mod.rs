//! Domain types for the BuyLog client core.

mod id;
mod member;
mod product;
mod purchase;
mod receipt;

pub use id::{InviteId, ProductId, PurchaseId, ReceiptId, UserId};
pub use member::{GroupMember, Invite, MemberColor, MemberNumber};
pub use product::Product;
pub use purchase::{Purchase, StagedId, StagedPurchase};
pub use receipt::Receipt;
