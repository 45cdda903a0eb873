//! Group membership and invite types.
//!
//! Groups are formed through reciprocal invites: when two users have
//! sent each other an invite, the service merges them into one group
//! and assigns each member a small `member_number`. The member number
//! is only used client-side to derive a stable display color.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{InviteId, UserId};

/// Server-assigned position of a user within a group (1-based).
///
/// Only the values 1..=5 carry a dedicated color; anything else maps
/// to the neutral default so the color derivation is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberNumber(i64);

impl MemberNumber {
    /// Create a member number.
    #[must_use]
    pub const fn new(n: i64) -> Self {
        Self(n)
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Display color for this member number.
    ///
    /// Pure and total: every integer maps to a color, out-of-range
    /// numbers fall back to [`MemberColor::Neutral`]. The mapping is
    /// fixed so a member renders the same color for a whole session.
    #[must_use]
    pub const fn color(&self) -> MemberColor {
        match self.0 {
            1 => MemberColor::Green,
            2 => MemberColor::Red,
            3 => MemberColor::Gold,
            4 => MemberColor::Blue,
            5 => MemberColor::Purple,
            _ => MemberColor::Neutral,
        }
    }
}

impl From<i64> for MemberNumber {
    fn from(n: i64) -> Self {
        Self(n)
    }
}

impl std::fmt::Display for MemberNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed palette for member attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberColor {
    Green,
    Red,
    Gold,
    Blue,
    Purple,
    /// Default for member numbers outside 1..=5.
    Neutral,
}

impl MemberColor {
    /// Color name as used by tag-style UI components.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Red => "red",
            Self::Gold => "gold",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Neutral => "default",
        }
    }

    /// Hex value for CSS usage (attribution bars).
    #[must_use]
    pub const fn hex(&self) -> &'static str {
        match self {
            Self::Green => "#52c41a",
            Self::Red => "#ff4d4f",
            Self::Gold => "#faad14",
            Self::Blue => "#1677ff",
            Self::Purple => "#722ed1",
            Self::Neutral => "#d9d9d9",
        }
    }
}

/// A member of the current user's sharing group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: UserId,
    pub login: String,
    pub member_number: MemberNumber,
}

/// A directional invite from one user to another.
///
/// Invites are consumed server-side: when the reciprocal invite is
/// sent, both are collapsed into group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    pub id: InviteId,
    pub from_user_id: UserId,
    pub to_user_id: UserId,
    pub from_login: String,
    pub to_login: String,
    pub created_at: DateTime<Utc>,
}
