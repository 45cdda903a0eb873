//! Invite repository and relation-state derivation.
//!
//! Invites are directional; a group forms (or grows) when two users
//! hold reciprocal outstanding invites. Detecting and collapsing that
//! reciprocity is the service's job - the client treats "send invite"
//! as idempotent and interprets a `mutual_invite` acknowledgement as
//! "membership changed, reload".

use buylog_core::{GroupMember, Invite, UserId};

use crate::api::{ApiError, InviteApi, SendInviteOutcome};

use super::{LoadSequence, LoadToken};

/// Relation between the current user and another user, derived purely
/// from the invite and membership collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationState {
    /// No outstanding invite in either direction, not grouped.
    NoRelation,
    /// An invite exists in one direction; the reciprocal send would
    /// collapse the pair into a group.
    OneSidedInvitePending,
    /// Both users are members of the same group.
    Grouped,
}

/// Derive the relation between two users.
#[must_use]
pub fn relation_between(
    me: UserId,
    other: UserId,
    invites: &[Invite],
    members: &[GroupMember],
) -> RelationState {
    let in_group = |user: UserId| members.iter().any(|m| m.user_id == user);
    if in_group(me) && in_group(other) {
        return RelationState::Grouped;
    }

    let pending = invites.iter().any(|i| {
        (i.from_user_id == me && i.to_user_id == other)
            || (i.from_user_id == other && i.to_user_id == me)
    });
    if pending {
        RelationState::OneSidedInvitePending
    } else {
        RelationState::NoRelation
    }
}

/// Repository of invites involving the current user.
#[derive(Debug, Default)]
pub struct InviteStore {
    items: Vec<Invite>,
    loads: LoadSequence,
}

impl InviteStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            loads: LoadSequence::new(),
        }
    }

    /// The current invite collection.
    #[must_use]
    pub fn items(&self) -> &[Invite] {
        &self.items
    }

    /// Replace the collection with a fresh fetch.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; the local collection is untouched on
    /// failure.
    pub async fn load(&mut self, api: &impl InviteApi) -> Result<(), ApiError> {
        let token = self.loads.begin();
        let invites = api.fetch_invites().await?;
        self.apply_loaded(token, invites);
        Ok(())
    }

    /// Issue a load token without performing I/O.
    pub fn begin_load(&mut self) -> LoadToken {
        self.loads.begin()
    }

    /// Apply a fetched payload; stale tokens are discarded.
    pub fn apply_loaded(&mut self, token: LoadToken, invites: Vec<Invite>) -> bool {
        if !self.loads.is_current(token) {
            tracing::debug!("Discarding stale invite load response");
            return false;
        }
        self.items = invites;
        true
    }

    /// Send an invite to a login.
    ///
    /// Nothing is mutated locally: when the outcome reports
    /// `mutual_invite`, the caller reloads membership and invites so
    /// server-assigned member numbers are never guessed. Rejections
    /// (self-invite, duplicate) come back as `ApiError::Api` with the
    /// server's own message, surfaced unaltered.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn send(
        &self,
        api: &impl InviteApi,
        login: &str,
    ) -> Result<SendInviteOutcome, ApiError> {
        api.send_invite(login).await
    }

    /// Accept an invite by sending the reciprocal one.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`.
    pub async fn accept(
        &self,
        api: &impl InviteApi,
        from_login: &str,
    ) -> Result<SendInviteOutcome, ApiError> {
        self.send(api, from_login).await
    }

    /// Drop the local collection (logout path).
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buylog_core::{InviteId, MemberNumber};

    fn invite(id: i64, from: i64, to: i64) -> Invite {
        Invite {
            id: InviteId::new(id),
            from_user_id: UserId::new(from),
            to_user_id: UserId::new(to),
            from_login: format!("user{from}"),
            to_login: format!("user{to}"),
            created_at: "2025-07-10T12:00:00Z".parse().expect("valid timestamp"),
        }
    }

    fn member(user_id: i64, number: i64) -> GroupMember {
        GroupMember {
            user_id: UserId::new(user_id),
            login: format!("user{user_id}"),
            member_number: MemberNumber::new(number),
        }
    }

    #[test]
    fn test_relation_progression() {
        let me = UserId::new(1);
        let other = UserId::new(2);

        assert_eq!(
            relation_between(me, other, &[], &[]),
            RelationState::NoRelation
        );
        assert_eq!(
            relation_between(me, other, &[invite(1, 1, 2)], &[]),
            RelationState::OneSidedInvitePending
        );
        // Reciprocal invite direction also counts as pending
        assert_eq!(
            relation_between(me, other, &[invite(1, 2, 1)], &[]),
            RelationState::OneSidedInvitePending
        );
        assert_eq!(
            relation_between(me, other, &[], &[member(1, 1), member(2, 2)]),
            RelationState::Grouped
        );
    }

    #[test]
    fn test_unrelated_invites_do_not_count() {
        let me = UserId::new(1);
        let other = UserId::new(2);
        assert_eq!(
            relation_between(me, other, &[invite(1, 1, 3)], &[]),
            RelationState::NoRelation
        );
    }

    #[test]
    fn test_load_replaces_collection() {
        let mut store = InviteStore::new();
        let token = store.begin_load();
        store.apply_loaded(token, vec![invite(1, 1, 2), invite(2, 3, 1)]);

        let token = store.begin_load();
        store.apply_loaded(token, vec![invite(3, 1, 4)]);

        let ids: Vec<i64> = store.items().iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![3]);
    }
}
