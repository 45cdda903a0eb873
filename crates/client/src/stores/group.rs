//! Group membership repository and attribution rules.
//!
//! Membership is read-only on the client: the service assigns member
//! numbers when a mutual invite resolves, and the client only reloads.
//! A failed membership fetch degrades to "not in a group" (empty
//! membership) - indistinguishable by design - except for session
//! expiry, which must surface so the auth layer can re-login.

use buylog_core::{GroupMember, MemberColor, MemberNumber, UserId};

use crate::api::{ApiError, GroupApi, GroupResponse};

use super::{LoadSequence, LoadToken};

/// Display info for a group member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub login: String,
    pub member_number: MemberNumber,
}

/// Repository of the current user's group membership.
#[derive(Debug, Default)]
pub struct GroupStore {
    members: Vec<GroupMember>,
    current_user_id: Option<UserId>,
    loads: LoadSequence,
}

impl GroupStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            members: Vec::new(),
            current_user_id: None,
            loads: LoadSequence::new(),
        }
    }

    /// Current group members (empty when solo or not yet loaded).
    #[must_use]
    pub fn members(&self) -> &[GroupMember] {
        &self.members
    }

    /// The service-reported id of the logged-in user.
    #[must_use]
    pub const fn current_user_id(&self) -> Option<UserId> {
        self.current_user_id
    }

    /// True iff the user shares the group with at least one other
    /// member. Attribution UI is suppressed entirely when false; a
    /// single-member badge conveys nothing.
    #[must_use]
    pub fn is_in_multi_user_group(&self) -> bool {
        self.members.len() > 1
    }

    /// Whether a purchase belongs to the logged-in user.
    #[must_use]
    pub fn is_current_user_purchase(&self, user_id: UserId) -> bool {
        self.current_user_id == Some(user_id)
    }

    /// Find a member by user id.
    #[must_use]
    pub fn member_by_user_id(&self, user_id: UserId) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Login and member number for display, or `None` when not in a
    /// multi-user group or the member is unknown.
    #[must_use]
    pub fn member_info(&self, user_id: UserId) -> Option<MemberInfo> {
        if !self.is_in_multi_user_group() {
            return None;
        }
        self.member_by_user_id(user_id).map(|m| MemberInfo {
            login: m.login.clone(),
            member_number: m.member_number,
        })
    }

    /// Attribution color for a purchase's owner, or `None` when no
    /// marker should be drawn: solo group, own purchase, or an owner
    /// the membership list does not know.
    #[must_use]
    pub fn attribution_color(&self, user_id: Option<UserId>) -> Option<MemberColor> {
        if !self.is_in_multi_user_group() {
            return None;
        }
        let user_id = user_id?;
        if self.is_current_user_purchase(user_id) {
            return None;
        }
        self.member_by_user_id(user_id)
            .map(|m| m.member_number.color())
    }

    /// Reload membership from the service.
    ///
    /// A transport or server failure resets membership to empty and
    /// returns `Ok` - "fetch failed" and "not in a group" are
    /// deliberately indistinguishable here. Session expiry is the
    /// exception and propagates.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::SessionExpired` when the token was rejected.
    pub async fn load(&mut self, api: &impl GroupApi) -> Result<(), ApiError> {
        let token = self.loads.begin();
        match api.fetch_group_members().await {
            Ok(response) => {
                self.apply_loaded(token, response);
                Ok(())
            }
            Err(ApiError::SessionExpired) => Err(ApiError::SessionExpired),
            Err(err) => {
                tracing::warn!(error = %err, "Group membership fetch failed; treating as not in a group");
                self.apply_loaded(token, GroupResponse::default());
                Ok(())
            }
        }
    }

    /// Issue a load token without performing I/O.
    pub fn begin_load(&mut self) -> LoadToken {
        self.loads.begin()
    }

    /// Apply a fetched membership payload; stale tokens are discarded.
    pub fn apply_loaded(&mut self, token: LoadToken, response: GroupResponse) -> bool {
        if !self.loads.is_current(token) {
            tracing::debug!("Discarding stale group load response");
            return false;
        }
        self.members = response.members;
        if response.current_user_id.is_some() {
            self.current_user_id = response.current_user_id;
        }
        true
    }

    /// Leave the group on the service, then clear membership locally.
    ///
    /// # Errors
    ///
    /// Propagates any `ApiError`; membership is untouched on failure.
    pub async fn leave(&mut self, api: &impl GroupApi) -> Result<(), ApiError> {
        api.leave_group().await?;
        self.members.clear();
        Ok(())
    }

    /// Drop all local state (logout path).
    pub fn clear(&mut self) {
        self.members.clear();
        self.current_user_id = None;
    }
}
