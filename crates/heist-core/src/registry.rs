//! The per-group session registry.
//!
//! The registry is an explicit object handed to whoever drives the heists.
//! It owns every live session and enforces one session per group.

use std::collections::HashMap;

use uuid::Uuid;

use crate::catalog::Location;
use crate::error::{HeistError, HeistResult};
use crate::ids::{GroupId, UserId};
use crate::session::Session;

/// Owns at most one live session per group.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<GroupId, Session>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a heist for a group with `leader` at the given location.
    pub fn create(
        &mut self,
        group: GroupId,
        leader: UserId,
        location_key: &str,
    ) -> HeistResult<&Session> {
        if self.sessions.contains_key(&group) {
            return Err(HeistError::SessionAlreadyActive);
        }
        let location = Location::find(location_key)
            .ok_or_else(|| HeistError::UnknownLocation(location_key.to_string()))?;

        let session = Session::new(group.clone(), leader, location);
        Ok(self.sessions.entry(group).or_insert(session))
    }

    /// The group's session, if any.
    pub fn get(&self, group: &GroupId) -> Option<&Session> {
        self.sessions.get(group)
    }

    /// Mutable access to the group's session, if any.
    pub fn get_mut(&mut self, group: &GroupId) -> Option<&mut Session> {
        self.sessions.get_mut(group)
    }

    /// The group's session or `NoActiveSession`.
    pub fn require(&self, group: &GroupId) -> HeistResult<&Session> {
        self.get(group).ok_or(HeistError::NoActiveSession)
    }

    /// Mutable variant of [`SessionRegistry::require`].
    pub fn require_mut(&mut self, group: &GroupId) -> HeistResult<&mut Session> {
        self.get_mut(group).ok_or(HeistError::NoActiveSession)
    }

    /// Drop the group's session. Does nothing if there is none.
    pub fn delete(&mut self, group: &GroupId) {
        self.sessions.remove(group);
    }

    /// Leader-only removal without resolution. Allowed in any live phase.
    pub fn abort(&mut self, group: &GroupId, requester: &UserId) -> HeistResult<Session> {
        self.require(group)?.ensure_leader(requester)?;
        self.sessions.remove(group).ok_or(HeistError::NoActiveSession)
    }

    /// Remove a session so it can be resolved.
    ///
    /// Returns `None` if the group has no session or its session is a
    /// different instance than `session_id` (aborted and replaced meanwhile).
    /// A session can therefore be taken for resolution only once.
    pub fn take_for_resolution(&mut self, group: &GroupId, session_id: Uuid) -> Option<Session> {
        if self.sessions.get(group)?.id() != session_id {
            return None;
        }
        let mut session = self.sessions.remove(group)?;
        session.mark_resolved();
        Some(session)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no group has a session.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
