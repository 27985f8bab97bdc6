//! A single heist in progress and its mutators.
//!
//! `Session` methods are the only way to change a heist. Each one validates
//! its own preconditions (phase, membership, role, leadership) and leaves the
//! session untouched when it returns an error.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Equipment, Location, Role};
use crate::error::{HeistError, HeistResult};
use crate::ids::{GroupId, UserId};

/// Smallest crew that may launch.
pub const MIN_CREW: usize = 3;

/// Lifecycle stage of a session. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Created; only the leader is in.
    Lobby,
    /// At least one other member joined; gear may be bought.
    Prep,
    /// Launched; role tasks are running.
    Active,
    /// Taken for resolution; about to be dropped.
    Resolved,
}

impl Phase {
    /// Whether players may still join or buy gear.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Lobby | Self::Prep)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Prep => write!(f, "prep"),
            Self::Active => write!(f, "active"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

/// Terminal (or pending) state of a member's role task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not settled yet.
    Pending,
    /// Completed the challenge.
    Success,
    /// Botched the challenge.
    Fail,
    /// Did not answer in time.
    Timeout,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Fail => write!(f, "fail"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// Outcome of one role task.
///
/// `score` is -1..=1 for the leader's posture and 0/1 for every other role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    /// How the task ended.
    pub status: TaskStatus,
    /// Role-specific score.
    pub score: i32,
}

impl TaskResult {
    /// A task that has not settled.
    pub fn pending() -> Self {
        Self {
            status: TaskStatus::Pending,
            score: 0,
        }
    }

    /// A completed task with the given score.
    pub fn success(score: i32) -> Self {
        Self {
            status: TaskStatus::Success,
            score,
        }
    }

    /// A botched task.
    pub fn fail() -> Self {
        Self {
            status: TaskStatus::Fail,
            score: 0,
        }
    }

    /// A task that ran out of time.
    pub fn timeout() -> Self {
        Self {
            status: TaskStatus::Timeout,
            score: 0,
        }
    }

    /// Whether the task reached a terminal state.
    pub fn is_settled(&self) -> bool {
        self.status != TaskStatus::Pending
    }
}

/// A participant in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// The player.
    pub user: UserId,
    /// The slot they hold.
    pub role: Role,
    /// Keys of owned equipment.
    pub equipment: BTreeSet<String>,
    /// Their role task result.
    pub task: TaskResult,
}

impl Member {
    /// A fresh member with no gear and a pending task.
    pub fn new(user: UserId, role: Role) -> Self {
        Self {
            user,
            role,
            equipment: BTreeSet::new(),
            task: TaskResult::pending(),
        }
    }

    /// Add an item key.
    pub fn with_equipment(mut self, key: &str) -> Self {
        self.equipment.insert(key.to_string());
        self
    }

    /// Set the task result.
    pub fn with_task(mut self, task: TaskResult) -> Self {
        self.task = task;
        self
    }

    /// Whether the member owns the item.
    pub fn owns(&self, key: &str) -> bool {
        self.equipment.contains(key)
    }

    /// Owned items resolved against the catalog. Unknown keys are skipped.
    pub fn gear(&self) -> impl Iterator<Item = &'static Equipment> + '_ {
        self.equipment.iter().filter_map(|k| Equipment::find(k))
    }
}

/// An in-progress heist scoped to one group.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    group: GroupId,
    leader: UserId,
    location: &'static Location,
    phase: Phase,
    members: Vec<Member>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session in the lobby with the leader as its only member.
    pub fn new(group: GroupId, leader: UserId, location: &'static Location) -> Self {
        Self {
            id: Uuid::new_v4(),
            group,
            members: vec![Member::new(leader.clone(), Role::Leader)],
            leader,
            location,
            phase: Phase::Lobby,
            created_at: Utc::now(),
        }
    }

    /// Unique id of this session instance.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The hosting group.
    pub fn group(&self) -> &GroupId {
        &self.group
    }

    /// The player who created the session.
    pub fn leader(&self) -> &UserId {
        &self.leader
    }

    /// Where the crew is hitting.
    pub fn location(&self) -> &'static Location {
        self.location
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Members in join order.
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Number of members.
    pub fn crew_size(&self) -> usize {
        self.members.len()
    }

    /// When the session was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Look up a member.
    pub fn member(&self, user: &UserId) -> Option<&Member> {
        self.members.iter().find(|m| &m.user == user)
    }

    /// Whether the player is in the crew.
    pub fn is_member(&self, user: &UserId) -> bool {
        self.member(user).is_some()
    }

    /// The member holding a role, if any.
    pub fn holder_of(&self, role: Role) -> Option<&Member> {
        self.members.iter().find(|m| m.role == role)
    }

    /// Add a player with the role named by `role_key`.
    ///
    /// The first successful join moves the session from lobby to prep.
    pub fn join(&mut self, user: UserId, role_key: &str) -> HeistResult<&Member> {
        if self.is_member(&user) {
            return Err(HeistError::AlreadyJoined);
        }
        if !self.phase.is_open() {
            return Err(HeistError::InvalidPhase(self.phase));
        }
        let role =
            Role::parse(role_key).ok_or_else(|| HeistError::InvalidRole(role_key.to_string()))?;
        if self.holder_of(role).is_some() {
            return Err(HeistError::RoleTaken(role));
        }

        self.members.push(Member::new(user, role));
        if self.phase == Phase::Lobby {
            self.phase = Phase::Prep;
        }
        Ok(&self.members[self.members.len() - 1])
    }

    /// Validate a purchase without changing anything.
    ///
    /// Callers charge the player between this check and [`Session::equip`].
    pub fn check_equip(&self, user: &UserId, key: &str) -> HeistResult<&'static Equipment> {
        let member = self.member(user).ok_or(HeistError::NotAMember)?;
        if !self.phase.is_open() {
            return Err(HeistError::InvalidPhase(self.phase));
        }
        let item =
            Equipment::find(key).ok_or_else(|| HeistError::InvalidEquipment(key.to_string()))?;
        if member.owns(item.key) {
            return Err(HeistError::AlreadyEquipped(item.name.to_string()));
        }
        Ok(item)
    }

    /// Give a member an item. Runs the same checks as [`Session::check_equip`].
    pub fn equip(&mut self, user: &UserId, key: &str) -> HeistResult<&'static Equipment> {
        let item = self.check_equip(user, key)?;
        if let Some(member) = self.members.iter_mut().find(|m| &m.user == user) {
            member.equipment.insert(item.key.to_string());
        }
        Ok(item)
    }

    /// Fail with `NotLeader` unless `requester` created the session.
    pub fn ensure_leader(&self, requester: &UserId) -> HeistResult<()> {
        if requester == &self.leader {
            Ok(())
        } else {
            Err(HeistError::NotLeader)
        }
    }

    /// Move to the active phase.
    pub fn launch(&mut self, requester: &UserId) -> HeistResult<()> {
        self.ensure_leader(requester)?;
        if !self.phase.is_open() {
            return Err(HeistError::InvalidPhase(self.phase));
        }
        if self.crew_size() < MIN_CREW {
            return Err(HeistError::InsufficientCrew {
                have: self.crew_size(),
                need: MIN_CREW,
            });
        }
        self.phase = Phase::Active;
        Ok(())
    }

    /// Store a member's task result. Returns false if the player is not in
    /// the crew.
    pub fn record_task_result(&mut self, user: &UserId, result: TaskResult) -> bool {
        match self.members.iter_mut().find(|m| &m.user == user) {
            Some(member) => {
                member.task = result;
                true
            }
            None => false,
        }
    }

    /// Whether every member's task has settled.
    pub fn all_tasks_settled(&self) -> bool {
        self.members.iter().all(|m| m.task.is_settled())
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.phase = Phase::Resolved;
    }

    /// One line per member: user, role and gear.
    pub fn crew_summary(&self) -> String {
        self.members
            .iter()
            .map(|m| {
                let gear: Vec<&str> = m.gear().map(|e| e.name).collect();
                let gear = if gear.is_empty() {
                    "none".to_string()
                } else {
                    gear.join(", ")
                };
                format!("- {} ({}) gear: {gear}", m.user, m.role)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
