//! What a launch hands back to the caller.

use serde::Serialize;
use uuid::Uuid;

use heist_core::{GroupId, Role, Session, TaskResult, UserId};
use heist_mechanics::{OutcomeTier, Resolution};

/// One member's part in a finished heist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewResult {
    /// The player.
    pub user: UserId,
    /// Their slot.
    pub role: Role,
    /// Their role task result.
    pub task: TaskResult,
    /// Keys of the gear they brought.
    pub equipment: Vec<String>,
}

/// A resolved heist.
#[derive(Debug, Clone, Serialize)]
pub struct HeistReport {
    /// Session instance that was resolved.
    pub session_id: Uuid,
    /// The group it ran in.
    pub group: GroupId,
    /// Location key.
    pub location: &'static str,
    /// Location display name.
    pub location_name: &'static str,
    /// Per-member task results, in join order.
    pub crew: Vec<CrewResult>,
    /// The resolution that was applied.
    pub resolution: Resolution,
    /// Ledger calls that failed while applying the resolution.
    pub failed_effects: usize,
}

impl HeistReport {
    /// Build a report from a taken session and its resolution.
    pub fn new(session: &Session, resolution: Resolution, failed_effects: usize) -> Self {
        let location = session.location();
        Self {
            session_id: session.id(),
            group: session.group().clone(),
            location: location.key,
            location_name: location.name,
            crew: session
                .members()
                .iter()
                .map(|m| CrewResult {
                    user: m.user.clone(),
                    role: m.role,
                    task: m.task,
                    equipment: m.equipment.iter().cloned().collect(),
                })
                .collect(),
            resolution,
            failed_effects,
        }
    }

    /// The outcome tier.
    pub fn tier(&self) -> OutcomeTier {
        self.resolution.tier
    }

    /// A short human-readable description of what happened.
    pub fn summary(&self) -> String {
        let r = &self.resolution;
        let mut lines = vec![format!("{}: {}", self.location_name, r.tier)];
        for p in &r.payouts {
            lines.push(format!("{} +{} coins, +{} xp", p.user, p.amount, p.xp));
        }
        for s in &r.jailed {
            lines.push(format!("{} jailed for {} min", s.user, s.minutes));
        }
        for s in &r.hospitalized {
            lines.push(format!("{} hospitalized for {} min", s.user, s.minutes));
        }
        if r.heat > 0 {
            lines.push(format!("+{} heat for the crew", r.heat));
        }
        lines.join("\n")
    }
}

/// Result of a launch.
#[derive(Debug, Clone)]
pub enum LaunchOutcome {
    /// Tasks ran, the heist was resolved and its effects applied.
    Resolved(Box<HeistReport>),
    /// The session was aborted while tasks ran; nothing was applied.
    Aborted,
}

impl LaunchOutcome {
    /// The report, if the heist was resolved.
    pub fn report(&self) -> Option<&HeistReport> {
        match self {
            LaunchOutcome::Resolved(report) => Some(report),
            LaunchOutcome::Aborted => None,
        }
    }
}
