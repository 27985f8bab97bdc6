//! Outcome tiers and the threshold table that picks one from a single roll.

use serde::{Deserialize, Serialize};

use crate::odds::Odds;

/// Share of the success chance that resolves as a clean success.
pub const CLEAN_FRACTION: f64 = 0.6;
/// Share of the success chance below which the job is at least a messy success.
pub const MESSY_FRACTION: f64 = 0.9;

/// One of four mutually exclusive resolutions, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    /// Everyone gets paid.
    CleanSuccess,
    /// One member is caught; the rest share a reduced cut.
    MessySuccess,
    /// No payout; one member ends up in hospital.
    Ambush,
    /// No payout; the whole crew is jailed.
    TotalBust,
}

impl OutcomeTier {
    /// All tiers, best first.
    pub fn all() -> &'static [Self] {
        &[
            Self::CleanSuccess,
            Self::MessySuccess,
            Self::Ambush,
            Self::TotalBust,
        ]
    }

    /// Whether the crew gets paid.
    pub fn is_success(self) -> bool {
        matches!(self, Self::CleanSuccess | Self::MessySuccess)
    }
}

impl std::fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CleanSuccess => write!(f, "Clean Getaway"),
            Self::MessySuccess => write!(f, "Messy Escape"),
            Self::Ambush => write!(f, "Ambushed"),
            Self::TotalBust => write!(f, "Total Bust"),
        }
    }
}

/// Upper bounds (exclusive) of the first three tiers, in order.
///
/// A roll at or above the last bound is a total bust.
pub fn tier_thresholds(odds: &Odds) -> [(f64, OutcomeTier); 3] {
    let sc = odds.success_chance;
    [
        (sc * CLEAN_FRACTION, OutcomeTier::CleanSuccess),
        (sc * MESSY_FRACTION, OutcomeTier::MessySuccess),
        (sc + odds.death_risk, OutcomeTier::Ambush),
    ]
}

/// Pick the tier for a roll in `[0, 1)`.
pub fn select_tier(odds: &Odds, roll: f64) -> OutcomeTier {
    tier_thresholds(odds)
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map(|(_, tier)| *tier)
        .unwrap_or(OutcomeTier::TotalBust)
}
