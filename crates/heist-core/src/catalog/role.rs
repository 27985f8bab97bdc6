//! Crew roles. Each role may be held by at most one member of a session.

use serde::{Deserialize, Serialize};

/// A functional slot in the crew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Picks the crew's risk posture. Always held by the session creator.
    Leader,
    /// Handles the getaway.
    Driver,
    /// Bypasses the alarms.
    Hacker,
    /// Deals with the guards.
    Muscle,
    /// Watches the patrols.
    Lookout,
}

impl Role {
    /// All roles in catalog order.
    pub fn all() -> &'static [Self] {
        &[
            Self::Leader,
            Self::Driver,
            Self::Hacker,
            Self::Muscle,
            Self::Lookout,
        ]
    }

    /// Parse a role from its key, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "leader" => Some(Self::Leader),
            "driver" => Some(Self::Driver),
            "hacker" => Some(Self::Hacker),
            "muscle" => Some(Self::Muscle),
            "lookout" => Some(Self::Lookout),
            _ => None,
        }
    }

    /// The lowercase key used in commands.
    pub fn key(self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Driver => "driver",
            Self::Hacker => "hacker",
            Self::Muscle => "muscle",
            Self::Lookout => "lookout",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leader => write!(f, "Leader"),
            Self::Driver => write!(f, "Driver"),
            Self::Hacker => write!(f, "Hacker"),
            Self::Muscle => write!(f, "Muscle"),
            Self::Lookout => write!(f, "Lookout"),
        }
    }
}
