//! Heist locations with payout range and base odds.

use serde::Serialize;

/// A place the crew can hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    /// Lookup key used in commands.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Smallest possible base payout.
    pub min_payout: i64,
    /// Largest possible base payout (inclusive).
    pub max_payout: i64,
    /// Success probability before crew, gear and task modifiers.
    pub base_success: f64,
}

/// All locations, in catalog order.
pub static LOCATIONS: [Location; 6] = [
    Location {
        key: "bank",
        name: "Bank",
        min_payout: 1800,
        max_payout: 4200,
        base_success: 0.45,
    },
    Location {
        key: "casino",
        name: "Casino",
        min_payout: 2600,
        max_payout: 6500,
        base_success: 0.35,
    },
    Location {
        key: "museum",
        name: "Museum",
        min_payout: 2000,
        max_payout: 5000,
        base_success: 0.40,
    },
    Location {
        key: "truck",
        name: "Armored Truck",
        min_payout: 1200,
        max_payout: 3000,
        base_success: 0.50,
    },
    Location {
        key: "jewelry",
        name: "Jewelry Store",
        min_payout: 1600,
        max_payout: 3800,
        base_success: 0.46,
    },
    Location {
        key: "lab",
        name: "Underground Lab",
        min_payout: 3000,
        max_payout: 7800,
        base_success: 0.30,
    },
];

impl Location {
    /// Look up a location by key (case-insensitive).
    pub fn find(key: &str) -> Option<&'static Location> {
        let key = key.trim();
        LOCATIONS.iter().find(|l| l.key.eq_ignore_ascii_case(key))
    }
}
