//! Purchasable equipment and the modifiers it applies during resolution.
//!
//! Each item carries its own price. An effect is scoped either to every
//! holder or only to a holder in a specific role, e.g. the getaway car only
//! helps when the driver owns it.

use serde::Serialize;

use super::role::Role;

/// Who benefits from an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectScope {
    /// Applies whatever the holder's role.
    Global,
    /// Applies only while the holder has this role.
    Role(Role),
}

/// Which resolution figure an item shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectStat {
    /// Chance the job succeeds.
    SuccessChance,
    /// Chance the crew runs into an ambush.
    DeathRisk,
    /// Heat gained by every member afterwards.
    WarrantGain,
}

/// A typed modifier: scope, target stat, and signed magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquipmentEffect {
    /// Who benefits.
    pub scope: EffectScope,
    /// What is shifted.
    pub stat: EffectStat,
    /// Signed change applied to the stat.
    pub magnitude: f64,
}

impl EquipmentEffect {
    /// Whether the effect applies to a holder with the given role.
    pub fn applies_to(&self, role: Role) -> bool {
        match self.scope {
            EffectScope::Global => true,
            EffectScope::Role(r) => r == role,
        }
    }
}

impl std::fmt::Display for EquipmentEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pct = (self.magnitude * 100.0).round() as i64;
        match self.stat {
            EffectStat::SuccessChance => write!(f, "{pct:+}% success")?,
            EffectStat::DeathRisk => write!(f, "{pct:+}% death risk")?,
            EffectStat::WarrantGain => write!(f, "{:+} heat", self.magnitude)?,
        }
        if let EffectScope::Role(role) = self.scope {
            write!(f, " ({})", role.key())?;
        }
        Ok(())
    }
}

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equipment {
    /// Lookup key used in commands.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Price in coins.
    pub cost: i64,
    /// Modifier applied at resolution.
    pub effect: EquipmentEffect,
}

/// All equipment, in catalog order.
pub static EQUIPMENT: [Equipment; 6] = [
    Equipment {
        key: "mask",
        name: "Mask",
        cost: 200,
        effect: EquipmentEffect {
            scope: EffectScope::Global,
            stat: EffectStat::WarrantGain,
            magnitude: -0.4,
        },
    },
    Equipment {
        key: "drill",
        name: "Thermal Drill",
        cost: 400,
        effect: EquipmentEffect {
            scope: EffectScope::Role(Role::Hacker),
            stat: EffectStat::SuccessChance,
            magnitude: 0.08,
        },
    },
    Equipment {
        key: "jammer",
        name: "Signal Jammer",
        cost: 350,
        effect: EquipmentEffect {
            scope: EffectScope::Role(Role::Hacker),
            stat: EffectStat::SuccessChance,
            magnitude: 0.05,
        },
    },
    Equipment {
        key: "armor",
        name: "Kevlar Armor",
        cost: 300,
        effect: EquipmentEffect {
            scope: EffectScope::Role(Role::Muscle),
            stat: EffectStat::DeathRisk,
            magnitude: -0.08,
        },
    },
    Equipment {
        key: "fastcar",
        name: "Tuned Getaway Car",
        cost: 500,
        effect: EquipmentEffect {
            scope: EffectScope::Role(Role::Driver),
            stat: EffectStat::SuccessChance,
            magnitude: 0.10,
        },
    },
    Equipment {
        key: "blueprints",
        name: "Blueprints",
        cost: 450,
        effect: EquipmentEffect {
            scope: EffectScope::Global,
            stat: EffectStat::SuccessChance,
            magnitude: 0.03,
        },
    },
];

impl Equipment {
    /// Look up an item by key (case-insensitive).
    pub fn find(key: &str) -> Option<&'static Equipment> {
        let key = key.trim();
        EQUIPMENT.iter().find(|e| e.key.eq_ignore_ascii_case(key))
    }
}
