//! Core types for the heist engine.
//!
//! Provides the static catalogs (locations, roles, equipment), the heist
//! `Session` with its phase state machine and mutators, the per-group
//! `SessionRegistry`, player standing and start cooldowns, and the engine
//! configuration.

pub mod catalog;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod ids;
pub mod registry;
pub mod session;
pub mod standing;

pub use catalog::{Equipment, EquipmentEffect, EffectScope, EffectStat, Location, Role};
pub use config::{ConfigError, HeistConfig};
pub use cooldown::Cooldowns;
pub use error::{HeistError, HeistResult, LedgerError, LedgerResult};
pub use ids::{GroupId, UserId};
pub use registry::SessionRegistry;
pub use session::{MIN_CREW, Member, Phase, Session, TaskResult, TaskStatus};
pub use standing::Standing;
