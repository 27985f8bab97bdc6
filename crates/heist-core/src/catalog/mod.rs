//! Static catalogs: heist locations, crew roles, and purchasable equipment.

pub mod equipment;
pub mod location;
pub mod role;

pub use equipment::{EQUIPMENT, EffectScope, EffectStat, Equipment, EquipmentEffect};
pub use location::{LOCATIONS, Location};
pub use role::Role;
