//! Heist mechanics: role challenges, odds, outcome tiers, and resolution.
//!
//! Everything here is synchronous and driven by an explicit RNG, so every
//! roll can be reproduced from a seed.

pub mod challenge;
pub mod odds;
pub mod resolution;
pub mod tier;

pub use challenge::{ChoiceOption, Prompt, arming_delay, judge, prompt_for};
pub use odds::{Odds, compute_odds, crew_bonus};
pub use resolution::{AMBUSH_REASON, Payout, Resolution, Sentence, resolve, resolve_with_roll};
pub use tier::{OutcomeTier, select_tier, tier_thresholds};
