//! Role challenges.
//!
//! Each role gets one prompt with a fixed set of options. The selection is
//! judged into a `TaskResult`; some options are gambles and consult the RNG.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use heist_core::{Role, TaskResult};

/// Chance that the muscle wins a fight with the guards.
pub const FIGHT_WIN_CHANCE: f64 = 0.6;

/// Chance that the lookout's gamble on holding pays off.
pub const HOLD_PAYOFF_CHANCE: f64 = 0.5;

/// The only hacker sequence that bypasses the alarm.
pub const BYPASS_SEQUENCE: &str = "a-b-c";

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    /// Value returned by the presenter when chosen.
    pub key: &'static str,
    /// Text shown to the player.
    pub label: &'static str,
}

/// What a member is asked during the active phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    /// The role being prompted.
    pub role: Role,
    /// Short heading.
    pub title: &'static str,
    /// Instructions.
    pub body: &'static str,
    /// Selectable answers.
    pub options: Vec<ChoiceOption>,
}

impl Prompt {
    /// Whether `key` is one of the offered options.
    pub fn offers(&self, key: &str) -> bool {
        self.options.iter().any(|o| o.key == key)
    }
}

const fn opt(key: &'static str, label: &'static str) -> ChoiceOption {
    ChoiceOption { key, label }
}

/// Build the prompt for a role.
pub fn prompt_for(role: Role) -> Prompt {
    let (title, body, options) = match role {
        Role::Leader => (
            "Leader Decision",
            "Choose your approach: cautious (safer, lower payout), neutral, \
             or aggressive (riskier, higher payout).",
            vec![
                opt("cautious", "Cautious"),
                opt("neutral", "Neutral"),
                opt("aggressive", "Aggressive"),
            ],
        ),
        Role::Driver => (
            "Getaway Window",
            "The light is green. Hit ACCELERATE!",
            vec![opt("accelerate", "ACCELERATE")],
        ),
        Role::Hacker => (
            "Bypass Sequence",
            "Input the sequence A, B, C to avoid the alarms.",
            vec![
                opt("a-b-c", "A B C"),
                opt("a-c-b", "A C B"),
                opt("b-a-c", "B A C"),
                opt("b-c-a", "B C A"),
                opt("c-a-b", "C A B"),
                opt("c-b-a", "C B A"),
            ],
        ),
        Role::Muscle => (
            "Guard Encounter",
            "How do you handle the guards?",
            vec![opt("intimidate", "Intimidate"), opt("fight", "Fight")],
        ),
        Role::Lookout => (
            "Patrol Timing",
            "Call it: warn early (safer) or hold (riskier)?",
            vec![opt("warn", "Warn Early"), opt("hold", "Hold")],
        ),
    };
    Prompt {
        role,
        title,
        body,
        options,
    }
}

/// Judge a definitive answer. Unrecognised answers count as a failure.
pub fn judge(role: Role, selection: &str, rng: &mut StdRng) -> TaskResult {
    let selection = selection.trim().to_lowercase();
    match (role, selection.as_str()) {
        (Role::Leader, "cautious") => TaskResult::success(-1),
        (Role::Leader, "neutral") => TaskResult::success(0),
        (Role::Leader, "aggressive") => TaskResult::success(1),
        (Role::Driver, "accelerate") => TaskResult::success(1),
        (Role::Hacker, s) if s == BYPASS_SEQUENCE => TaskResult::success(1),
        (Role::Muscle, "intimidate") => TaskResult::success(1),
        (Role::Muscle, "fight") => gamble(FIGHT_WIN_CHANCE, rng),
        (Role::Lookout, "warn") => TaskResult::success(1),
        (Role::Lookout, "hold") => gamble(HOLD_PAYOFF_CHANCE, rng),
        _ => TaskResult::fail(),
    }
}

fn gamble(chance: f64, rng: &mut StdRng) -> TaskResult {
    if rng.random_bool(chance) {
        TaskResult::success(1)
    } else {
        TaskResult::fail()
    }
}

/// How long a role waits before its prompt goes out.
///
/// Only the driver waits: the green light comes on after a random delay in
/// `green_light_ms`, capped at half the task window so there is always time
/// left to react.
pub fn arming_delay(
    role: Role,
    green_light_ms: (u64, u64),
    window: Duration,
    rng: &mut StdRng,
) -> Option<Duration> {
    if role != Role::Driver {
        return None;
    }
    let (lo, hi) = green_light_ms;
    let delay = Duration::from_millis(rng.random_range(lo.min(hi)..=hi.max(lo)));
    Some(delay.min(window / 2))
}
