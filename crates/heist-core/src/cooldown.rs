//! Per-player cooldown between heist starts.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::error::{HeistError, HeistResult};
use crate::ids::UserId;
use crate::standing::minutes_until;

/// Remembers when each player last started a heist.
#[derive(Debug, Clone)]
pub struct Cooldowns {
    period: Duration,
    last_start: HashMap<UserId, DateTime<Utc>>,
}

impl Cooldowns {
    /// Cooldowns lasting `minutes` after each start.
    pub fn new(minutes: u32) -> Self {
        Self {
            period: Duration::minutes(i64::from(minutes)),
            last_start: HashMap::new(),
        }
    }

    /// Fail with `OnCooldown` if the player started a heist too recently.
    pub fn check(&self, user: &UserId, now: DateTime<Utc>) -> HeistResult<()> {
        match self.last_start.get(user) {
            Some(last) if now - *last < self.period => Err(HeistError::OnCooldown {
                minutes_left: minutes_until(now, *last + self.period),
            }),
            _ => Ok(()),
        }
    }

    /// Record a start at `now`, dropping entries whose cooldown has lapsed.
    pub fn arm(&mut self, user: &UserId, now: DateTime<Utc>) {
        let period = self.period;
        self.last_start.retain(|_, t| now - *t < period);
        self.last_start.insert(user.clone(), now);
    }
}
