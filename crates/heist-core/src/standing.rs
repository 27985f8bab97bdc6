//! A player's jail and hospital release times, as reported by the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HeistError, HeistResult};

/// Whether a player is free to take part in a heist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    /// Release time of the current jail sentence.
    pub jailed_until: Option<DateTime<Utc>>,
    /// Discharge time of the current hospital stay.
    pub hospitalized_until: Option<DateTime<Utc>>,
}

impl Standing {
    /// A player with no restrictions.
    pub fn free() -> Self {
        Self::default()
    }

    /// Fail with `Jailed` or `Hospitalized` if either restriction is still
    /// running at `now`. Jail is reported first.
    pub fn check(&self, now: DateTime<Utc>) -> HeistResult<()> {
        if let Some(until) = self.jailed_until.filter(|t| *t > now) {
            return Err(HeistError::Jailed {
                minutes_left: minutes_until(now, until),
            });
        }
        if let Some(until) = self.hospitalized_until.filter(|t| *t > now) {
            return Err(HeistError::Hospitalized {
                minutes_left: minutes_until(now, until),
            });
        }
        Ok(())
    }
}

/// Whole minutes from `now` to `until`, rounded up.
pub(crate) fn minutes_until(now: DateTime<Utc>, until: DateTime<Utc>) -> i64 {
    let ms = (until - now).num_milliseconds().max(0);
    (ms + 59_999) / 60_000
}
