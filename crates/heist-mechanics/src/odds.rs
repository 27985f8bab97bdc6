//! Success odds and side risks computed from a crew.
//!
//! Starting from the location's base success, the crew-size bonus is added,
//! then each member (in join order) contributes their role-scoped gear and
//! their role task result. The figures are clamped at the end.

use serde::Serialize;

use heist_core::{EffectStat, Location, Member, Role, TaskStatus};

/// Success bonus per member beyond the first.
pub const CREW_BONUS_PER_MEMBER: f64 = 0.06;
/// Upper bound of the crew bonus.
pub const CREW_BONUS_CAP: f64 = 0.25;

const BASE_PAYOUT_MULTIPLIER: f64 = 1.0;
const BASE_JAIL_RISK: f64 = 0.15;
const BASE_DEATH_RISK: f64 = 0.05;
const BASE_WARRANT_GAIN: f64 = 1.0;

const SUCCESS_RANGE: (f64, f64) = (0.05, 0.90);
const JAIL_RANGE: (f64, f64) = (0.0, 0.5);
const DEATH_RANGE: (f64, f64) = (0.0, 0.25);
const PAYOUT_RANGE: (f64, f64) = (0.5, 1.75);

/// The figures a resolution rolls against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Odds {
    /// Probability mass of the two success tiers, before tier fractions.
    pub success_chance: f64,
    /// Scales the base payout.
    pub payout_multiplier: f64,
    /// Reported risk of arrest. Not consumed by the tier table.
    pub jail_risk: f64,
    /// Extends the ambush band beyond the success chance.
    pub death_risk: f64,
    /// Heat gained by every member; rounded per tier.
    pub warrant_gain: f64,
}

impl Odds {
    fn base(location: &Location) -> Self {
        Self {
            success_chance: location.base_success,
            payout_multiplier: BASE_PAYOUT_MULTIPLIER,
            jail_risk: BASE_JAIL_RISK,
            death_risk: BASE_DEATH_RISK,
            warrant_gain: BASE_WARRANT_GAIN,
        }
    }

    fn clamped(self) -> Self {
        Self {
            success_chance: self.success_chance.clamp(SUCCESS_RANGE.0, SUCCESS_RANGE.1),
            payout_multiplier: self.payout_multiplier.clamp(PAYOUT_RANGE.0, PAYOUT_RANGE.1),
            jail_risk: self.jail_risk.clamp(JAIL_RANGE.0, JAIL_RANGE.1),
            death_risk: self.death_risk.clamp(DEATH_RANGE.0, DEATH_RANGE.1),
            warrant_gain: self.warrant_gain.max(0.0),
        }
    }

    fn apply_gear(&mut self, member: &Member) {
        for item in member.gear().filter(|e| e.effect.applies_to(member.role)) {
            let m = item.effect.magnitude;
            match item.effect.stat {
                EffectStat::SuccessChance => self.success_chance += m,
                EffectStat::DeathRisk => self.death_risk = (self.death_risk + m).max(0.0),
                EffectStat::WarrantGain => self.warrant_gain = (self.warrant_gain + m).max(0.0),
            }
        }
    }

    fn apply_task(&mut self, member: &Member) {
        let ok = member.task.status == TaskStatus::Success;
        match member.role {
            // A leader who never picked a posture changes nothing.
            Role::Leader if ok => {
                if member.task.score > 0 {
                    self.payout_multiplier += 0.15;
                    self.success_chance -= 0.05;
                    self.warrant_gain += 0.5;
                } else if member.task.score < 0 {
                    self.success_chance += 0.06;
                    self.payout_multiplier -= 0.05;
                }
            }
            Role::Leader => {}
            Role::Driver if ok => self.success_chance += 0.10,
            Role::Driver => self.success_chance -= 0.10,
            Role::Hacker if ok => {
                self.success_chance += 0.12;
                self.payout_multiplier += 0.10;
            }
            Role::Hacker => self.success_chance -= 0.12,
            Role::Muscle if ok => {
                self.success_chance += 0.05;
                self.jail_risk -= 0.05;
            }
            Role::Muscle => self.death_risk += 0.06,
            Role::Lookout if ok => {
                self.success_chance += 0.07;
                self.jail_risk -= 0.06;
            }
            Role::Lookout => self.jail_risk += 0.06,
        }
    }
}

/// Success bonus for a crew of `crew_size`.
pub fn crew_bonus(crew_size: usize) -> f64 {
    (crew_size.saturating_sub(1) as f64 * CREW_BONUS_PER_MEMBER).min(CREW_BONUS_CAP)
}

/// Compute clamped odds for a crew hitting `location`.
pub fn compute_odds(location: &Location, members: &[Member]) -> Odds {
    let mut odds = Odds::base(location);
    odds.success_chance += crew_bonus(members.len());
    for member in members {
        odds.apply_gear(member);
        odds.apply_task(member);
    }
    odds.clamped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use heist_core::{TaskResult, UserId};
    use proptest::prelude::*;

    fn bank() -> &'static Location {
        Location::find("bank").unwrap()
    }

    fn member(name: &str, role: Role, task: TaskResult) -> Member {
        Member::new(UserId::from(name), role).with_task(task)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn crew_bonus_grows_then_caps() {
        assert!(close(crew_bonus(1), 0.0));
        assert!(close(crew_bonus(3), 0.12));
        assert!(close(crew_bonus(5), 0.24));
        assert!(close(crew_bonus(10), 0.25));
    }

    #[test]
    fn aggressive_leader_driver_ok_hacker_failed() {
        let crew = [
            member("boss", Role::Leader, TaskResult::success(1)),
            member("wheels", Role::Driver, TaskResult::success(1)),
            member("keys", Role::Hacker, TaskResult::fail()),
        ];
        let odds = compute_odds(bank(), &crew);
        // 0.45 + 0.12 crew - 0.05 leader + 0.10 driver - 0.12 hacker
        assert!(close(odds.success_chance, 0.50), "{odds:?}");
        assert!(close(odds.payout_multiplier, 1.15));
        assert!(close(odds.warrant_gain, 1.5));
        assert!(close(odds.death_risk, 0.05));
        assert!(close(odds.jail_risk, 0.15));
    }

    #[test]
    fn cautious_leader_trades_payout_for_safety() {
        let crew = [member("boss", Role::Leader, TaskResult::success(-1))];
        let odds = compute_odds(bank(), &crew);
        assert!(close(odds.success_chance, 0.51));
        assert!(close(odds.payout_multiplier, 0.95));
    }

    #[test]
    fn leader_timeout_is_neutral() {
        let crew = [member("boss", Role::Leader, TaskResult::timeout())];
        let odds = compute_odds(bank(), &crew);
        assert!(close(odds.success_chance, 0.45));
        assert!(close(odds.payout_multiplier, 1.0));
    }

    #[test]
    fn binary_timeout_counts_as_failure() {
        let timed_out = [member("l", Role::Lookout, TaskResult::timeout())];
        let failed = [member("l", Role::Lookout, TaskResult::fail())];
        assert_eq!(compute_odds(bank(), &timed_out), compute_odds(bank(), &failed));
        assert!(close(compute_odds(bank(), &failed).jail_risk, 0.21));
    }

    #[test]
    fn role_scoped_gear_needs_matching_role() {
        let driver_car =
            [member("d", Role::Driver, TaskResult::success(1)).with_equipment("fastcar")];
        let hacker_car =
            [member("h", Role::Hacker, TaskResult::success(1)).with_equipment("fastcar")];
        let with = compute_odds(bank(), &driver_car).success_chance;
        let without = compute_odds(bank(), &[member("d", Role::Driver, TaskResult::success(1))])
            .success_chance;
        assert!(close(with - without, 0.10));
        // 0.45 + 0.12 hacker success; the car does nothing for a hacker
        assert!(close(compute_odds(bank(), &hacker_car).success_chance, 0.57));
    }

    #[test]
    fn masks_floor_warrant_gain_at_zero() {
        let crew = [
            member("a", Role::Driver, TaskResult::success(1)).with_equipment("mask"),
            member("b", Role::Hacker, TaskResult::success(1)).with_equipment("mask"),
            member("c", Role::Muscle, TaskResult::success(1)).with_equipment("mask"),
        ];
        assert!(close(compute_odds(bank(), &crew).warrant_gain, 0.0));
    }

    #[test]
    fn armor_absorbs_muscle_risk() {
        let bare = [member("m", Role::Muscle, TaskResult::fail())];
        let armored = [member("m", Role::Muscle, TaskResult::fail()).with_equipment("armor")];
        assert!(close(compute_odds(bank(), &bare).death_risk, 0.11));
        // floor at 0 from the armor, then +0.06 from the failed task
        assert!(close(compute_odds(bank(), &armored).death_risk, 0.06));
    }

    #[test]
    fn success_is_clamped() {
        let lab = Location::find("lab").unwrap();
        let crew = [
            member("a", Role::Leader, TaskResult::success(1)),
            member("b", Role::Driver, TaskResult::fail()),
            member("c", Role::Hacker, TaskResult::fail()),
        ];
        // 0.30 + 0.12 - 0.05 - 0.10 - 0.12 = 0.15, still above the floor
        assert!(close(compute_odds(lab, &crew).success_chance, 0.15));

        let loaded = [
            member("a", Role::Leader, TaskResult::success(-1)),
            member("b", Role::Driver, TaskResult::success(1)).with_equipment("fastcar"),
            member("c", Role::Hacker, TaskResult::success(1))
                .with_equipment("drill")
                .with_equipment("jammer"),
            member("d", Role::Muscle, TaskResult::success(1)),
            member("e", Role::Lookout, TaskResult::success(1)),
        ];
        assert!(close(compute_odds(bank(), &loaded).success_chance, 0.90));
    }

    fn arb_member() -> impl Strategy<Value = Member> {
        let roles = Role::all().to_vec();
        let keys: Vec<&'static str> =
            heist_core::catalog::EQUIPMENT.iter().map(|e| e.key).collect();
        (
            proptest::sample::select(roles),
            0u8..4,
            -1i32..=1,
            proptest::sample::subsequence(keys, 0..=6),
        )
            .prop_map(|(role, status, score, gear)| {
                let task = match status {
                    0 => TaskResult::pending(),
                    1 => TaskResult::success(score),
                    2 => TaskResult::fail(),
                    _ => TaskResult::timeout(),
                };
                let mut m = Member::new(UserId::from("p"), role).with_task(task);
                for key in gear {
                    m = m.with_equipment(key);
                }
                m
            })
    }

    proptest! {
        #[test]
        fn odds_always_within_bounds(
            loc in 0usize..heist_core::catalog::LOCATIONS.len(),
            crew in proptest::collection::vec(arb_member(), 1..8),
        ) {
            let odds = compute_odds(&heist_core::catalog::LOCATIONS[loc], &crew);
            prop_assert!((0.05..=0.90).contains(&odds.success_chance));
            prop_assert!((0.0..=0.5).contains(&odds.jail_risk));
            prop_assert!((0.0..=0.25).contains(&odds.death_risk));
            prop_assert!((0.5..=1.75).contains(&odds.payout_multiplier));
            prop_assert!(odds.warrant_gain >= 0.0);
        }
    }
}
