//! Resolution planning: roll the payout and the tier, then decide who gets
//! paid, jailed or hospitalized.
//!
//! The result is a plan. Applying it to player wallets is the caller's job.

use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use heist_core::{Location, Member, UserId};

use crate::odds::{Odds, compute_odds};
use crate::tier::{OutcomeTier, select_tier};

/// Share of the payout left for the crew after a messy escape.
pub const MESSY_PAYOUT_SHARE: f64 = 0.6;
/// Jail minutes for the member caught in a messy escape.
pub const MESSY_JAIL_MINUTES: (u32, u32) = (6, 12);
/// Hospital minutes for the ambush victim.
pub const AMBUSH_HOSPITAL_MINUTES: (u32, u32) = (12, 18);
/// Jail minutes for each member after a total bust.
pub const BUST_JAIL_MINUTES: (u32, u32) = (8, 15);
/// Hospital reason recorded for ambush victims.
pub const AMBUSH_REASON: &str = "Heist Ambush";

/// Coins and XP for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payout {
    /// Recipient.
    pub user: UserId,
    /// Coins credited.
    pub amount: i64,
    /// Experience awarded alongside.
    pub xp: i64,
}

/// A timed jail or hospital stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    /// Who serves it.
    pub user: UserId,
    /// Duration in minutes.
    pub minutes: u32,
}

/// Everything a resolution decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// The chosen tier.
    pub tier: OutcomeTier,
    /// Odds the roll was made against.
    pub odds: Odds,
    /// The uniform roll in `[0, 1)`.
    pub roll: f64,
    /// Base payout drawn from the location range.
    pub base_payout: i64,
    /// Base payout scaled by the payout multiplier.
    pub payout: i64,
    /// Coins per paid member.
    pub payouts: Vec<Payout>,
    /// Warrants added to every member.
    pub heat: u32,
    /// Everyone who gains heat.
    pub heat_targets: Vec<UserId>,
    /// Jail sentences.
    pub jailed: Vec<Sentence>,
    /// Hospital stays.
    pub hospitalized: Vec<Sentence>,
}

/// Resolve a crew's heist with a fresh roll.
pub fn resolve(location: &Location, members: &[Member], rng: &mut StdRng) -> Resolution {
    let base_payout = draw_base_payout(location, rng);
    let roll: f64 = rng.random();
    settle(location, members, base_payout, roll, rng)
}

/// Resolve with a fixed roll. The base payout and any victim are still drawn
/// from `rng`.
pub fn resolve_with_roll(
    location: &Location,
    members: &[Member],
    roll: f64,
    rng: &mut StdRng,
) -> Resolution {
    let base_payout = draw_base_payout(location, rng);
    settle(location, members, base_payout, roll, rng)
}

fn draw_base_payout(location: &Location, rng: &mut StdRng) -> i64 {
    let lo = location.min_payout.min(location.max_payout);
    let hi = location.max_payout.max(location.min_payout);
    rng.random_range(lo..=hi)
}

fn settle(
    location: &Location,
    members: &[Member],
    base_payout: i64,
    roll: f64,
    rng: &mut StdRng,
) -> Resolution {
    let odds = compute_odds(location, members);
    let payout = (base_payout as f64 * odds.payout_multiplier).floor() as i64;
    let tier = select_tier(&odds, roll);
    let everyone: Vec<UserId> = members.iter().map(|m| m.user.clone()).collect();
    let wg = odds.warrant_gain;

    let mut payouts = Vec::new();
    let mut jailed = Vec::new();
    let mut hospitalized = Vec::new();

    let heat = match tier {
        OutcomeTier::CleanSuccess => {
            payouts = split(&everyone, payout);
            heat_level(wg, 0)
        }
        OutcomeTier::MessySuccess => {
            if let Some(unlucky) = everyone.choose(rng).cloned() {
                let rest: Vec<UserId> =
                    everyone.iter().filter(|u| **u != unlucky).cloned().collect();
                payouts = split(&rest, (payout as f64 * MESSY_PAYOUT_SHARE).floor() as i64);
                jailed.push(Sentence {
                    minutes: minutes_in(MESSY_JAIL_MINUTES, rng),
                    user: unlucky,
                });
            }
            heat_level(wg + 0.5, 1)
        }
        OutcomeTier::Ambush => {
            if let Some(victim) = everyone.choose(rng).cloned() {
                hospitalized.push(Sentence {
                    minutes: minutes_in(AMBUSH_HOSPITAL_MINUTES, rng),
                    user: victim,
                });
            }
            heat_level(wg + 1.0, 1)
        }
        OutcomeTier::TotalBust => {
            for user in &everyone {
                jailed.push(Sentence {
                    user: user.clone(),
                    minutes: minutes_in(BUST_JAIL_MINUTES, rng),
                });
            }
            heat_level(wg + 1.0, 2)
        }
    };

    Resolution {
        tier,
        odds,
        roll,
        base_payout,
        payout,
        payouts,
        heat,
        heat_targets: everyone,
        jailed,
        hospitalized,
    }
}

/// Split `total` evenly; every recipient gets at least one coin.
fn split(users: &[UserId], total: i64) -> Vec<Payout> {
    if users.is_empty() {
        return Vec::new();
    }
    let each = (total / users.len() as i64).max(1);
    let xp = (each / 150).max(5);
    users
        .iter()
        .map(|u| Payout {
            user: u.clone(),
            amount: each,
            xp,
        })
        .collect()
}

fn heat_level(gain: f64, floor: i64) -> u32 {
    (gain.round() as i64).max(floor) as u32
}

fn minutes_in(range: (u32, u32), rng: &mut StdRng) -> u32 {
    rng.random_range(range.0..=range.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heist_core::{Role, TaskResult};
    use rand::SeedableRng;

    fn bank() -> &'static Location {
        Location::find("bank").unwrap()
    }

    fn crew() -> Vec<Member> {
        vec![
            Member::new(UserId::from("boss"), Role::Leader).with_task(TaskResult::success(1)),
            Member::new(UserId::from("wheels"), Role::Driver).with_task(TaskResult::success(1)),
            Member::new(UserId::from("keys"), Role::Hacker).with_task(TaskResult::fail()),
        ]
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn low_roll_is_a_clean_even_split() {
        let r = resolve_with_roll(bank(), &crew(), 0.10, &mut rng());
        assert_eq!(r.tier, OutcomeTier::CleanSuccess);
        assert!((1800..=4200).contains(&r.base_payout));
        assert_eq!(r.payout, (r.base_payout as f64 * 1.15).floor() as i64);

        assert_eq!(r.payouts.len(), 3);
        let each = r.payout / 3;
        assert!(r.payouts.iter().all(|p| p.amount == each));
        assert!(r.payouts.iter().all(|p| p.xp == (each / 150).max(5)));

        // warrant gain 1.5 rounds to 2
        assert_eq!(r.heat, 2);
        assert_eq!(r.heat_targets.len(), 3);
        assert!(r.jailed.is_empty() && r.hospitalized.is_empty());
    }

    #[test]
    fn messy_escape_leaves_one_behind() {
        let r = resolve_with_roll(bank(), &crew(), 0.40, &mut rng());
        assert_eq!(r.tier, OutcomeTier::MessySuccess);
        assert_eq!(r.jailed.len(), 1);
        let caught = &r.jailed[0];
        assert!((6..=12).contains(&caught.minutes));

        assert_eq!(r.payouts.len(), 2);
        assert!(r.payouts.iter().all(|p| p.user != caught.user));
        let share = (r.payout as f64 * 0.6).floor() as i64 / 2;
        assert!(r.payouts.iter().all(|p| p.amount == share));
        // round(1.5 + 0.5)
        assert_eq!(r.heat, 2);
    }

    #[test]
    fn ambush_hospitalizes_one() {
        let r = resolve_with_roll(bank(), &crew(), 0.52, &mut rng());
        assert_eq!(r.tier, OutcomeTier::Ambush);
        assert!(r.payouts.is_empty());
        assert!(r.jailed.is_empty());
        assert_eq!(r.hospitalized.len(), 1);
        assert!((12..=18).contains(&r.hospitalized[0].minutes));
        // round(1.5 + 1.0) rounds half away from zero
        assert_eq!(r.heat, 3);
    }

    #[test]
    fn bust_jails_everyone() {
        let r = resolve_with_roll(bank(), &crew(), 0.99, &mut rng());
        assert_eq!(r.tier, OutcomeTier::TotalBust);
        assert!(r.payouts.is_empty());
        assert_eq!(r.jailed.len(), 3);
        assert!(r.jailed.iter().all(|s| (8..=15).contains(&s.minutes)));
        assert_eq!(r.heat, 3);
    }

    #[test]
    fn heat_floors_apply_with_masks() {
        let masked: Vec<Member> = crew()
            .into_iter()
            .map(|m| m.with_equipment("mask"))
            .collect();
        // 1.0 - 0.4 + 0.5 (aggressive leader) - 0.4 - 0.4 = 0.3
        let clean = resolve_with_roll(bank(), &masked, 0.0, &mut rng());
        assert_eq!(clean.heat, 0);
        let bust = resolve_with_roll(bank(), &masked, 0.99, &mut rng());
        assert_eq!(bust.heat, 2);
    }

    #[test]
    fn same_seed_same_resolution() {
        let a = resolve(bank(), &crew(), &mut StdRng::seed_from_u64(3));
        let b = resolve(bank(), &crew(), &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_payout_still_pays_a_coin() {
        let paid = split(&[UserId::from("a"), UserId::from("b")], 1);
        assert!(paid.iter().all(|p| p.amount == 1 && p.xp == 5));
        assert!(split(&[], 100).is_empty());
    }

    #[test]
    fn serializes_to_json() {
        let r = resolve_with_roll(bank(), &crew(), 0.10, &mut rng());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["tier"], "clean_success");
        assert_eq!(json["payouts"].as_array().unwrap().len(), 3);
    }
}
