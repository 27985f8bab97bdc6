//! Turning a finished session into ledger effects.

use rand::rngs::StdRng;
use tracing::{info, warn};

use heist_core::{LedgerResult, Session, UserId};
use heist_mechanics::{AMBUSH_REASON, Resolution, resolve};

use crate::ledger::Ledger;
use crate::report::HeistReport;

/// Resolves sessions and applies the result through a `Ledger`.
pub struct OutcomeResolver<'a> {
    ledger: &'a dyn Ledger,
}

impl<'a> OutcomeResolver<'a> {
    /// A resolver writing to `ledger`.
    pub fn new(ledger: &'a dyn Ledger) -> Self {
        Self { ledger }
    }

    /// Roll the outcome for a session whose tasks have settled.
    pub fn plan(session: &Session, rng: &mut StdRng) -> Resolution {
        resolve(session.location(), session.members(), rng)
    }

    /// Apply payouts, heat, jail and hospital stays.
    ///
    /// A failing ledger call is logged and skipped; the rest are still
    /// applied. Returns the number of failed calls.
    pub async fn apply(&self, resolution: &Resolution) -> usize {
        let ledger = self.ledger;
        let mut failed = 0;
        for p in &resolution.payouts {
            failed += effect(&p.user, "payout", ledger.adjust_balance(&p.user, p.amount).await);
            failed += effect(&p.user, "xp", ledger.award_xp(&p.user, p.xp).await);
        }
        if resolution.heat > 0 {
            for user in &resolution.heat_targets {
                failed += effect(user, "heat", ledger.add_warrants(user, resolution.heat).await);
            }
        }
        for s in &resolution.jailed {
            failed += effect(&s.user, "jail", ledger.incarcerate(&s.user, s.minutes).await);
        }
        for s in &resolution.hospitalized {
            let result = ledger.hospitalize(&s.user, s.minutes, AMBUSH_REASON).await;
            failed += effect(&s.user, "hospital", result);
        }
        failed
    }

    /// Plan, apply and report in one go.
    pub async fn resolve(&self, session: &Session, rng: &mut StdRng) -> HeistReport {
        let resolution = Self::plan(session, rng);
        let failed = self.apply(&resolution).await;
        info!(
            group = %session.group(),
            location = session.location().key,
            tier = %resolution.tier,
            roll = resolution.roll,
            payout = resolution.payout,
            "heist resolved"
        );
        HeistReport::new(session, resolution, failed)
    }
}

fn effect<T>(user: &UserId, what: &str, result: LedgerResult<T>) -> usize {
    match result {
        Ok(_) => 0,
        Err(e) => {
            warn!(user = %user, effect = what, error = %e, "ledger effect failed");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heist_core::{GroupId, Location, Member, Role, TaskResult};
    use heist_mechanics::{OutcomeTier, resolve_with_roll};
    use rand::SeedableRng;

    use crate::ledger::MemoryLedger;

    fn crew() -> Vec<Member> {
        vec![
            Member::new(UserId::from("boss"), Role::Leader).with_task(TaskResult::success(1)),
            Member::new(UserId::from("wheels"), Role::Driver).with_task(TaskResult::success(1)),
            Member::new(UserId::from("nerd"), Role::Hacker).with_task(TaskResult::success(1)),
        ]
    }

    /// Two successes and a failed hacker, the mix the tier tests roll against.
    fn shaky_crew() -> Vec<Member> {
        vec![
            Member::new(UserId::from("boss"), Role::Leader).with_task(TaskResult::success(1)),
            Member::new(UserId::from("wheels"), Role::Driver).with_task(TaskResult::success(1)),
            Member::new(UserId::from("nerd"), Role::Hacker).with_task(TaskResult::fail()),
        ]
    }

    async fn funded(users: &[&str]) -> MemoryLedger {
        let ledger = MemoryLedger::new();
        for u in users {
            ledger.open_account(&UserId::from(*u), 0).await;
        }
        ledger
    }

    #[tokio::test]
    async fn clean_getaway_pays_everyone() {
        let ledger = funded(&["boss", "wheels", "nerd"]).await;
        let bank = Location::find("bank").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let resolution = resolve_with_roll(bank, &crew(), 0.10, &mut rng);

        let failed = OutcomeResolver::new(&ledger).apply(&resolution).await;

        assert_eq!(failed, 0);
        let each = resolution.payouts[0].amount;
        for u in ["boss", "wheels", "nerd"] {
            let w = ledger.wallet(&UserId::from(u)).await.unwrap();
            assert_eq!(w.balance, each);
            assert_eq!(w.xp, (each / 150).max(5));
            assert_eq!(w.warrants, resolution.heat);
        }
    }

    #[tokio::test]
    async fn bust_jails_the_crew() {
        let ledger = funded(&["boss", "wheels", "nerd"]).await;
        let bank = Location::find("bank").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let resolution = resolve_with_roll(bank, &crew(), 0.99, &mut rng);

        OutcomeResolver::new(&ledger).apply(&resolution).await;

        for u in ["boss", "wheels", "nerd"] {
            let w = ledger.wallet(&UserId::from(u)).await.unwrap();
            assert_eq!(w.balance, 0);
            assert!(w.jailed_until.is_some());
            // heat plus one warrant for the arrest
            assert_eq!(w.warrants, resolution.heat + 1);
        }
    }

    #[tokio::test]
    async fn ambush_hospitalizes_the_victim() {
        let ledger = funded(&["boss", "wheels", "nerd"]).await;
        let bank = Location::find("bank").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let resolution = resolve_with_roll(bank, &shaky_crew(), 0.52, &mut rng);
        assert_eq!(resolution.tier, OutcomeTier::Ambush);

        let failed = OutcomeResolver::new(&ledger).apply(&resolution).await;

        assert_eq!(failed, 0);
        let victim = &resolution.hospitalized[0].user;
        let w = ledger.wallet(victim).await.unwrap();
        assert!(w.hospitalized_until.is_some());
        assert_eq!(w.hospital_reason.as_deref(), Some("Heist Ambush"));
        assert_eq!(w.balance, 0);
        assert!(w.jailed_until.is_none());
        for u in ["boss", "wheels", "nerd"] {
            let user = UserId::from(u);
            if &user != victim {
                let w = ledger.wallet(&user).await.unwrap();
                assert!(w.hospitalized_until.is_none(), "{u}");
            }
        }
    }

    #[tokio::test]
    async fn messy_escape_leaves_the_caught_member_unpaid() {
        let ledger = MemoryLedger::new();
        for u in ["boss", "wheels", "nerd"] {
            ledger.open_account(&UserId::from(u), 1000).await;
        }
        let bank = Location::find("bank").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let resolution = resolve_with_roll(bank, &shaky_crew(), 0.40, &mut rng);
        assert_eq!(resolution.tier, OutcomeTier::MessySuccess);

        let failed = OutcomeResolver::new(&ledger).apply(&resolution).await;

        assert_eq!(failed, 0);
        let caught = &resolution.jailed[0].user;
        let w = ledger.wallet(caught).await.unwrap();
        assert_eq!(w.balance, 1000);
        assert_eq!(w.xp, 0);
        assert!(w.jailed_until.is_some());
        for p in &resolution.payouts {
            let w = ledger.wallet(&p.user).await.unwrap();
            assert_eq!(w.balance, 1000 + p.amount);
            assert!(w.jailed_until.is_none());
        }
    }

    #[tokio::test]
    async fn failures_are_counted_not_fatal() {
        // nerd has no account
        let ledger = funded(&["boss", "wheels"]).await;
        let bank = Location::find("bank").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let resolution = resolve_with_roll(bank, &crew(), 0.10, &mut rng);

        let failed = OutcomeResolver::new(&ledger).apply(&resolution).await;

        // nerd's payout and xp fail, plus heat when there is any
        let expected = if resolution.heat > 0 { 3 } else { 2 };
        assert_eq!(failed, expected);
        assert!(ledger.wallet(&UserId::from("boss")).await.unwrap().balance > 0);
    }

    #[tokio::test]
    async fn report_carries_crew_results() {
        let ledger = funded(&["boss", "wheels", "nerd"]).await;
        let mut registry = heist_core::SessionRegistry::new();
        let group = GroupId::from("g");
        registry.create(group.clone(), UserId::from("boss"), "casino").unwrap();
        let session = registry.get_mut(&group).unwrap();
        session.join(UserId::from("wheels"), "driver").unwrap();
        session.join(UserId::from("nerd"), "hacker").unwrap();
        session.record_task_result(&UserId::from("nerd"), TaskResult::timeout());
        let session = session.clone();

        let mut rng = StdRng::seed_from_u64(9);
        let report = OutcomeResolver::new(&ledger).resolve(&session, &mut rng).await;

        assert_eq!(report.location, "casino");
        assert_eq!(report.crew.len(), 3);
        assert_eq!(report.crew[2].task, TaskResult::timeout());
        assert_eq!(report.failed_effects, 0);
        assert!(report.summary().starts_with("Casino: "));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["location"], "casino");
        assert_eq!(json["crew"][2]["task"]["status"], "timeout");
        assert_eq!(json["crew"][2]["role"], "hacker");
    }
}
