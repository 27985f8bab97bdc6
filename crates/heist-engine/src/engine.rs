//! The command surface.
//!
//! Every command takes the registry lock for its whole critical section,
//! including the ledger debit of a purchase. Launch is the exception: the
//! lock is released while role tasks run and re-taken by each task to record
//! its result, then once more to take the session for resolution.

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, info};

use heist_core::{
    Cooldowns, Equipment, GroupId, HeistConfig, HeistResult, Role, Session, SessionRegistry,
    UserId,
};

use crate::ledger::Ledger;
use crate::presenter::Presenter;
use crate::report::LaunchOutcome;
use crate::resolver::OutcomeResolver;
use crate::runner::{ResultSink, RoleTaskRunner};

/// A completed equipment purchase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Purchase {
    /// The item bought.
    pub item: &'static Equipment,
    /// Balance after the debit.
    pub balance: i64,
}

/// Owns all sessions and runs heists against a ledger and a presenter.
pub struct HeistEngine {
    config: HeistConfig,
    registry: Mutex<SessionRegistry>,
    cooldowns: Mutex<Cooldowns>,
    ledger: Arc<dyn Ledger>,
    presenter: Arc<dyn Presenter>,
    rng: Mutex<StdRng>,
}

impl HeistEngine {
    /// An engine with no sessions. Seeded from `config.seed` when set.
    pub fn new(
        config: HeistConfig,
        ledger: Arc<dyn Ledger>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            cooldowns: Mutex::new(Cooldowns::new(config.start_cooldown_minutes)),
            config,
            registry: Mutex::new(SessionRegistry::new()),
            ledger,
            presenter,
            rng: Mutex::new(rng),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &HeistConfig {
        &self.config
    }

    async fn ensure_free(&self, user: &UserId) -> HeistResult<()> {
        self.ledger.standing(user).await?.check(Utc::now())
    }

    async fn next_seed(&self) -> u64 {
        self.rng.lock().await.random()
    }

    /// Open a session in `group` with `leader` as its first member.
    pub async fn create(
        &self,
        group: &GroupId,
        leader: &UserId,
        location_key: &str,
    ) -> HeistResult<Session> {
        self.ensure_free(leader).await?;
        let now = Utc::now();
        let mut cooldowns = self.cooldowns.lock().await;
        cooldowns.check(leader, now)?;

        let mut registry = self.registry.lock().await;
        let session = registry
            .create(group.clone(), leader.clone(), location_key)?
            .clone();
        cooldowns.arm(leader, now);

        info!(group = %group, leader = %leader, location = session.location().key, "heist created");
        Ok(session)
    }

    /// Claim a role in the group's session.
    pub async fn join(&self, group: &GroupId, user: &UserId, role_key: &str) -> HeistResult<Role> {
        self.ensure_free(user).await?;
        let mut registry = self.registry.lock().await;
        let session = registry.require_mut(group)?;
        let role = session.join(user.clone(), role_key)?.role;
        info!(
            group = %group,
            user = %user,
            role = %role,
            crew = session.crew_size(),
            "crew joined"
        );
        Ok(role)
    }

    /// Buy an item for the member's own loadout.
    ///
    /// Nothing is debited unless the member, phase and item all check out.
    /// The debit and the grant happen under one lock.
    pub async fn buy_equipment(
        &self,
        group: &GroupId,
        user: &UserId,
        item_key: &str,
    ) -> HeistResult<Purchase> {
        self.ensure_free(user).await?;
        let mut registry = self.registry.lock().await;
        let session = registry.require_mut(group)?;
        let item = session.check_equip(user, item_key)?;
        let balance = self.ledger.debit(user, item.cost).await?;
        session.equip(user, item.key)?;
        debug!(
            group = %group,
            user = %user,
            item = item.key,
            cost = item.cost,
            balance,
            "equipment bought"
        );
        Ok(Purchase { item, balance })
    }

    /// Run the heist: fan out role tasks, wait for them, resolve, announce.
    ///
    /// Returns `Aborted` if the session was aborted while tasks ran.
    ///
    /// The future must be driven to completion. If it is dropped mid-run
    /// the session stays `Active` and holds the group until the leader
    /// aborts it.
    pub async fn launch(&self, group: &GroupId, requester: &UserId) -> HeistResult<LaunchOutcome> {
        self.ensure_free(requester).await?;
        let (session_id, crew) = {
            let mut registry = self.registry.lock().await;
            let session = registry.require_mut(group)?;
            session.launch(requester)?;
            let crew: Vec<(UserId, Role)> = session
                .members()
                .iter()
                .map(|m| (m.user.clone(), m.role))
                .collect();
            (session.id(), crew)
        };
        info!(group = %group, crew = crew.len(), "heist launched");

        let runner = RoleTaskRunner::new(self.presenter.as_ref(), &self.config);
        let sink = ResultSink::new(&self.registry, group, session_id);
        runner.run(crew, self.next_seed().await, &sink).await;

        let taken = self
            .registry
            .lock()
            .await
            .take_for_resolution(group, session_id);
        let Some(session) = taken else {
            info!(group = %group, "heist aborted during tasks");
            return Ok(LaunchOutcome::Aborted);
        };

        let mut rng = StdRng::seed_from_u64(self.next_seed().await);
        let report = OutcomeResolver::new(self.ledger.as_ref())
            .resolve(&session, &mut rng)
            .await;
        self.presenter.announce_outcome(group, &report).await;
        Ok(LaunchOutcome::Resolved(Box::new(report)))
    }

    /// Leader-only cancellation. No resolution and no refunds.
    pub async fn abort(&self, group: &GroupId, requester: &UserId) -> HeistResult<Session> {
        let session = self.registry.lock().await.abort(group, requester)?;
        info!(group = %group, phase = %session.phase(), "heist aborted");
        Ok(session)
    }

    /// A snapshot of the group's session.
    pub async fn status(&self, group: &GroupId) -> HeistResult<Session> {
        Ok(self.registry.lock().await.require(group)?.clone())
    }
}
