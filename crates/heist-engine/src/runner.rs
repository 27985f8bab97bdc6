//! Concurrent role tasks.
//!
//! Each member gets one task: an optional arming delay, then a prompt raced
//! against the remaining window. Tasks run cooperatively on the calling task
//! and are joined once all of them have settled.

use std::time::Duration;

use futures::future::join_all;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep, timeout};
use tracing::debug;
use uuid::Uuid;

use heist_core::{GroupId, HeistConfig, Role, SessionRegistry, TaskResult, UserId};
use heist_mechanics::{arming_delay, judge, prompt_for};

use crate::presenter::Presenter;

/// Writes settled results back into a specific session instance.
///
/// Results for a session that has been aborted (or replaced) are dropped.
pub struct ResultSink<'a> {
    registry: &'a Mutex<SessionRegistry>,
    group: &'a GroupId,
    session_id: Uuid,
}

impl<'a> ResultSink<'a> {
    /// Sink for `session_id` in `group`.
    pub fn new(registry: &'a Mutex<SessionRegistry>, group: &'a GroupId, session_id: Uuid) -> Self {
        Self {
            registry,
            group,
            session_id,
        }
    }

    /// Store the result. Returns false if the session is gone.
    pub async fn record(&self, user: &UserId, result: TaskResult) -> bool {
        let mut registry = self.registry.lock().await;
        match registry.get_mut(self.group) {
            Some(session) if session.id() == self.session_id => {
                session.record_task_result(user, result)
            }
            _ => false,
        }
    }
}

/// Runs every member's task within the task window.
pub struct RoleTaskRunner<'a> {
    presenter: &'a dyn Presenter,
    window: Duration,
    green_light_ms: (u64, u64),
}

impl<'a> RoleTaskRunner<'a> {
    /// A runner using the config's window and green-light range.
    pub fn new(presenter: &'a dyn Presenter, config: &HeistConfig) -> Self {
        Self {
            presenter,
            window: config.task_window(),
            green_light_ms: config.green_light_range(),
        }
    }

    /// Run one task per crew member and wait for all of them.
    ///
    /// Results are recorded through `sink` as each task settles and are
    /// returned in crew order.
    pub async fn run(
        &self,
        crew: Vec<(UserId, Role)>,
        seed: u64,
        sink: &ResultSink<'_>,
    ) -> Vec<(UserId, TaskResult)> {
        let mut rng = StdRng::seed_from_u64(seed);
        let deadline = Instant::now() + self.window;
        let tasks: Vec<_> = crew
            .into_iter()
            .map(|(user, role)| {
                let task_rng = StdRng::seed_from_u64(rng.random());
                self.run_task(user, role, deadline, task_rng, sink)
            })
            .collect();
        join_all(tasks).await
    }

    async fn run_task(
        &self,
        user: UserId,
        role: Role,
        deadline: Instant,
        mut rng: StdRng,
        sink: &ResultSink<'_>,
    ) -> (UserId, TaskResult) {
        if let Some(delay) = arming_delay(role, self.green_light_ms, self.window, &mut rng) {
            sleep(delay).await;
        }
        let prompt = prompt_for(role);
        let remaining = deadline.saturating_duration_since(Instant::now());
        let answer = timeout(
            remaining,
            self.presenter.present_choice(&user, &prompt, remaining),
        )
        .await;

        let result = match answer {
            Ok(Some(selection)) => judge(role, &selection, &mut rng),
            Ok(None) | Err(_) => TaskResult::timeout(),
        };
        debug!(
            user = %user,
            role = %role,
            status = ?result.status,
            score = result.score,
            "task settled"
        );

        if sink.record(&user, result).await {
            self.presenter.task_settled(&user, role, &result).await;
        }
        (user, result)
    }
}
