//! A crew of bots standing in for real players.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tokio::time::sleep;

use heist_core::{GroupId, Role, TaskResult, TaskStatus, UserId};
use heist_engine::{HeistReport, Presenter};
use heist_mechanics::Prompt;
use heist_mechanics::challenge::BYPASS_SEQUENCE;

/// The answer a bot gives for its role.
pub fn bot_answer(role: Role, posture: &str) -> String {
    match role {
        Role::Leader => posture.to_string(),
        Role::Driver => "accelerate".to_string(),
        Role::Hacker => BYPASS_SEQUENCE.to_string(),
        Role::Muscle => "intimidate".to_string(),
        Role::Lookout => "warn".to_string(),
    }
}

/// Answers prompts after a short random think. Players without an answer
/// are AFK and never reply.
pub struct CrewBots {
    answers: HashMap<UserId, String>,
    rng: Mutex<StdRng>,
    quiet: bool,
}

impl CrewBots {
    /// A crew with nobody answering yet; `quiet` mutes the per-task lines.
    pub fn new(seed: u64, quiet: bool) -> Self {
        Self {
            answers: HashMap::new(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            quiet,
        }
    }

    /// Have `user` reply with `answer` to every prompt.
    pub fn with_answer(mut self, user: UserId, answer: String) -> Self {
        self.answers.insert(user, answer);
        self
    }
}

#[async_trait]
impl Presenter for CrewBots {
    async fn present_choice(
        &self,
        user: &UserId,
        _prompt: &Prompt,
        window: Duration,
    ) -> Option<String> {
        let Some(answer) = self.answers.get(user) else {
            return std::future::pending().await;
        };
        let ms = window.as_millis() as u64;
        let think = self.rng.lock().await.random_range(ms / 20..=ms / 5);
        sleep(Duration::from_millis(think)).await;
        Some(answer.clone())
    }

    async fn task_settled(&self, user: &UserId, role: Role, result: &TaskResult) {
        if self.quiet {
            return;
        }
        let status = match result.status {
            TaskStatus::Success => "success".green(),
            TaskStatus::Fail => "fail".red(),
            TaskStatus::Timeout => "timeout".yellow(),
            TaskStatus::Pending => "pending".normal(),
        };
        println!("  {} {user} ({role}) {status}", "task".dimmed());
    }

    async fn announce_outcome(&self, _group: &GroupId, report: &HeistReport) {
        if self.quiet {
            return;
        }
        println!();
        println!(
            "  {} {}",
            report.location_name.bold(),
            crate::commands::simulate::colorize_tier(report.tier())
        );
    }
}
