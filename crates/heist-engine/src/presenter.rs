//! The presentation collaborator.

use std::time::Duration;

use async_trait::async_trait;

use heist_core::{GroupId, Role, TaskResult, UserId};
use heist_mechanics::Prompt;

use crate::report::HeistReport;

/// Delivers prompts to players and announces results.
///
/// The engine bounds `present_choice` by the task window itself, so an
/// implementation may simply wait for input and never return.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Show `prompt` to `user` and wait for their selection.
    ///
    /// `None` means the player will not answer (left, dismissed the prompt).
    async fn present_choice(&self, user: &UserId, prompt: &Prompt, window: Duration)
    -> Option<String>;

    /// Called once per member as soon as their task settles.
    async fn task_settled(&self, _user: &UserId, _role: Role, _result: &TaskResult) {}

    /// Called exactly once per resolved heist.
    async fn announce_outcome(&self, group: &GroupId, report: &HeistReport);
}
