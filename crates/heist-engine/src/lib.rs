//! Async heist orchestration.
//!
//! `HeistEngine` is the command surface (create, join, buy, launch, abort,
//! status). Launch fans out one deadline-bounded role task per member through
//! a `Presenter`, waits for all of them, then resolves the outcome and
//! applies it through a `Ledger`.

pub mod engine;
pub mod ledger;
pub mod presenter;
pub mod report;
pub mod resolver;
pub mod runner;

pub use engine::{HeistEngine, Purchase};
pub use ledger::{Ledger, MemoryLedger, Wallet};
pub use presenter::Presenter;
pub use report::{CrewResult, HeistReport, LaunchOutcome};
pub use resolver::OutcomeResolver;
pub use runner::{ResultSink, RoleTaskRunner};
