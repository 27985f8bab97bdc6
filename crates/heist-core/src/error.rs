//! Error types for heist sessions and the ledger.

use thiserror::Error;

use crate::catalog::Role;
use crate::ids::UserId;
use crate::session::Phase;

/// Result type for heist operations.
pub type HeistResult<T> = Result<T, HeistError>;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors returned to the caller of a heist command.
///
/// Every variant except `Ledger` is a validation failure: the session is left
/// exactly as it was before the command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeistError {
    /// The group already hosts a heist.
    #[error("a heist is already active in this group")]
    SessionAlreadyActive,

    /// No location with this key exists.
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// The group has no heist to operate on.
    #[error("no active heist")]
    NoActiveSession,

    /// The player is already part of the crew.
    #[error("you already joined this heist")]
    AlreadyJoined,

    /// Another member holds the requested role.
    #[error("the {0} role is already taken")]
    RoleTaken(Role),

    /// No role with this key exists.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// The command is not allowed in the session's current phase.
    #[error("not allowed while the heist is in the {0} phase")]
    InvalidPhase(Phase),

    /// The player is not part of the crew.
    #[error("you are not in this heist")]
    NotAMember,

    /// No equipment with this key exists.
    #[error("invalid equipment: {0}")]
    InvalidEquipment(String),

    /// The member already owns this item.
    #[error("you already own {0}")]
    AlreadyEquipped(String),

    /// Only the leader may issue this command.
    #[error("only the leader can do that")]
    NotLeader,

    /// Too few members to launch.
    #[error("need at least {need} crew members, have {have}")]
    InsufficientCrew {
        /// Current crew size.
        have: usize,
        /// Required crew size.
        need: usize,
    },

    /// The player is serving a jail sentence.
    #[error("you're in jail for another {minutes_left}m")]
    Jailed {
        /// Whole minutes until release, rounded up.
        minutes_left: i64,
    },

    /// The player is recovering in hospital.
    #[error("you're hospitalized for another {minutes_left}m")]
    Hospitalized {
        /// Whole minutes until discharge, rounded up.
        minutes_left: i64,
    },

    /// The player started a heist too recently.
    #[error("you must wait {minutes_left}m before starting another heist")]
    OnCooldown {
        /// Whole minutes until the cooldown ends, rounded up.
        minutes_left: i64,
    },

    /// The ledger refused the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Errors reported by a ledger implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The balance does not cover the requested debit.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Amount requested.
        needed: i64,
        /// Balance at the time of the request.
        available: i64,
    },

    /// The player has no wallet.
    #[error("no wallet for {0}")]
    UnknownAccount(UserId),

    /// The storage backend failed.
    #[error("ledger backend error: {0}")]
    Backend(String),
}
