//! The ledger collaborator: balances, heat, jail and hospital.
//!
//! The engine only talks to the `Ledger` trait. `MemoryLedger` is an
//! in-process implementation used by the CLI and the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use heist_core::{LedgerError, LedgerResult, Standing, UserId};

/// Player state owned outside the heist engine.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Current balance.
    async fn balance(&self, user: &UserId) -> LedgerResult<i64>;

    /// Add `delta` (may be negative) and return the new balance.
    async fn adjust_balance(&self, user: &UserId, delta: i64) -> LedgerResult<i64>;

    /// Atomically check that the balance covers `amount` and deduct it.
    /// Returns the new balance or `InsufficientFunds`.
    async fn debit(&self, user: &UserId, amount: i64) -> LedgerResult<i64>;

    /// Add heat.
    async fn add_warrants(&self, user: &UserId, count: u32) -> LedgerResult<()>;

    /// Add experience.
    async fn award_xp(&self, user: &UserId, xp: i64) -> LedgerResult<()>;

    /// Jail the player for `minutes`.
    async fn incarcerate(&self, user: &UserId, minutes: u32) -> LedgerResult<()>;

    /// Hospitalize the player for `minutes`.
    async fn hospitalize(&self, user: &UserId, minutes: u32, reason: &str) -> LedgerResult<()>;

    /// Jail and hospital release times.
    async fn standing(&self, user: &UserId) -> LedgerResult<Standing>;
}

/// A player's wallet in the memory ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Wallet {
    /// Coins.
    pub balance: i64,
    /// Experience.
    pub xp: i64,
    /// Heat.
    pub warrants: u32,
    /// End of the current jail sentence.
    pub jailed_until: Option<DateTime<Utc>>,
    /// End of the current hospital stay.
    pub hospitalized_until: Option<DateTime<Utc>>,
    /// Why the player was hospitalized.
    pub hospital_reason: Option<String>,
}

/// Ledger kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    wallets: Mutex<HashMap<UserId, Wallet>>,
}

impl MemoryLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or reset) a wallet with a starting balance.
    pub async fn open_account(&self, user: &UserId, balance: i64) {
        self.wallets.lock().await.insert(
            user.clone(),
            Wallet {
                balance,
                ..Wallet::default()
            },
        );
    }

    /// A copy of the player's wallet.
    pub async fn wallet(&self, user: &UserId) -> Option<Wallet> {
        self.wallets.lock().await.get(user).cloned()
    }

    async fn with_wallet<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut Wallet) -> LedgerResult<T> + Send,
    ) -> LedgerResult<T> {
        let mut wallets = self.wallets.lock().await;
        let wallet = wallets
            .get_mut(user)
            .ok_or_else(|| LedgerError::UnknownAccount(user.clone()))?;
        f(wallet)
    }
}

fn minutes_from_now(minutes: u32) -> DateTime<Utc> {
    Utc::now() + Duration::minutes(i64::from(minutes))
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn balance(&self, user: &UserId) -> LedgerResult<i64> {
        self.with_wallet(user, |w| Ok(w.balance)).await
    }

    async fn adjust_balance(&self, user: &UserId, delta: i64) -> LedgerResult<i64> {
        self.with_wallet(user, |w| {
            w.balance += delta;
            Ok(w.balance)
        })
        .await
    }

    async fn debit(&self, user: &UserId, amount: i64) -> LedgerResult<i64> {
        self.with_wallet(user, |w| {
            if w.balance < amount {
                return Err(LedgerError::InsufficientFunds {
                    needed: amount,
                    available: w.balance,
                });
            }
            w.balance -= amount;
            Ok(w.balance)
        })
        .await
    }

    async fn add_warrants(&self, user: &UserId, count: u32) -> LedgerResult<()> {
        self.with_wallet(user, |w| {
            w.warrants = w.warrants.saturating_add(count);
            Ok(())
        })
        .await
    }

    async fn award_xp(&self, user: &UserId, xp: i64) -> LedgerResult<()> {
        self.with_wallet(user, |w| {
            w.xp += xp;
            Ok(())
        })
        .await
    }

    /// Jailing also adds one warrant.
    async fn incarcerate(&self, user: &UserId, minutes: u32) -> LedgerResult<()> {
        self.with_wallet(user, |w| {
            w.jailed_until = Some(minutes_from_now(minutes));
            w.warrants = w.warrants.saturating_add(1);
            Ok(())
        })
        .await
    }

    async fn hospitalize(&self, user: &UserId, minutes: u32, reason: &str) -> LedgerResult<()> {
        let reason = reason.to_string();
        self.with_wallet(user, |w| {
            w.hospitalized_until = Some(minutes_from_now(minutes));
            w.hospital_reason = Some(reason);
            Ok(())
        })
        .await
    }

    async fn standing(&self, user: &UserId) -> LedgerResult<Standing> {
        self.with_wallet(user, |w| {
            Ok(Standing {
                jailed_until: w.jailed_until,
                hospitalized_until: w.hospitalized_until,
            })
        })
        .await
    }
}
