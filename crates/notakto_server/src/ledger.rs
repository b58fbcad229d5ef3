//! Coin and XP balances per account.
//!
//! The server only ever adds signed amounts to a balance; rewards are
//! positive and skip charges negative.

use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Account balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Account id.
    pub account: String,
    /// Coins held. May go negative.
    pub coins: i64,
    /// Experience gathered.
    pub xp: i64,
}

impl Balance {
    /// A zero balance for `account`.
    pub fn empty(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            coins: 0,
            xp: 0,
        }
    }
}

/// Ledger failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Ledger error: {} at {}:{}", message, file, line)]
pub struct LedgerError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LedgerError {
    /// Creates a new ledger error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Store of account balances.
#[async_trait]
pub trait RewardLedger: Send + Sync + std::fmt::Debug {
    /// Adds signed amounts to an account and returns the new balance.
    async fn credit(&self, account: &str, coins: i64, xp: i64) -> Result<Balance, LedgerError>;

    /// Current balance; unknown accounts hold nothing.
    async fn balance(&self, account: &str) -> Result<Balance, LedgerError>;
}

/// Ledger kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<String, Balance>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_account(account: &str) -> Result<(), LedgerError> {
    if account.trim().is_empty() {
        return Err(LedgerError::new("Account id must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl RewardLedger for InMemoryLedger {
    #[instrument(skip(self))]
    async fn credit(&self, account: &str, coins: i64, xp: i64) -> Result<Balance, LedgerError> {
        check_account(account)?;
        let mut balances = self.balances.write().await;
        let balance = balances
            .entry(account.to_string())
            .or_insert_with(|| Balance::empty(account));
        balance.coins += coins;
        balance.xp += xp;
        debug!(coins = balance.coins, xp = balance.xp, "Balance updated");
        Ok(balance.clone())
    }

    #[instrument(skip(self))]
    async fn balance(&self, account: &str) -> Result<Balance, LedgerError> {
        check_account(account)?;
        let balances = self.balances.read().await;
        Ok(balances
            .get(account)
            .cloned()
            .unwrap_or_else(|| Balance::empty(account)))
    }
}
