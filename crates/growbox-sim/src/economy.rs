//! Economy ledger: coin and token balances with an audit trail.
//!
//! Credits and debits either apply in full or fail with no change. A debit
//! that would push a balance below zero is rejected, never clamped.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;
use tracing::debug;

/// Ledger entries kept by default before the oldest are dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Economy error types.
#[derive(Debug, Error)]
pub enum EconomyError {
    /// Negative transaction amount
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Amount that was rejected
        amount: i64,
    },
    /// Insufficient funds
    #[error("Insufficient {currency}: need {needed}, have {have}")]
    InsufficientFunds {
        /// Currency being debited
        currency: Currency,
        /// Amount needed
        needed: u64,
        /// Amount available
        have: u64,
    },
    /// Credit would overflow the balance
    #[error("{currency} balance overflow")]
    Overflow {
        /// Currency being credited
        currency: Currency,
    },
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

/// Currencies held by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Coins (primary currency)
    Coins,
    /// Premium tokens
    Tokens,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coins => f.write_str("coins"),
            Self::Tokens => f.write_str("tokens"),
        }
    }
}

/// Why a ledger entry was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Plain credit.
    Credit,
    /// Plain debit.
    Debit,
    /// Shop purchase.
    Purchase,
    /// Coins from a harvested plant.
    HarvestPayout,
    /// Achievement reward.
    Reward,
}

/// A record of a completed ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// What kind of operation
    pub kind: EntryKind,
    /// Currency affected
    pub currency: Currency,
    /// Amount moved (always non-negative)
    pub amount: u64,
    /// Balance of `currency` after the operation
    pub balance_after: u64,
}

/// Read-only view of both balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Balances {
    /// Coin balance
    pub coins: u64,
    /// Token balance
    pub tokens: u64,
}

/// The player's currency balances and transaction rules.
///
/// The audit trail is bounded: once `history_limit` entries are held, each
/// new entry drops the oldest one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyLedger {
    coins: u64,
    tokens: u64,
    history: VecDeque<LedgerEntry>,
    #[serde(default = "default_history_limit")]
    history_limit: usize,
}

impl Default for EconomyLedger {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl EconomyLedger {
    /// Creates a ledger with starting balances.
    #[must_use]
    pub fn new(coins: u64, tokens: u64) -> Self {
        Self {
            coins,
            tokens,
            history: VecDeque::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Keeps at most `limit` history entries (0 disables the audit trail).
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        while self.history.len() > limit {
            self.history.pop_front();
        }
        self
    }

    /// Coin balance.
    #[must_use]
    pub fn coins(&self) -> u64 {
        self.coins
    }

    /// Token balance.
    #[must_use]
    pub fn tokens(&self) -> u64 {
        self.tokens
    }

    /// Both balances.
    #[must_use]
    pub fn balances(&self) -> Balances {
        Balances {
            coins: self.coins,
            tokens: self.tokens,
        }
    }

    /// Checks if a coin price can be paid right now.
    #[must_use]
    pub fn can_afford(&self, price: u64) -> bool {
        self.coins >= price
    }

    /// Retained operations, oldest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &LedgerEntry> + ExactSizeIterator + '_ {
        self.history.iter()
    }

    /// Last `count` retained operations, oldest first.
    pub fn recent_history(&self, count: usize) -> impl Iterator<Item = &LedgerEntry> + '_ {
        self.history.iter().skip(self.history.len().saturating_sub(count))
    }

    /// Removes and returns the retained operations, oldest first.
    pub fn drain_history(&mut self) -> Vec<LedgerEntry> {
        self.history.drain(..).collect()
    }

    /// Adds coins. Returns the new balance.
    pub fn credit(&mut self, amount: i64) -> EconomyResult<u64> {
        let amount = validate(amount)?;
        self.deposit(Currency::Coins, EntryKind::Credit, amount)
    }

    /// Removes coins. Returns the new balance.
    pub fn debit(&mut self, amount: i64) -> EconomyResult<u64> {
        let amount = validate(amount)?;
        self.withdraw(Currency::Coins, EntryKind::Debit, amount)
    }

    /// Pays a shop price in coins. Returns the new balance.
    ///
    /// Ownership of the purchased item is tracked by the shop, not here.
    pub fn purchase(&mut self, price: u64) -> EconomyResult<u64> {
        self.withdraw(Currency::Coins, EntryKind::Purchase, price)
    }

    /// Credits the coins of a harvested plant. Returns the new balance.
    pub fn apply_harvest_payout(&mut self, payout: u64) -> EconomyResult<u64> {
        self.deposit(Currency::Coins, EntryKind::HarvestPayout, payout)
    }

    /// Credits an achievement reward. Returns the new balance.
    pub fn reward(&mut self, amount: u64) -> EconomyResult<u64> {
        self.deposit(Currency::Coins, EntryKind::Reward, amount)
    }

    /// Adds tokens. Returns the new balance.
    pub fn credit_tokens(&mut self, amount: i64) -> EconomyResult<u64> {
        let amount = validate(amount)?;
        self.deposit(Currency::Tokens, EntryKind::Credit, amount)
    }

    /// Removes tokens. Returns the new balance.
    pub fn debit_tokens(&mut self, amount: i64) -> EconomyResult<u64> {
        let amount = validate(amount)?;
        self.withdraw(Currency::Tokens, EntryKind::Debit, amount)
    }

    fn balance_mut(&mut self, currency: Currency) -> &mut u64 {
        match currency {
            Currency::Coins => &mut self.coins,
            Currency::Tokens => &mut self.tokens,
        }
    }

    fn deposit(&mut self, currency: Currency, kind: EntryKind, amount: u64) -> EconomyResult<u64> {
        let balance = self.balance_mut(currency);
        let updated = balance
            .checked_add(amount)
            .ok_or(EconomyError::Overflow { currency })?;
        *balance = updated;
        self.record(kind, currency, amount, updated);
        Ok(updated)
    }

    fn withdraw(&mut self, currency: Currency, kind: EntryKind, amount: u64) -> EconomyResult<u64> {
        let balance = self.balance_mut(currency);
        if *balance < amount {
            return Err(EconomyError::InsufficientFunds {
                currency,
                needed: amount,
                have: *balance,
            });
        }
        *balance -= amount;
        let updated = *balance;
        self.record(kind, currency, amount, updated);
        Ok(updated)
    }

    fn record(&mut self, kind: EntryKind, currency: Currency, amount: u64, balance_after: u64) {
        debug!(?kind, %currency, amount, balance_after, "Ledger updated");
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(LedgerEntry {
            kind,
            currency,
            amount,
            balance_after,
        });
    }
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn validate(amount: i64) -> EconomyResult<u64> {
    u64::try_from(amount).map_err(|_| EconomyError::InvalidAmount { amount })
}
