// Custodial ledger - the engine's balance and the buckets that must sum to it

use crate::identity::Address;
use crate::Amount;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Sub-balance of the custodial balance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bucket {
    /// Stakes of Pending campaigns
    LockedStake,
    /// Donations held for Active/Successful campaigns
    Escrow,
    /// Forfeited stakes
    Treasury,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::LockedStake => write!(f, "locked stake"),
            Bucket::Escrow => write!(f, "escrow"),
            Bucket::Treasury => write!(f, "treasury"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient funds in {bucket}: available {available}, required {required}")]
    InsufficientFunds {
        bucket: Bucket,
        available: Amount,
        required: Amount,
    },

    #[error("Ledger balance would overflow")]
    Overflow,
}

/// Why funds left custody
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutReason {
    StakeRefund,
    Withdrawal,
}

/// An external payment made by the engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub to: Address,
    pub amount: Amount,
    pub reason: PayoutReason,
}

/// Point-in-time copy of every ledger balance
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub locked_stake: Amount,
    pub escrow: Amount,
    pub treasury: Amount,
    /// Running total paid out per address
    pub paid: BTreeMap<Address, Amount>,
}

impl LedgerSnapshot {
    /// Total held by the engine
    ///
    /// Saturates rather than failing; every bucket mutation is checked so the
    /// sum of a live ledger never exceeds `Amount::MAX`.
    pub fn custodial(&self) -> Amount {
        self.locked_stake
            .saturating_add(self.escrow)
            .saturating_add(self.treasury)
    }

    /// Total paid out to an address so far
    pub fn paid_to(&self, address: &Address) -> Amount {
        self.paid.get(address).copied().unwrap_or(0)
    }

    /// Total ever paid out of custody
    pub fn total_paid(&self) -> Amount {
        self.paid.values().fold(0, |acc, v| acc.saturating_add(*v))
    }
}

/// Thin invariant-checked accumulator shared by every campaign
///
/// All buckets live behind one mutex, so each call moves funds atomically and
/// `custodial() == locked_stake + escrow + treasury` holds at every observable
/// point. Callers lock a campaign first and the ledger second, never the
/// reverse.
#[derive(Debug, Default)]
pub struct Ledger {
    inner: Mutex<LedgerSnapshot>,
}

fn credit(balance: &mut Amount, amount: Amount) -> Result<(), LedgerError> {
    *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
    Ok(())
}

fn debit(bucket: Bucket, balance: &mut Amount, amount: Amount) -> Result<(), LedgerError> {
    *balance = balance
        .checked_sub(amount)
        .ok_or(LedgerError::InsufficientFunds {
            bucket,
            available: *balance,
            required: amount,
        })?;
    Ok(())
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from a snapshot
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    /// Copy of all balances, taken under the ledger lock
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.lock().clone()
    }

    // ========================================================================
    // BALANCE QUERIES
    // ========================================================================

    /// Total held by the engine
    pub fn custodial(&self) -> Amount {
        self.inner.lock().custodial()
    }

    pub fn locked_stake(&self) -> Amount {
        self.inner.lock().locked_stake
    }

    pub fn escrow(&self) -> Amount {
        self.inner.lock().escrow
    }

    pub fn treasury(&self) -> Amount {
        self.inner.lock().treasury
    }

    /// Total paid out to an address so far
    pub fn paid_to(&self, address: &Address) -> Amount {
        self.inner.lock().paid_to(address)
    }

    // ========================================================================
    // FUND MOVEMENTS
    // ========================================================================

    /// Stake received from a campaign owner
    pub fn lock_stake(&self, amount: Amount) -> Result<(), LedgerError> {
        let mut state = self.inner.lock();
        Self::ensure_headroom(&state, amount)?;
        credit(&mut state.locked_stake, amount)
    }

    /// Return a stake to its owner
    pub fn release_stake(&self, to: Address, amount: Amount) -> Result<Payout, LedgerError> {
        let mut state = self.inner.lock();
        Self::pay_out(&mut state, Bucket::LockedStake, to, amount, PayoutReason::StakeRefund)
    }

    /// Move a stake into the treasury; custodial balance is unchanged
    pub fn forfeit_stake(&self, amount: Amount) -> Result<(), LedgerError> {
        let mut state = self.inner.lock();
        let mut treasury = state.treasury;
        credit(&mut treasury, amount)?;
        debit(Bucket::LockedStake, &mut state.locked_stake, amount)?;
        state.treasury = treasury;
        Ok(())
    }

    /// Donation received into campaign escrow
    pub fn receive_donation(&self, amount: Amount) -> Result<(), LedgerError> {
        let mut state = self.inner.lock();
        Self::ensure_headroom(&state, amount)?;
        credit(&mut state.escrow, amount)
    }

    /// Pay collected donations out of escrow
    pub fn release_escrow(&self, to: Address, amount: Amount) -> Result<Payout, LedgerError> {
        let mut state = self.inner.lock();
        Self::pay_out(&mut state, Bucket::Escrow, to, amount, PayoutReason::Withdrawal)
    }

    fn ensure_headroom(state: &LedgerSnapshot, amount: Amount) -> Result<(), LedgerError> {
        state
            .locked_stake
            .checked_add(state.escrow)
            .and_then(|v| v.checked_add(state.treasury))
            .and_then(|v| v.checked_add(amount))
            .map(|_| ())
            .ok_or(LedgerError::Overflow)
    }

    fn pay_out(
        state: &mut LedgerSnapshot,
        bucket: Bucket,
        to: Address,
        amount: Amount,
        reason: PayoutReason,
    ) -> Result<Payout, LedgerError> {
        let paid_before = state.paid.get(&to).copied().unwrap_or(0);
        let paid_after = paid_before.checked_add(amount).ok_or(LedgerError::Overflow)?;

        let balance = match bucket {
            Bucket::LockedStake => &mut state.locked_stake,
            Bucket::Escrow => &mut state.escrow,
            Bucket::Treasury => &mut state.treasury,
        };
        debit(bucket, balance, amount)?;
        state.paid.insert(to, paid_after);

        Ok(Payout { to, amount, reason })
    }
}
