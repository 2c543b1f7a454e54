// Ledger module - CUSTODY ACCOUNTING
// Tracks the engine's custodial balance split into stake, escrow and treasury buckets

mod balances;

pub use balances::{Bucket, Ledger, LedgerError, LedgerSnapshot, Payout, PayoutReason};
