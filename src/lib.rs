// StakeFund - stake-backed crowdfunding engine
//
// Campaigns are proposed with a refundable stake, put to a one-address-one-vote
// challenge, and only then collect donations that the owner withdraws once the
// campaign succeeds. All fund movements pass through a single custodial ledger.

pub mod campaign;
pub mod cli;
pub mod engine;
pub mod identity;
pub mod ledger;
pub mod storage;

/// Amount in indivisible base units (10^9 per coin)
pub type Amount = u64;

/// Unix time in seconds
pub type Timestamp = u64;

pub use engine::{Engine, EngineConfig, EngineError};
