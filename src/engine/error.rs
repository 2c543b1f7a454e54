// Engine errors - every variant is a rejection made before any state changes

use crate::campaign::{CampaignId, CampaignStatus};
use crate::engine::ConfigError;
use crate::identity::Address;
use crate::ledger::LedgerError;
use crate::{Amount, Timestamp};
use std::fmt;
use thiserror::Error;

/// Mutating operation named in `InvalidState` rejections
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Vote,
    ResolveChallenge,
    Donate,
    ResolveFunding,
    Withdraw,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Vote => "vote on",
            Operation::ResolveChallenge => "resolve challenge of",
            Operation::Donate => "donate to",
            Operation::ResolveFunding => "resolve funding of",
            Operation::Withdraw => "withdraw from",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Campaign {0} not found")]
    NotFound(CampaignId),

    #[error("Cannot {operation} campaign {id} while it is {status}")]
    InvalidState {
        id: CampaignId,
        status: CampaignStatus,
        operation: Operation,
    },

    #[error("Stake below minimum: provided {provided}, minimum {minimum}")]
    InvalidStake { provided: Amount, minimum: Amount },

    #[error("Deadline {deadline} is not in the future (now {now})")]
    InvalidDeadline { deadline: Timestamp, now: Timestamp },

    #[error("Owner cannot vote")]
    OwnerCannotVote,

    #[error("Address {0} already voted")]
    AlreadyVoted(Address),

    #[error("Owner cannot donate to themselves")]
    OwnerSelfDonation,

    #[error("Campaign expired at {deadline}")]
    CampaignExpired { deadline: Timestamp },

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Challenge window open until {challenge_end}")]
    ChallengeNotEnded { challenge_end: Timestamp },

    #[error("Not yet resolvable: collected {collected} of {target}, deadline {deadline}")]
    NotYetResolvable {
        collected: Amount,
        target: Amount,
        deadline: Timestamp,
    },

    #[error("Nothing to withdraw")]
    NothingToWithdraw,

    #[error("Amount overflow")]
    AmountOverflow,

    #[error("Ledger error: {0}")]
    Ledger(LedgerError),

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Snapshot encoding failed: {0}")]
    Snapshot(String),
}

impl From<LedgerError> for EngineError {
    fn from(err: LedgerError) -> Self {
        match err {
            // custodial total overflow is the same rejection as a campaign total overflow
            LedgerError::Overflow => EngineError::AmountOverflow,
            other => EngineError::Ledger(other),
        }
    }
}
