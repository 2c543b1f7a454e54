// Vote record - one-address-one-vote tally per campaign

use crate::identity::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Yes/no counts of a vote record
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u64,
    pub no: u64,
}

impl Tally {
    /// Ties favour the project
    pub fn approves(&self) -> bool {
        self.yes >= self.no
    }

    pub fn total(&self) -> u64 {
        self.yes + self.no
    }
}

/// Why a vote was not recorded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteRejection {
    AlreadyVoted,
    Frozen,
}

/// Voters and tally for one campaign
///
/// The owner is never admitted; the engine checks that before calling
/// [`VoteRecord::record`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    voters: BTreeSet<Address>,
    tally: Tally,
    frozen: bool,
}

impl VoteRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn has_voted(&self, voter: &Address) -> bool {
        self.voters.contains(voter)
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    pub fn voters(&self) -> impl Iterator<Item = &Address> {
        self.voters.iter()
    }

    /// Read-only after challenge resolution
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn record(&mut self, voter: Address, approve: bool) -> Result<Tally, VoteRejection> {
        if self.frozen {
            return Err(VoteRejection::Frozen);
        }
        if !self.voters.insert(voter) {
            return Err(VoteRejection::AlreadyVoted);
        }

        if approve {
            self.tally.yes += 1;
        } else {
            self.tally.no += 1;
        }
        Ok(self.tally)
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }
}
