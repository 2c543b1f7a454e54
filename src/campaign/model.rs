// Campaign record - the central entity the engine drives through its lifecycle

use crate::identity::Address;
use crate::{Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically assigned campaign identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CampaignId(u64);

impl CampaignId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Position in the store's arena
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status
///
/// ```text
/// Pending --(yes >= no)--> Active --> Successful --(withdraw)--> Successful(withdrawn)
/// Pending --(no > yes)---> Failed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    Pending,
    Active,
    Failed,
    Successful,
}

impl CampaignStatus {
    /// Whether `self -> next` is an edge of the transition graph
    pub fn can_transition_to(self, next: CampaignStatus) -> bool {
        matches!(
            (self, next),
            (CampaignStatus::Pending, CampaignStatus::Active)
                | (CampaignStatus::Pending, CampaignStatus::Failed)
                | (CampaignStatus::Active, CampaignStatus::Successful)
        )
    }

    /// No further status change is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, CampaignStatus::Failed | CampaignStatus::Successful)
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CampaignStatus::Pending => "Pending",
            CampaignStatus::Active => "Active",
            CampaignStatus::Failed => "Failed",
            CampaignStatus::Successful => "Successful",
        };
        f.write_str(name)
    }
}

/// One accepted donation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub donor: Address,
    pub amount: Amount,
}

/// Parameters of a campaign proposal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub target: Amount,
    pub deadline: Timestamp,
    pub stake: Amount,
}

impl NewCampaign {
    pub fn new(title: impl Into<String>, target: Amount, deadline: Timestamp, stake: Amount) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            target,
            deadline,
            stake,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A funding campaign
///
/// Fields are read-only outside the crate; every mutation goes through the
/// engine operations, which hold this campaign's lock while they run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    id: CampaignId,
    owner: Address,
    title: String,
    description: String,
    target: Amount,
    deadline: Timestamp,
    created_at: Timestamp,
    challenge_end: Timestamp,
    stake: Amount,
    amount_collected: Amount,
    withdrawn_amount: Amount,
    withdrawn: bool,
    status: CampaignStatus,
    donors: Vec<Donation>,
}

impl Campaign {
    pub(crate) fn new(
        id: CampaignId,
        owner: Address,
        params: NewCampaign,
        created_at: Timestamp,
        challenge_end: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            title: params.title,
            description: params.description,
            target: params.target,
            deadline: params.deadline,
            created_at,
            challenge_end,
            stake: params.stake,
            amount_collected: 0,
            withdrawn_amount: 0,
            withdrawn: false,
            status: CampaignStatus::Pending,
            donors: Vec::new(),
        }
    }

    pub fn id(&self) -> CampaignId {
        self.id
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn target(&self) -> Amount {
        self.target
    }

    pub fn deadline(&self) -> Timestamp {
        self.deadline
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// End of the voting window
    pub fn challenge_end(&self) -> Timestamp {
        self.challenge_end
    }

    /// Stake still locked; zero once the challenge is resolved
    pub fn stake(&self) -> Amount {
        self.stake
    }

    /// Total raised, kept after withdrawal
    pub fn amount_collected(&self) -> Amount {
        self.amount_collected
    }

    pub fn withdrawn_amount(&self) -> Amount {
        self.withdrawn_amount
    }

    pub fn is_withdrawn(&self) -> bool {
        self.withdrawn
    }

    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    /// Donations in the order they were accepted
    pub fn donors(&self) -> &[Donation] {
        &self.donors
    }

    /// Collected funds still held in escrow
    pub fn escrowed(&self) -> Amount {
        if self.withdrawn {
            0
        } else {
            self.amount_collected
        }
    }

    pub fn target_reached(&self) -> bool {
        self.amount_collected >= self.target
    }

    /// Sum of the donor list, `None` on overflow
    pub fn donor_total(&self) -> Option<Amount> {
        self.donors
            .iter()
            .try_fold(0 as Amount, |acc, d| acc.checked_add(d.amount))
    }

    // ========================================================================
    // ENGINE-ONLY MUTATIONS
    // ========================================================================

    pub(crate) fn set_status(&mut self, next: CampaignStatus) {
        debug_assert!(self.status.can_transition_to(next), "{} -> {}", self.status, next);
        self.status = next;
    }

    /// Zero the stake, returning what was locked
    pub(crate) fn take_stake(&mut self) -> Amount {
        std::mem::take(&mut self.stake)
    }

    pub(crate) fn record_donation(&mut self, donor: Address, amount: Amount, new_total: Amount) {
        self.donors.push(Donation { donor, amount });
        self.amount_collected = new_total;
    }

    pub(crate) fn mark_withdrawn(&mut self) {
        self.withdrawn_amount = self.amount_collected;
        self.withdrawn = true;
    }
}
