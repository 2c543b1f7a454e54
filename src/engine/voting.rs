// Vote ledger - one vote per non-owner address while a campaign is Pending

use super::{CampaignSlot, Engine, EngineError, Operation};
use crate::campaign::{CampaignId, CampaignStatus, Tally, VoteRecord, VoteRejection};
use crate::identity::Address;
use tracing::debug;

/// Preconditions of `cast_vote`, shared with the eligibility view
pub(crate) fn check_vote(slot: &CampaignSlot, voter: &Address) -> Result<(), EngineError> {
    let campaign = &slot.campaign;
    if campaign.status() != CampaignStatus::Pending {
        return Err(EngineError::InvalidState {
            id: campaign.id(),
            status: campaign.status(),
            operation: Operation::Vote,
        });
    }
    if voter == campaign.owner() {
        return Err(EngineError::OwnerCannotVote);
    }
    if slot.votes.has_voted(voter) {
        return Err(EngineError::AlreadyVoted(*voter));
    }
    Ok(())
}

impl Engine {
    /// Record `voter`'s approval or rejection of a Pending campaign
    ///
    /// Votes are accepted until the challenge is resolved, including after
    /// `challenge_end` has passed.
    pub fn cast_vote(
        &self,
        id: CampaignId,
        voter: Address,
        approve: bool,
    ) -> Result<Tally, EngineError> {
        let shared = self.store.slot(id)?;
        let mut slot = shared.write();
        check_vote(&slot, &voter)?;

        let status = slot.campaign.status();
        let tally = slot.votes.record(voter, approve).map_err(|rejection| match rejection {
            VoteRejection::AlreadyVoted => EngineError::AlreadyVoted(voter),
            // unreachable past check_vote: only resolution freezes, and it leaves Pending
            VoteRejection::Frozen => EngineError::InvalidState {
                id,
                status,
                operation: Operation::Vote,
            },
        })?;

        debug!(campaign = %id, %voter, approve, yes = tally.yes, no = tally.no, "vote recorded");
        Ok(tally)
    }

    /// Current yes/no counts
    pub fn tally(&self, id: CampaignId) -> Result<Tally, EngineError> {
        Ok(self.store.slot(id)?.read().votes.tally())
    }

    pub fn has_voted(&self, id: CampaignId, voter: &Address) -> Result<bool, EngineError> {
        Ok(self.store.slot(id)?.read().votes.has_voted(voter))
    }

    /// Copy of the full vote record
    pub fn vote_record(&self, id: CampaignId) -> Result<VoteRecord, EngineError> {
        Ok(self.store.slot(id)?.read().votes.clone())
    }
}
