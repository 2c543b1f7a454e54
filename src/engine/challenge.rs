// Challenge resolver - moves a Pending campaign to Active or Failed once voting closes

use super::{CampaignSlot, Engine, EngineError, Operation};
use crate::campaign::{CampaignId, CampaignStatus, Tally};
use crate::ledger::Payout;
use crate::{Amount, Timestamp};
use tracing::info;

/// Result of resolving a challenge
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// Approved; the stake went back to the owner
    Activated { tally: Tally, refund: Payout },
    /// Rejected; the stake went to the treasury
    Rejected { tally: Tally, forfeited: Amount },
}

impl ChallengeOutcome {
    pub fn status(&self) -> CampaignStatus {
        match self {
            ChallengeOutcome::Activated { .. } => CampaignStatus::Active,
            ChallengeOutcome::Rejected { .. } => CampaignStatus::Failed,
        }
    }

    pub fn tally(&self) -> Tally {
        match self {
            ChallengeOutcome::Activated { tally, .. } | ChallengeOutcome::Rejected { tally, .. } => {
                *tally
            }
        }
    }
}

/// Preconditions of `resolve_challenge`, shared with the eligibility view
pub(crate) fn check_resolve_challenge(
    slot: &CampaignSlot,
    now: Timestamp,
) -> Result<(), EngineError> {
    let campaign = &slot.campaign;
    if campaign.status() != CampaignStatus::Pending {
        return Err(EngineError::InvalidState {
            id: campaign.id(),
            status: campaign.status(),
            operation: Operation::ResolveChallenge,
        });
    }
    if now <= campaign.challenge_end() {
        return Err(EngineError::ChallengeNotEnded {
            challenge_end: campaign.challenge_end(),
        });
    }
    Ok(())
}

impl Engine {
    /// Close the voting window of a Pending campaign
    ///
    /// `yes >= no` activates the campaign and refunds the stake to the owner;
    /// otherwise the campaign fails and the stake is forfeited to the
    /// treasury. Either way the stake is zeroed and the vote record frozen.
    /// A second call fails with `InvalidState`.
    pub fn resolve_challenge(
        &self,
        id: CampaignId,
        now: Timestamp,
    ) -> Result<ChallengeOutcome, EngineError> {
        let shared = self.store.slot(id)?;
        let mut guard = shared.write();
        check_resolve_challenge(&guard, now)?;

        let CampaignSlot { campaign, votes } = &mut *guard;
        let tally = votes.tally();
        let stake = campaign.stake();

        // ledger first: if it rejects, the campaign is untouched
        let outcome = if tally.approves() {
            let refund = self.ledger.release_stake(*campaign.owner(), stake)?;
            campaign.set_status(CampaignStatus::Active);
            ChallengeOutcome::Activated { tally, refund }
        } else {
            self.ledger.forfeit_stake(stake)?;
            campaign.set_status(CampaignStatus::Failed);
            ChallengeOutcome::Rejected {
                tally,
                forfeited: stake,
            }
        };
        campaign.take_stake();
        votes.freeze();

        info!(
            campaign = %id,
            status = %outcome.status(),
            yes = tally.yes,
            no = tally.no,
            stake,
            "challenge resolved"
        );
        Ok(outcome)
    }

    /// Alias of [`Engine::resolve_challenge`]
    ///
    /// Front ends expose a separate "activate" action with the same
    /// preconditions; it runs the same resolution, so a rejected vote still
    /// fails the campaign.
    pub fn activate_campaign(
        &self,
        id: CampaignId,
        now: Timestamp,
    ) -> Result<ChallengeOutcome, EngineError> {
        self.resolve_challenge(id, now)
    }
}
