// Funding resolver - donations into Active campaigns and resolution to Successful

use super::{CampaignSlot, Engine, EngineError, Operation};
use crate::campaign::{CampaignId, CampaignStatus};
use crate::identity::Address;
use crate::{Amount, Timestamp};
use tracing::{debug, info};

/// Result of resolving an Active campaign
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundingResolution {
    pub collected: Amount,
    pub target: Amount,
    /// False when the deadline forced resolution short of the target
    pub target_reached: bool,
}

/// Preconditions of `donate` that do not depend on the amount
pub(crate) fn check_donate(
    slot: &CampaignSlot,
    donor: &Address,
    now: Timestamp,
) -> Result<(), EngineError> {
    let campaign = &slot.campaign;
    if campaign.status() != CampaignStatus::Active {
        return Err(EngineError::InvalidState {
            id: campaign.id(),
            status: campaign.status(),
            operation: Operation::Donate,
        });
    }
    if donor == campaign.owner() {
        return Err(EngineError::OwnerSelfDonation);
    }
    if now >= campaign.deadline() {
        return Err(EngineError::CampaignExpired {
            deadline: campaign.deadline(),
        });
    }
    Ok(())
}

/// Preconditions of `resolve_funding`, shared with the eligibility view
pub(crate) fn check_resolve_funding(
    slot: &CampaignSlot,
    now: Timestamp,
) -> Result<(), EngineError> {
    let campaign = &slot.campaign;
    if campaign.status() != CampaignStatus::Active {
        return Err(EngineError::InvalidState {
            id: campaign.id(),
            status: campaign.status(),
            operation: Operation::ResolveFunding,
        });
    }
    if !campaign.target_reached() && now < campaign.deadline() {
        return Err(EngineError::NotYetResolvable {
            collected: campaign.amount_collected(),
            target: campaign.target(),
            deadline: campaign.deadline(),
        });
    }
    Ok(())
}

impl Engine {
    /// Accept a donation into an Active campaign's escrow
    ///
    /// Returns the campaign's new collected total. Donations keep being
    /// accepted past the target until the deadline or resolution.
    pub fn donate(
        &self,
        id: CampaignId,
        donor: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Amount, EngineError> {
        let shared = self.store.slot(id)?;
        let mut slot = shared.write();
        check_donate(&slot, &donor, now)?;
        if amount == 0 {
            return Err(EngineError::InvalidAmount);
        }

        let new_total = slot
            .campaign
            .amount_collected()
            .checked_add(amount)
            .ok_or(EngineError::AmountOverflow)?;

        self.ledger.receive_donation(amount)?;
        slot.campaign.record_donation(donor, amount, new_total);

        debug!(campaign = %id, %donor, amount, collected = new_total, "donation accepted");
        Ok(new_total)
    }

    /// Move an Active campaign to Successful
    ///
    /// Allowed once the target is met or the deadline has passed. Reaching
    /// the deadline short of the target still succeeds: whatever was
    /// collected becomes withdrawable by the owner.
    pub fn resolve_funding(
        &self,
        id: CampaignId,
        now: Timestamp,
    ) -> Result<FundingResolution, EngineError> {
        let shared = self.store.slot(id)?;
        let mut slot = shared.write();
        check_resolve_funding(&slot, now)?;

        slot.campaign.set_status(CampaignStatus::Successful);

        let resolution = FundingResolution {
            collected: slot.campaign.amount_collected(),
            target: slot.campaign.target(),
            target_reached: slot.campaign.target_reached(),
        };

        info!(
            campaign = %id,
            collected = resolution.collected,
            target = resolution.target,
            target_reached = resolution.target_reached,
            "funding resolved"
        );
        Ok(resolution)
    }
}
