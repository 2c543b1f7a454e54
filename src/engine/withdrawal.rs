// Withdrawal handler - pays a Successful campaign's collection to its owner once

use super::{CampaignSlot, Engine, EngineError, Operation};
use crate::campaign::{CampaignId, CampaignStatus};
use crate::ledger::Payout;
use tracing::info;

/// Preconditions of `withdraw`, shared with the eligibility view
pub(crate) fn check_withdraw(slot: &CampaignSlot) -> Result<(), EngineError> {
    let campaign = &slot.campaign;
    if campaign.status() != CampaignStatus::Successful {
        return Err(EngineError::InvalidState {
            id: campaign.id(),
            status: campaign.status(),
            operation: Operation::Withdraw,
        });
    }
    if campaign.amount_collected() == 0 || campaign.is_withdrawn() {
        return Err(EngineError::NothingToWithdraw);
    }
    Ok(())
}

impl Engine {
    /// Release everything a Successful campaign collected to its owner
    ///
    /// `amount_collected` stays as the historical total; the campaign is
    /// flagged withdrawn and `withdrawn_amount` records the payout.
    pub fn withdraw(&self, id: CampaignId) -> Result<Payout, EngineError> {
        let shared = self.store.slot(id)?;
        let mut slot = shared.write();
        check_withdraw(&slot)?;

        let owner = *slot.campaign.owner();
        let payout = self
            .ledger
            .release_escrow(owner, slot.campaign.amount_collected())?;
        slot.campaign.mark_withdrawn();

        info!(campaign = %id, %owner, amount = payout.amount, "funds withdrawn");
        Ok(payout)
    }
}
