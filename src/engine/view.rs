// Read-only views for front ends: eligibility flags and aggregate statistics

use super::challenge::check_resolve_challenge;
use super::funding::{check_donate, check_resolve_funding};
use super::voting::check_vote;
use super::withdrawal::check_withdraw;
use super::{Engine, EngineError};
use crate::campaign::{CampaignId, CampaignStatus};
use crate::identity::Address;
use crate::{Amount, Timestamp};
use serde::{Deserialize, Serialize};

/// Which operations would currently pass their preconditions for a caller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignActions {
    pub can_vote: bool,
    pub can_resolve_challenge: bool,
    /// A positive amount passes the state, owner and deadline checks
    pub can_donate: bool,
    pub can_resolve_funding: bool,
    pub can_withdraw: bool,
}

/// Aggregate figures across every campaign
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub pending: usize,
    pub active: usize,
    pub failed: usize,
    pub successful: usize,
    /// Sum of `amount_collected` over every campaign
    pub total_raised: Amount,
    pub total_withdrawn: Amount,
    pub treasury: Amount,
    pub custodial: Amount,
}

impl EngineStats {
    pub fn campaigns(&self) -> usize {
        self.pending + self.active + self.failed + self.successful
    }
}

impl Engine {
    /// Eligibility flags for `caller` on campaign `id` at time `now`
    pub fn available_actions(
        &self,
        id: CampaignId,
        caller: &Address,
        now: Timestamp,
    ) -> Result<CampaignActions, EngineError> {
        let shared = self.store.slot(id)?;
        let slot = shared.read();

        Ok(CampaignActions {
            can_vote: check_vote(&slot, caller).is_ok(),
            can_resolve_challenge: check_resolve_challenge(&slot, now).is_ok(),
            can_donate: check_donate(&slot, caller, now).is_ok(),
            can_resolve_funding: check_resolve_funding(&slot, now).is_ok(),
            can_withdraw: check_withdraw(&slot).is_ok(),
        })
    }

    /// Counts per status and money totals over a consistent cut
    pub fn stats(&self) -> EngineStats {
        self.store.with_all(|slots| {
            let mut stats = EngineStats::default();
            for slot in slots {
                let campaign = &slot.campaign;
                match campaign.status() {
                    CampaignStatus::Pending => stats.pending += 1,
                    CampaignStatus::Active => stats.active += 1,
                    CampaignStatus::Failed => stats.failed += 1,
                    CampaignStatus::Successful => stats.successful += 1,
                }
                stats.total_raised = stats.total_raised.saturating_add(campaign.amount_collected());
                stats.total_withdrawn =
                    stats.total_withdrawn.saturating_add(campaign.withdrawn_amount());
            }
            let ledger = self.ledger.snapshot();
            stats.treasury = ledger.treasury;
            stats.custodial = ledger.custodial();
            stats
        })
    }
}
