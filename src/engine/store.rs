// Campaign store - id allocation, lookup and listing over a per-campaign locked arena

use super::{Engine, EngineError};
use crate::campaign::{Campaign, CampaignId, CampaignStatus, NewCampaign, VoteRecord};
use crate::identity::Address;
use crate::Timestamp;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// A campaign and its vote record, guarded together by one lock
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSlot {
    pub campaign: Campaign,
    pub votes: VoteRecord,
}

impl CampaignSlot {
    pub(crate) fn new(campaign: Campaign) -> Self {
        Self {
            campaign,
            votes: VoteRecord::new(),
        }
    }
}

type SharedSlot = Arc<RwLock<CampaignSlot>>;

/// Indexed arena: campaign id `n` lives at position `n`
///
/// The outer lock is only taken for writing when a campaign is appended.
/// Operations on a campaign clone its `Arc` under a short read lock and then
/// serialize on the campaign's own lock, so unrelated campaigns never
/// contend.
#[derive(Debug, Default)]
pub struct CampaignStore {
    slots: RwLock<Vec<SharedSlot>>,
}

impl CampaignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_slots(slots: Vec<CampaignSlot>) -> Self {
        Self {
            slots: RwLock::new(
                slots
                    .into_iter()
                    .map(|slot| Arc::new(RwLock::new(slot)))
                    .collect(),
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Allocate the next id and append the slot `build` returns
    ///
    /// The outer write lock is held across `build`, so ids are handed out
    /// strictly in order and a failed `build` allocates nothing.
    pub(crate) fn insert_with<F>(&self, build: F) -> Result<CampaignId, EngineError>
    where
        F: FnOnce(CampaignId) -> Result<CampaignSlot, EngineError>,
    {
        let mut slots = self.slots.write();
        let id = CampaignId::new(slots.len() as u64);
        let slot = build(id)?;
        slots.push(Arc::new(RwLock::new(slot)));
        Ok(id)
    }

    pub(crate) fn slot(&self, id: CampaignId) -> Result<SharedSlot, EngineError> {
        self.slots
            .read()
            .get(id.index())
            .cloned()
            .ok_or(EngineError::NotFound(id))
    }

    /// Snapshot of one campaign
    pub fn get(&self, id: CampaignId) -> Result<Campaign, EngineError> {
        Ok(self.slot(id)?.read().campaign.clone())
    }

    /// Snapshot of every campaign in id order
    pub fn list(&self) -> Vec<Campaign> {
        self.slots
            .read()
            .iter()
            .map(|slot| slot.read().campaign.clone())
            .collect()
    }

    /// Run `f` over a consistent cut of every slot
    ///
    /// Slot read locks are taken in id order while the arena is read-locked,
    /// matching the campaign-then-ledger order writers use.
    pub(crate) fn with_all<R>(&self, f: impl FnOnce(&[&CampaignSlot]) -> R) -> R {
        let slots = self.slots.read();
        let guards: Vec<_> = slots.iter().map(|slot| slot.read()).collect();
        let refs: Vec<&CampaignSlot> = guards.iter().map(|guard| &**guard).collect();
        f(&refs)
    }
}

impl Engine {
    // ========================================================================
    // CREATION
    // ========================================================================

    /// Propose a campaign, locking `params.stake` in custody
    pub fn create_campaign(
        &self,
        owner: Address,
        params: NewCampaign,
        now: Timestamp,
    ) -> Result<CampaignId, EngineError> {
        let minimum = self.config.min_stake;
        if params.stake < minimum {
            return Err(EngineError::InvalidStake {
                provided: params.stake,
                minimum,
            });
        }
        if params.deadline <= now {
            return Err(EngineError::InvalidDeadline {
                deadline: params.deadline,
                now,
            });
        }
        if params.target == 0 {
            return Err(EngineError::InvalidAmount);
        }

        // deadline > now, so now < MAX and the window end stays strictly after now
        let challenge_end = now.saturating_add(self.config.challenge_window);
        let stake = params.stake;

        let id = self.store.insert_with(|id| {
            self.ledger.lock_stake(stake)?;
            Ok(CampaignSlot::new(Campaign::new(
                id,
                owner,
                params,
                now,
                challenge_end,
            )))
        })?;

        info!(campaign = %id, %owner, stake, challenge_end, "campaign created");
        Ok(id)
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// Get a campaign by id
    pub fn campaign(&self, id: CampaignId) -> Result<Campaign, EngineError> {
        self.store.get(id)
    }

    /// All campaigns in creation order
    pub fn campaigns(&self) -> Vec<Campaign> {
        self.store.list()
    }

    /// Campaigns created by `owner`, in creation order
    pub fn campaigns_by_owner(&self, owner: &Address) -> Vec<Campaign> {
        self.campaigns()
            .into_iter()
            .filter(|c| c.owner() == owner)
            .collect()
    }

    /// Campaigns currently in `status`
    pub fn campaigns_with_status(&self, status: CampaignStatus) -> Vec<Campaign> {
        self.campaigns()
            .into_iter()
            .filter(|c| c.status() == status)
            .collect()
    }

    pub fn campaign_count(&self) -> usize {
        self.store.len()
    }
}
