// Conservation audit and consistent snapshots of the whole engine

use super::{CampaignSlot, CampaignStore, Engine, EngineConfig, EngineError};
use crate::campaign::CampaignStatus;
use crate::ledger::{Ledger, LedgerSnapshot};
use crate::Amount;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Everything needed to rebuild an engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub config: EngineConfig,
    pub campaigns: Vec<CampaignSlot>,
    pub ledger: LedgerSnapshot,
}

impl EngineSnapshot {
    /// Serialize to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        postcard::to_allocvec(self).map_err(|e| EngineError::Snapshot(e.to_string()))
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        postcard::from_bytes(bytes).map_err(|e| EngineError::Snapshot(e.to_string()))
    }
}

fn violation(msg: String) -> EngineError {
    EngineError::InvariantViolation(msg)
}

/// Check every per-campaign and global invariant over one consistent cut
fn audit_cut(slots: &[&CampaignSlot], ledger: &LedgerSnapshot) -> Result<(), EngineError> {
    let mut locked: Amount = 0;
    let mut escrowed: Amount = 0;

    for (index, slot) in slots.iter().enumerate() {
        let campaign = &slot.campaign;
        let id = campaign.id();
        let status = campaign.status();

        if id.index() != index {
            return Err(violation(format!("campaign {} stored at position {}", id, index)));
        }

        match status {
            CampaignStatus::Pending if campaign.stake() == 0 => {
                return Err(violation(format!("pending campaign {} has no stake", id)));
            }
            CampaignStatus::Pending => {}
            _ if campaign.stake() != 0 => {
                return Err(violation(format!("{} campaign {} still holds stake", status, id)));
            }
            _ => {}
        }

        if slot.votes.is_frozen() == (status == CampaignStatus::Pending) {
            return Err(violation(format!("vote record of {} campaign {} frozen mismatch", status, id)));
        }
        let tally = slot.votes.tally();
        if tally.total() != slot.votes.voter_count() as u64 {
            return Err(violation(format!("tally of campaign {} does not match voters", id)));
        }
        if slot.votes.has_voted(campaign.owner()) {
            return Err(violation(format!("owner voted on campaign {}", id)));
        }

        if campaign.donor_total() != Some(campaign.amount_collected()) {
            return Err(violation(format!("donor list of campaign {} does not sum to collected", id)));
        }
        if campaign.amount_collected() > 0
            && !matches!(status, CampaignStatus::Active | CampaignStatus::Successful)
        {
            return Err(violation(format!("{} campaign {} has collections", status, id)));
        }
        if campaign.is_withdrawn()
            && (status != CampaignStatus::Successful
                || campaign.withdrawn_amount() != campaign.amount_collected())
        {
            return Err(violation(format!("campaign {} withdrawal record inconsistent", id)));
        }

        locked = locked
            .checked_add(campaign.stake())
            .ok_or(EngineError::AmountOverflow)?;
        escrowed = escrowed
            .checked_add(campaign.escrowed())
            .ok_or(EngineError::AmountOverflow)?;
    }

    if locked != ledger.locked_stake {
        return Err(violation(format!(
            "locked stakes {} != ledger locked stake {}",
            locked, ledger.locked_stake
        )));
    }
    if escrowed != ledger.escrow {
        return Err(violation(format!(
            "escrowed collections {} != ledger escrow {}",
            escrowed, ledger.escrow
        )));
    }

    let expected = locked
        .checked_add(escrowed)
        .and_then(|v| v.checked_add(ledger.treasury))
        .ok_or(EngineError::AmountOverflow)?;
    if ledger.custodial() != expected {
        return Err(violation(format!(
            "custodial {} != stakes + escrow + treasury {}",
            ledger.custodial(),
            expected
        )));
    }

    Ok(())
}

impl Engine {
    /// Verify that campaign records and ledger balances agree
    pub fn audit(&self) -> Result<(), EngineError> {
        self.store
            .with_all(|slots| audit_cut(slots, &self.ledger.snapshot()))
    }

    /// Copy of the whole engine taken under every campaign lock
    pub fn snapshot(&self) -> EngineSnapshot {
        self.store.with_all(|slots| EngineSnapshot {
            config: self.config.clone(),
            campaigns: slots.iter().map(|slot| (*slot).clone()).collect(),
            ledger: self.ledger.snapshot(),
        })
    }

    /// Rebuild an engine, rejecting snapshots that fail the audit
    pub fn restore(snapshot: EngineSnapshot) -> Result<Self, EngineError> {
        snapshot.config.validate()?;

        let refs: Vec<&CampaignSlot> = snapshot.campaigns.iter().collect();
        if let Err(e) = audit_cut(&refs, &snapshot.ledger) {
            warn!(error = %e, "rejecting snapshot");
            return Err(e);
        }

        Ok(Self {
            config: snapshot.config,
            store: CampaignStore::from_slots(snapshot.campaigns),
            ledger: Ledger::from_snapshot(snapshot.ledger),
        })
    }
}
