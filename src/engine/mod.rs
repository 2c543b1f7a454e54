// Engine module - THE CAMPAIGN LIFECYCLE
// Campaign store, vote ledger, challenge and funding resolvers, and withdrawals,
// all moving funds through one shared ledger

mod audit;
mod challenge;
mod config;
mod error;
mod funding;
mod store;
mod view;
mod voting;
mod withdrawal;

pub use audit::EngineSnapshot;
pub use challenge::ChallengeOutcome;
pub use config::{ConfigError, EngineConfig, DEFAULT_CHALLENGE_WINDOW_SECS, DEFAULT_MIN_STAKE};
pub use error::{EngineError, Operation};
pub use funding::FundingResolution;
pub use store::{CampaignSlot, CampaignStore};
pub use view::{CampaignActions, EngineStats};

use crate::ledger::{Ledger, LedgerSnapshot};
use crate::Amount;

/// The campaign engine
///
/// Every public operation runs under the lock of the one campaign it
/// touches, so calls on different campaigns proceed in parallel. Share it
/// across threads behind an `Arc`.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    store: CampaignStore,
    ledger: Ledger,
}

impl Engine {
    /// Create an empty engine
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            store: CampaignStore::new(),
            ledger: Ledger::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Balance of forfeited stakes
    pub fn treasury_balance(&self) -> Amount {
        self.ledger.treasury()
    }

    /// Total held by the engine
    pub fn custodial_balance(&self) -> Amount {
        self.ledger.custodial()
    }

    /// Copy of the ledger balances
    pub fn ledger(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            store: CampaignStore::new(),
            ledger: Ledger::new(),
        }
    }
}
