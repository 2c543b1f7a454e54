// CLI module - the command-line front end over a sled data directory

mod amount;
mod args;

pub use amount::{format_coins, parse_coins, UNITS_PER_COIN};
pub use args::{parse_time, AccountCommand, Cli, Command, CreateArgs};

use crate::campaign::{Campaign, CampaignId, NewCampaign};
use crate::engine::{ChallengeOutcome, Engine, EngineConfig, EngineError};
use crate::identity::{Address, Keypair};
use crate::storage::{EngineStore, StoreError};
use crate::Timestamp;
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use thiserror::Error;
use tracing::debug;

const SECS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Data directory not initialised; run `stakefund init` first")]
    NotInitialized,

    #[error("Data directory already initialised")]
    AlreadyInitialized,

    #[error("Unknown account '{0}'")]
    UnknownAccount(String),

    #[error("Account '{0}' already exists")]
    AccountExists(String),

    #[error("Deadline overflows")]
    DeadlineOverflow,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Output failed: {0}")]
    Io(#[from] io::Error),
}

/// Current wall-clock time in Unix seconds
pub fn clock_now() -> Timestamp {
    Timestamp::try_from(Utc::now().timestamp()).unwrap_or(0)
}

fn format_time(ts: Timestamp) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// Open the data directory named by `cli` and execute its command
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<(), CliError> {
    let now = cli.now.unwrap_or_else(clock_now);
    let store = EngineStore::open(&cli.data_dir)?;
    debug!(data_dir = %cli.data_dir.display(), now, "opened data directory");

    let session = Session { store, now };
    session.execute(cli.command, out)
}

struct Session {
    store: EngineStore,
    now: Timestamp,
}

impl Session {
    fn engine(&self) -> Result<Engine, CliError> {
        self.store.load_engine()?.ok_or(CliError::NotInitialized)
    }

    fn address_of(&self, label: &str) -> Result<Address, CliError> {
        self.store
            .load_keypair_with_label(label)?
            .map(|kp| kp.address())
            .ok_or_else(|| CliError::UnknownAccount(label.to_string()))
    }

    /// Audit, persist and flush after a mutating command
    fn commit(&self, engine: &Engine) -> Result<(), CliError> {
        engine.audit()?;
        self.store.save_engine(engine)?;
        self.store.flush()?;
        Ok(())
    }

    fn execute(&self, command: Command, out: &mut dyn Write) -> Result<(), CliError> {
        match command {
            Command::Init {
                min_stake,
                challenge_window,
            } => {
                if self.store.load_engine()?.is_some() {
                    return Err(CliError::AlreadyInitialized);
                }
                let mut config = EngineConfig::new().with_challenge_window(challenge_window);
                if let Some(min_stake) = min_stake {
                    config = config.with_min_stake(min_stake);
                }
                let engine = Engine::new(config)?;
                self.commit(&engine)?;
                writeln!(
                    out,
                    "initialised: min stake {}, challenge window {}s",
                    format_coins(engine.config().min_stake),
                    engine.config().challenge_window
                )?;
            }

            Command::Account(AccountCommand::New { label }) => {
                if self.store.load_keypair_with_label(&label)?.is_some() {
                    return Err(CliError::AccountExists(label));
                }
                let keypair = Keypair::generate();
                self.store.save_keypair_with_label(&keypair, &label)?;
                self.store.flush()?;
                writeln!(out, "{} {}", label, keypair.address())?;
            }

            Command::Account(AccountCommand::List) => {
                for label in self.store.list_account_labels()? {
                    writeln!(out, "{} {}", label, self.address_of(&label)?)?;
                }
            }

            Command::Create(args) => {
                let engine = self.engine()?;
                let owner = self.address_of(&args.caller)?;
                let deadline = match (args.deadline, args.days) {
                    (Some(deadline), _) => deadline,
                    (None, days) => days
                        .unwrap_or(0)
                        .checked_mul(SECS_PER_DAY)
                        .and_then(|secs| self.now.checked_add(secs))
                        .ok_or(CliError::DeadlineOverflow)?,
                };
                let stake = args.stake.unwrap_or(engine.config().min_stake);
                let params = NewCampaign::new(args.title, args.target, deadline, stake)
                    .with_description(args.description);

                let id = engine.create_campaign(owner, params, self.now)?;
                self.commit(&engine)?;
                writeln!(out, "created campaign {}", id.value())?;
            }

            Command::Vote { id, caller, reject } => {
                let engine = self.engine()?;
                let voter = self.address_of(&caller)?;
                let tally = engine.cast_vote(CampaignId::new(id), voter, !reject)?;
                self.commit(&engine)?;
                writeln!(out, "vote recorded: {} yes / {} no", tally.yes, tally.no)?;
            }

            Command::ResolveChallenge { id } => {
                let engine = self.engine()?;
                let outcome = engine.resolve_challenge(CampaignId::new(id), self.now)?;
                self.commit(&engine)?;
                write_outcome(out, id, &outcome)?;
            }

            Command::Activate { id } => {
                let engine = self.engine()?;
                let outcome = engine.activate_campaign(CampaignId::new(id), self.now)?;
                self.commit(&engine)?;
                write_outcome(out, id, &outcome)?;
            }

            Command::Donate { id, amount, caller } => {
                let engine = self.engine()?;
                let donor = self.address_of(&caller)?;
                let total = engine.donate(CampaignId::new(id), donor, amount, self.now)?;
                self.commit(&engine)?;
                writeln!(out, "donated {}; collected {}", format_coins(amount), format_coins(total))?;
            }

            Command::ResolveFunding { id } => {
                let engine = self.engine()?;
                let resolution = engine.resolve_funding(CampaignId::new(id), self.now)?;
                self.commit(&engine)?;
                writeln!(
                    out,
                    "campaign {} is Successful; collected {} of {}",
                    id,
                    format_coins(resolution.collected),
                    format_coins(resolution.target)
                )?;
            }

            Command::Withdraw { id } => {
                let engine = self.engine()?;
                let payout = engine.withdraw(CampaignId::new(id))?;
                self.commit(&engine)?;
                writeln!(out, "paid {} to {}", format_coins(payout.amount), payout.to)?;
            }

            Command::List { owner } => {
                let engine = self.engine()?;
                let campaigns = match owner {
                    Some(label) => engine.campaigns_by_owner(&self.address_of(&label)?),
                    None => engine.campaigns(),
                };
                for campaign in &campaigns {
                    write_summary(out, campaign)?;
                }
            }

            Command::Show { id, caller } => {
                let engine = self.engine()?;
                let id = CampaignId::new(id);
                let campaign = engine.campaign(id)?;
                let tally = engine.tally(id)?;
                write_details(out, &campaign)?;
                writeln!(out, "votes:       {} yes / {} no", tally.yes, tally.no)?;
                if let Some(label) = caller {
                    let actions = engine.available_actions(id, &self.address_of(&label)?, self.now)?;
                    writeln!(out, "actions for {}: {:?}", label, actions)?;
                }
            }

            Command::Treasury => {
                let engine = self.engine()?;
                writeln!(out, "treasury {}", format_coins(engine.treasury_balance()))?;
            }

            Command::Stats => {
                let stats = self.engine()?.stats();
                writeln!(
                    out,
                    "campaigns {} (pending {}, active {}, failed {}, successful {})",
                    stats.campaigns(),
                    stats.pending,
                    stats.active,
                    stats.failed,
                    stats.successful
                )?;
                writeln!(
                    out,
                    "raised {}, withdrawn {}, treasury {}, custodial {}",
                    format_coins(stats.total_raised),
                    format_coins(stats.total_withdrawn),
                    format_coins(stats.treasury),
                    format_coins(stats.custodial)
                )?;
            }
        }
        Ok(())
    }
}

fn write_outcome(out: &mut dyn Write, id: u64, outcome: &ChallengeOutcome) -> io::Result<()> {
    match outcome {
        ChallengeOutcome::Activated { refund, .. } => writeln!(
            out,
            "campaign {} is Active; stake {} refunded to {}",
            id,
            format_coins(refund.amount),
            refund.to
        ),
        ChallengeOutcome::Rejected { forfeited, .. } => writeln!(
            out,
            "campaign {} Failed; stake {} forfeited to treasury",
            id,
            format_coins(*forfeited)
        ),
    }
}

fn write_summary(out: &mut dyn Write, campaign: &Campaign) -> io::Result<()> {
    writeln!(
        out,
        "{:>4}  {:<10}  {} / {}  {}",
        campaign.id().value(),
        campaign.status().to_string(),
        format_coins(campaign.amount_collected()),
        format_coins(campaign.target()),
        campaign.title()
    )
}

fn write_details(out: &mut dyn Write, campaign: &Campaign) -> io::Result<()> {
    writeln!(out, "campaign:    {}", campaign.id().value())?;
    writeln!(out, "title:       {}", campaign.title())?;
    if !campaign.description().is_empty() {
        writeln!(out, "description: {}", campaign.description())?;
    }
    writeln!(out, "owner:       {}", campaign.owner())?;
    writeln!(out, "status:      {}", campaign.status())?;
    writeln!(out, "target:      {}", format_coins(campaign.target()))?;
    writeln!(out, "collected:   {}", format_coins(campaign.amount_collected()))?;
    writeln!(out, "stake:       {}", format_coins(campaign.stake()))?;
    writeln!(out, "challenge:   until {}", format_time(campaign.challenge_end()))?;
    writeln!(out, "deadline:    {}", format_time(campaign.deadline()))?;
    if campaign.is_withdrawn() {
        writeln!(out, "withdrawn:   {}", format_coins(campaign.withdrawn_amount()))?;
    }
    for donation in campaign.donors() {
        writeln!(out, "  donor {} {}", donation.donor, format_coins(donation.amount))?;
    }
    Ok(())
}
