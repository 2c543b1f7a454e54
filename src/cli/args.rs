// Command-line arguments

use crate::cli::amount::parse_coins;
use crate::engine::DEFAULT_CHALLENGE_WINDOW_SECS;
use crate::{Amount, Timestamp};
use chrono::DateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// StakeFund
///
/// Stake-backed crowdfunding with community challenge voting, kept in a
/// local data directory. Amounts are decimal coins.
#[derive(Debug, Parser)]
#[command(name = "stakefund", version)]
pub struct Cli {
    /// Directory holding engine state and local accounts
    #[arg(long, global = true, default_value = "./stakefund-data", value_name = "DIR")]
    pub data_dir: PathBuf,

    /// Evaluate time-dependent rules at this instant instead of the clock
    /// (RFC 3339 or Unix seconds)
    #[arg(long, global = true, value_name = "TIME", value_parser = parse_time)]
    pub now: Option<Timestamp>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialise a fresh data directory
    Init {
        /// Minimum campaign stake [default: 0.01]
        #[arg(long, value_parser = parse_coins)]
        min_stake: Option<Amount>,

        /// Voting window length in seconds
        #[arg(long, default_value_t = DEFAULT_CHALLENGE_WINDOW_SECS, value_name = "SECS")]
        challenge_window: u64,
    },

    /// Manage local accounts
    #[command(subcommand)]
    Account(AccountCommand),

    /// Propose a campaign, locking a stake
    Create(CreateArgs),

    /// Vote on a pending campaign
    Vote {
        id: u64,
        /// Voting account
        #[arg(long = "as", value_name = "LABEL")]
        caller: String,
        /// Vote against instead of for
        #[arg(long)]
        reject: bool,
    },

    /// Close the voting window of a pending campaign
    ResolveChallenge { id: u64 },

    /// Same as resolve-challenge
    Activate { id: u64 },

    /// Donate to an active campaign
    Donate {
        id: u64,
        #[arg(value_parser = parse_coins)]
        amount: Amount,
        /// Donating account
        #[arg(long = "as", value_name = "LABEL")]
        caller: String,
    },

    /// Mark an active campaign successful
    ResolveFunding { id: u64 },

    /// Pay a successful campaign's collection to its owner
    Withdraw { id: u64 },

    /// List campaigns
    List {
        /// Only campaigns owned by this account
        #[arg(long, value_name = "LABEL")]
        owner: Option<String>,
    },

    /// Show one campaign
    Show {
        id: u64,
        /// Also show which actions this account may take
        #[arg(long = "as", value_name = "LABEL")]
        caller: Option<String>,
    },

    /// Show the treasury balance
    Treasury,

    /// Show aggregate statistics
    Stats,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Generate a keypair under a new label
    New { label: String },
    /// List local accounts and their addresses
    List,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Owning account
    #[arg(long = "as", value_name = "LABEL")]
    pub caller: String,

    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Funding target
    #[arg(long, value_parser = parse_coins)]
    pub target: Amount,

    /// Absolute deadline (RFC 3339 or Unix seconds)
    #[arg(long, value_parser = parse_time, conflicts_with = "days", required_unless_present = "days")]
    pub deadline: Option<Timestamp>,

    /// Deadline as days from now
    #[arg(long)]
    pub days: Option<u64>,

    /// Stake to lock; defaults to the configured minimum
    #[arg(long, value_parser = parse_coins)]
    pub stake: Option<Amount>,
}

/// Parse RFC 3339 or plain Unix seconds
pub fn parse_time(s: &str) -> Result<Timestamp, String> {
    if let Ok(secs) = s.parse::<Timestamp>() {
        return Ok(secs);
    }
    let parsed = DateTime::parse_from_rfc3339(s).map_err(|e| format!("'{}': {}", s, e))?;
    Timestamp::try_from(parsed.timestamp()).map_err(|_| format!("'{}' is before 1970", s))
}
