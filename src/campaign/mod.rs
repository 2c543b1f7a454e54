// Campaign module - THE DATA MODEL
// Campaign records, lifecycle status and per-campaign vote records

mod model;
mod votes;

pub use model::{Campaign, CampaignId, CampaignStatus, Donation, NewCampaign};
pub use votes::{Tally, VoteRecord, VoteRejection};
