use {
  crate::{Address, Amount},
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    num::ParseIntError,
    str::FromStr,
  },
  time::OffsetDateTime,
};

/// Opaque campaign identifier assigned by the ledger when
/// the campaign is created. Rendered as `#<n>`.
#[derive(
  Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CampaignId(u64);

impl CampaignId {
  pub const fn new(id: u64) -> Self {
    Self(id)
  }

  pub const fn get(&self) -> u64 {
    self.0
  }
}

impl Display for CampaignId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "#{}", self.0)
  }
}

impl Debug for CampaignId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "campaign(#{})", self.0)
  }
}

impl FromStr for CampaignId {
  type Err = ParseIntError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    s.trim().trim_start_matches('#').parse().map(Self)
  }
}

/// A single funding request as recorded by the ledger.
///
/// Everything except `amount_collected` is fixed at creation. The
/// collected total only ever grows, and only through donations accepted
/// by the ledger. Whether a campaign is still accepting donations is not
/// stored anywhere, it is derived from the deadline, the collected total
/// and the current time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
  pub id: CampaignId,
  pub owner: Address,
  pub title: String,
  pub description: String,

  /// Funding goal.
  pub target: Amount,

  /// Running total of all accepted donations.
  pub amount_collected: Amount,

  /// Point in time at which the campaign stops accepting donations.
  pub deadline: OffsetDateTime,
}

/// The parameters of a campaign creation request, before the ledger
/// assigned it an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCampaign {
  pub title: String,
  pub description: String,
  pub target: Amount,
  pub deadline: OffsetDateTime,
}

impl NewCampaign {
  pub fn into_campaign(self, id: CampaignId, owner: Address) -> Campaign {
    Campaign {
      id,
      owner,
      title: self.title,
      description: self.description,
      target: self.target,
      amount_collected: Amount::ZERO,
      deadline: self.deadline,
    }
  }
}
