use {
  crate::{Address, Amount, CampaignId},
  serde::{Deserialize, Serialize},
  sha2::{Digest, Sha256},
  time::OffsetDateTime,
};

/// One contribution to a campaign, as recorded by the ledger.
///
/// Clients never construct or mutate donations for display purposes,
/// they only read them back from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
  pub donor: Address,
  pub campaign: CampaignId,
  pub amount: Amount,
  pub timestamp: OffsetDateTime,
}

impl Donation {
  /// Sha-256 digest identifying this donation record.
  pub fn hash(&self) -> [u8; 32] {
    let mut bytes = Vec::with_capacity(80);
    bytes.extend_from_slice(&self.campaign.get().to_be_bytes());
    bytes.extend_from_slice(&self.donor);
    bytes.extend_from_slice(&self.amount.minor_units().to_be_bytes());
    bytes.extend_from_slice(&self.timestamp.unix_timestamp_nanos().to_be_bytes());
    Sha256::digest(&bytes).into()
  }
}

/// Acknowledgement returned by the ledger once a donation was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationReceipt {
  pub campaign: CampaignId,
  pub donor: Address,
  pub amount: Amount,
  pub tx_hash: [u8; 32],
}

impl From<&Donation> for DonationReceipt {
  fn from(donation: &Donation) -> Self {
    Self {
      campaign: donation.campaign,
      donor: donation.donor,
      amount: donation.amount,
      tx_hash: donation.hash(),
    }
  }
}
