use {
  crate::{FetchError, SubmissionError},
  async_trait::async_trait,
  blockfund_primitives::{
    Address,
    Amount,
    Campaign,
    CampaignId,
    Donation,
    DonationReceipt,
    NewCampaign,
  },
  parking_lot::Mutex,
  time::OffsetDateTime,
  tracing::info,
};

/// The authoritative system of record for campaigns and donations.
///
/// Implementations may reach the ledger through RPC, a local daemon or an
/// indexer. Every call is a suspension point with unbounded latency, and
/// writes are eventually consistent: a read issued right after an
/// acknowledged write is not guaranteed to observe it.
#[async_trait]
pub trait CampaignStore: Send + Sync {
  /// All campaign records, in ledger order.
  async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, FetchError>;

  /// Submits a new campaign owned by `creator`.
  async fn create_campaign(
    &self,
    campaign: NewCampaign,
    creator: Address,
  ) -> Result<CampaignId, SubmissionError>;

  /// Submits a donation of `amount` from `donor` to a campaign.
  async fn donate(
    &self,
    campaign: CampaignId,
    amount: Amount,
    donor: Address,
  ) -> Result<DonationReceipt, SubmissionError>;

  /// All donations recorded for one campaign, oldest first.
  async fn fetch_donations(
    &self,
    campaign: CampaignId,
  ) -> Result<Vec<Donation>, FetchError>;
}

/// Ledger acceptance rules for new campaigns.
pub fn validate_new_campaign(
  campaign: &NewCampaign,
  now: OffsetDateTime,
) -> Result<(), SubmissionError> {
  if campaign.target.is_zero() {
    return Err(SubmissionError::Rejected(
      "funding target must be greater than zero".into(),
    ));
  }

  if campaign.deadline <= now {
    return Err(SubmissionError::Rejected(
      "deadline must be in the future".into(),
    ));
  }

  Ok(())
}

/// Ledger acceptance rules for donations.
///
/// On success the campaign total is increased and the recorded
/// donation is returned. The collected total never decreases.
pub fn apply_donation(
  campaign: &mut Campaign,
  amount: Amount,
  donor: Address,
  now: OffsetDateTime,
) -> Result<Donation, SubmissionError> {
  if amount.is_zero() {
    return Err(SubmissionError::InvalidAmount(
      "donation must be greater than zero".into(),
    ));
  }

  if now >= campaign.deadline {
    return Err(SubmissionError::Rejected(format!(
      "campaign {} has passed its deadline",
      campaign.id
    )));
  }

  if campaign.amount_collected >= campaign.target {
    return Err(SubmissionError::Rejected(format!(
      "campaign {} has already reached its target",
      campaign.id
    )));
  }

  campaign.amount_collected = campaign
    .amount_collected
    .checked_add(amount)
    .ok_or_else(|| SubmissionError::Rejected("amount overflow".into()))?;

  Ok(Donation {
    donor,
    campaign: campaign.id,
    amount,
    timestamp: now,
  })
}

#[derive(Debug, Default)]
struct Ledger {
  campaigns: Vec<Campaign>,
  donations: Vec<Donation>,
}

/// Ephemeral ledger kept in process memory.
///
/// Writes are visible to the next read immediately. Useful for tests
/// and demos where no external ledger is available.
#[derive(Debug, Default)]
pub struct InMemoryCampaignStore {
  ledger: Mutex<Ledger>,
}

impl InMemoryCampaignStore {
  /// Inserts an already existing campaign record as is.
  pub fn insert(&self, campaign: Campaign) {
    self.ledger.lock().campaigns.push(campaign);
  }

  pub fn campaign(&self, id: CampaignId) -> Option<Campaign> {
    self
      .ledger
      .lock()
      .campaigns
      .iter()
      .find(|c| c.id == id)
      .cloned()
  }
}

#[async_trait]
impl CampaignStore for InMemoryCampaignStore {
  async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, FetchError> {
    Ok(self.ledger.lock().campaigns.clone())
  }

  async fn create_campaign(
    &self,
    campaign: NewCampaign,
    creator: Address,
  ) -> Result<CampaignId, SubmissionError> {
    validate_new_campaign(&campaign, OffsetDateTime::now_utc())?;

    let mut ledger = self.ledger.lock();
    let id = ledger
      .campaigns
      .iter()
      .map(|c| c.id.get() + 1)
      .max()
      .map(CampaignId::new)
      .unwrap_or(CampaignId::new(0));

    ledger.campaigns.push(campaign.into_campaign(id, creator));
    info!("campaign {id} created by {creator}");
    Ok(id)
  }

  async fn donate(
    &self,
    campaign: CampaignId,
    amount: Amount,
    donor: Address,
  ) -> Result<DonationReceipt, SubmissionError> {
    let mut ledger = self.ledger.lock();
    let record = ledger
      .campaigns
      .iter_mut()
      .find(|c| c.id == campaign)
      .ok_or(SubmissionError::UnknownCampaign(campaign))?;

    let donation =
      apply_donation(record, amount, donor, OffsetDateTime::now_utc())?;
    let receipt = DonationReceipt::from(&donation);
    ledger.donations.push(donation);
    Ok(receipt)
  }

  async fn fetch_donations(
    &self,
    campaign: CampaignId,
  ) -> Result<Vec<Donation>, FetchError> {
    Ok(
      self
        .ledger
        .lock()
        .donations
        .iter()
        .filter(|d| d.campaign == campaign)
        .cloned()
        .collect(),
    )
  }
}
