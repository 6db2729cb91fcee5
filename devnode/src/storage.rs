use {
  async_trait::async_trait,
  blockfund_client::{
    apply_donation,
    validate_new_campaign,
    CampaignStore,
    FetchError,
    SubmissionError,
  },
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
  rmp_serde::{from_slice, to_vec},
  std::{path::Path, time::Duration},
  thiserror::Error,
  time::OffsetDateTime,
  tracing::{debug, info},
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Database error: {0}")]
  Db(#[from] sled::Error),

  #[error("Record encoding error: {0}")]
  Encode(#[from] rmp_serde::encode::Error),

  #[error("Corrupt record: {0}")]
  Decode(#[from] rmp_serde::decode::Error),
}

/// Ledger kept in a local sled database.
///
/// Campaigns are keyed by their big-endian id, so iteration yields them
/// in creation order. Donations are keyed by campaign id followed by a
/// database-wide sequence number. Every write waits for the configured
/// latency before it is applied, standing in for block confirmation.
pub struct OnDiskCampaignStore {
  db: sled::Db,
  campaigns: sled::Tree,
  donations: sled::Tree,
  writes: Mutex<()>,
  latency: Duration,
}

impl OnDiskCampaignStore {
  pub fn open(path: &Path, latency: Duration) -> Result<Self, Error> {
    Self::with_db(sled::open(path)?, latency)
  }

  pub fn with_db(db: sled::Db, latency: Duration) -> Result<Self, Error> {
    Ok(Self {
      campaigns: db.open_tree("campaigns")?,
      donations: db.open_tree("donations")?,
      writes: Mutex::new(()),
      latency,
      db,
    })
  }

  fn all_campaigns(&self) -> Result<Vec<Campaign>, Error> {
    self
      .campaigns
      .iter()
      .values()
      .map(|value| -> Result<_, Error> { Ok(from_slice(&value?)?) })
      .collect()
  }

  fn campaign(&self, id: CampaignId) -> Result<Option<Campaign>, Error> {
    match self.campaigns.get(id.get().to_be_bytes())? {
      Some(bytes) => Ok(Some(from_slice(&bytes)?)),
      None => Ok(None),
    }
  }

  fn put_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
    self
      .campaigns
      .insert(campaign.id.get().to_be_bytes(), to_vec(campaign)?)?;
    Ok(())
  }

  fn record_donation(&self, donation: &Donation) -> Result<(), Error> {
    let mut key = donation.campaign.get().to_be_bytes().to_vec();
    key.extend_from_slice(&self.db.generate_id()?.to_be_bytes());
    self.donations.insert(key, to_vec(donation)?)?;
    Ok(())
  }

  fn campaign_donations(&self, id: CampaignId) -> Result<Vec<Donation>, Error> {
    self
      .donations
      .scan_prefix(id.get().to_be_bytes())
      .values()
      .map(|value| -> Result<_, Error> { Ok(from_slice(&value?)?) })
      .collect()
  }

  fn insert_new(
    &self,
    campaign: NewCampaign,
    creator: Address,
  ) -> Result<CampaignId, SubmissionError> {
    validate_new_campaign(&campaign, OffsetDateTime::now_utc())?;
    let id = CampaignId::new(self.db.generate_id().map_err(ledger)?);
    self
      .put_campaign(&campaign.into_campaign(id, creator))
      .map_err(ledger)?;
    Ok(id)
  }

  fn accept_donation(
    &self,
    id: CampaignId,
    amount: Amount,
    donor: Address,
  ) -> Result<Donation, SubmissionError> {
    let _write = self.writes.lock();
    let mut campaign = self
      .campaign(id)
      .map_err(ledger)?
      .ok_or(SubmissionError::UnknownCampaign(id))?;

    let donation =
      apply_donation(&mut campaign, amount, donor, OffsetDateTime::now_utc())?;
    self.put_campaign(&campaign).map_err(ledger)?;
    self.record_donation(&donation).map_err(ledger)?;
    Ok(donation)
  }

  async fn confirm(&self) -> Result<(), SubmissionError> {
    if !self.latency.is_zero() {
      debug!("awaiting confirmation for {:?}", self.latency);
      tokio::time::sleep(self.latency).await;
    }
    Ok(())
  }

  async fn flush(&self) -> Result<(), SubmissionError> {
    self.db.flush_async().await.map_err(ledger)?;
    Ok(())
  }
}

fn ledger(e: impl Into<Error>) -> SubmissionError {
  SubmissionError::Ledger(e.into().to_string())
}

#[async_trait]
impl CampaignStore for OnDiskCampaignStore {
  async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, FetchError> {
    self
      .all_campaigns()
      .map_err(|e| FetchError::Ledger(e.to_string()))
  }

  async fn create_campaign(
    &self,
    campaign: NewCampaign,
    creator: Address,
  ) -> Result<CampaignId, SubmissionError> {
    self.confirm().await?;
    let id = self.insert_new(campaign, creator)?;
    self.flush().await?;
    info!("campaign {id} created by {creator}");
    Ok(id)
  }

  async fn donate(
    &self,
    campaign: CampaignId,
    amount: Amount,
    donor: Address,
  ) -> Result<DonationReceipt, SubmissionError> {
    self.confirm().await?;
    let donation = self.accept_donation(campaign, amount, donor)?;
    self.flush().await?;
    info!("donation of {amount} to campaign {campaign} by {donor} recorded");
    Ok(DonationReceipt::from(&donation))
  }

  async fn fetch_donations(
    &self,
    campaign: CampaignId,
  ) -> Result<Vec<Donation>, FetchError> {
    self
      .campaign_donations(campaign)
      .map_err(|e| FetchError::Ledger(e.to_string()))
  }
}

#[cfg(test)]
mod tests {
  use {
    super::OnDiskCampaignStore,
    blockfund_client::{CampaignStore, SubmissionError},
    blockfund_primitives::{Address, Amount, CampaignId, NewCampaign},
    std::time::Duration,
    time::OffsetDateTime,
  };

  fn store() -> anyhow::Result<OnDiskCampaignStore> {
    let db = sled::Config::new().temporary(true).open()?;
    Ok(OnDiskCampaignStore::with_db(db, Duration::ZERO)?)
  }

  fn new_campaign(title: &str, target: u64) -> NewCampaign {
    NewCampaign {
      title: title.into(),
      description: format!("about {title}"),
      target: Amount::whole(target),
      deadline: OffsetDateTime::now_utc() + time::Duration::days(10),
    }
  }

  #[tokio::test]
  async fn campaigns_come_back_in_creation_order() -> anyhow::Result<()> {
    let store = store()?;
    let owner = Address::new([1; 32]);

    let first = store.create_campaign(new_campaign("first", 5), owner).await?;
    let second = store.create_campaign(new_campaign("second", 5), owner).await?;
    assert!(first < second);

    let campaigns = store.fetch_campaigns().await?;
    let titles: Vec<_> = campaigns.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["first", "second"]);
    assert!(campaigns.iter().all(|c| c.owner == owner));
    Ok(())
  }

  #[tokio::test]
  async fn donations_update_totals_and_history() -> anyhow::Result<()> {
    let store = store()?;
    let owner = Address::new([1; 32]);
    let donor = Address::new([2; 32]);

    let id = store.create_campaign(new_campaign("garden", 3), owner).await?;
    let other = store.create_campaign(new_campaign("books", 3), owner).await?;

    let receipt = store.donate(id, Amount::whole(1), donor).await?;
    assert_eq!(receipt.campaign, id);
    store.donate(id, Amount::whole(2), donor).await?;
    store.donate(other, Amount::whole(1), donor).await?;

    let campaigns = store.fetch_campaigns().await?;
    assert_eq!(campaigns[0].amount_collected, Amount::whole(3));
    assert_eq!(campaigns[1].amount_collected, Amount::whole(1));

    let history = store.fetch_donations(id).await?;
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|d| d.campaign == id && d.donor == donor));

    // goal reached, the ledger refuses further donations
    assert!(matches!(
      store.donate(id, Amount::whole(1), donor).await,
      Err(SubmissionError::Rejected(_))
    ));
    assert_eq!(
      store.donate(CampaignId::new(999), Amount::whole(1), donor).await,
      Err(SubmissionError::UnknownCampaign(CampaignId::new(999)))
    );
    Ok(())
  }
}
