#![allow(dead_code)]

use {
  async_trait::async_trait,
  blockfund_client::{
    CampaignStore,
    ConnectionAbandoned,
    FetchError,
    SubmissionError,
    Wallet,
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
  std::{
    collections::VecDeque,
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc,
    },
  },
  time::{Duration, OffsetDateTime},
  tokio::sync::oneshot,
};

pub fn campaign(id: u64, target: u64, collected: u64, days: i64) -> Campaign {
  Campaign {
    id: CampaignId::new(id),
    owner: Address::new([0xAA; 32]),
    title: format!("campaign {id}"),
    description: format!("description of campaign {id}"),
    target: Amount::whole(target),
    amount_collected: Amount::whole(collected),
    deadline: OffsetDateTime::now_utc() + Duration::days(days),
  }
}

pub fn donor() -> Address {
  Address::new([0xD0; 32])
}

/// A store with scripted responses that records how it was called.
///
/// Calls can be held back with gates: each queued gate is consumed by
/// the next call of that kind, which then waits until the gate is opened.
#[derive(Default)]
pub struct MockStore {
  campaigns: Mutex<Vec<Campaign>>,
  fetch_error: Mutex<Option<FetchError>>,
  history_error: Mutex<Option<FetchError>>,
  donate_error: Mutex<Option<SubmissionError>>,
  create_error: Mutex<Option<SubmissionError>>,
  fetch_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
  donate_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
  donations: Mutex<Vec<(CampaignId, Amount, Address)>>,
  pub fetch_calls: AtomicUsize,
  pub donate_calls: AtomicUsize,
  pub create_calls: AtomicUsize,
}

impl MockStore {
  pub fn with_campaigns(campaigns: Vec<Campaign>) -> Arc<Self> {
    let store = Self::default();
    *store.campaigns.lock() = campaigns;
    Arc::new(store)
  }

  pub fn set_campaigns(&self, campaigns: Vec<Campaign>) {
    *self.campaigns.lock() = campaigns;
  }

  pub fn fail_fetches(&self, error: Option<FetchError>) {
    *self.fetch_error.lock() = error;
  }

  pub fn fail_donation_history(&self, error: Option<FetchError>) {
    *self.history_error.lock() = error;
  }

  pub fn fail_donations(&self, error: Option<SubmissionError>) {
    *self.donate_error.lock() = error;
  }

  pub fn fail_creations(&self, error: Option<SubmissionError>) {
    *self.create_error.lock() = error;
  }

  pub fn hold_next_fetch(&self) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.fetch_gates.lock().push_back(rx);
    tx
  }

  pub fn hold_next_donation(&self) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.donate_gates.lock().push_back(rx);
    tx
  }

  pub fn fetches(&self) -> usize {
    self.fetch_calls.load(Ordering::SeqCst)
  }

  pub fn donate_attempts(&self) -> usize {
    self.donate_calls.load(Ordering::SeqCst)
  }

  pub fn creations(&self) -> usize {
    self.create_calls.load(Ordering::SeqCst)
  }

  pub fn donations_made(&self) -> Vec<(CampaignId, Amount, Address)> {
    self.donations.lock().clone()
  }
}

#[async_trait]
impl CampaignStore for MockStore {
  async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, FetchError> {
    self.fetch_calls.fetch_add(1, Ordering::SeqCst);
    // the response is what the ledger held when the request arrived
    let response = match self.fetch_error.lock().clone() {
      Some(e) => Err(e),
      None => Ok(self.campaigns.lock().clone()),
    };

    let gate = self.fetch_gates.lock().pop_front();
    if let Some(gate) = gate {
      let _ = gate.await;
    }
    response
  }

  async fn create_campaign(
    &self,
    campaign: NewCampaign,
    creator: Address,
  ) -> Result<CampaignId, SubmissionError> {
    self.create_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(e) = self.create_error.lock().clone() {
      return Err(e);
    }

    let mut campaigns = self.campaigns.lock();
    let id = CampaignId::new(campaigns.len() as u64);
    campaigns.push(campaign.into_campaign(id, creator));
    Ok(id)
  }

  async fn donate(
    &self,
    campaign: CampaignId,
    amount: Amount,
    donor: Address,
  ) -> Result<DonationReceipt, SubmissionError> {
    self.donate_calls.fetch_add(1, Ordering::SeqCst);

    let gate = self.donate_gates.lock().pop_front();
    if let Some(gate) = gate {
      let _ = gate.await;
    }

    if let Some(e) = self.donate_error.lock().clone() {
      return Err(e);
    }

    self.donations.lock().push((campaign, amount, donor));
    Ok(DonationReceipt::from(&Donation {
      donor,
      campaign,
      amount,
      timestamp: OffsetDateTime::now_utc(),
    }))
  }

  async fn fetch_donations(
    &self,
    campaign: CampaignId,
  ) -> Result<Vec<Donation>, FetchError> {
    if let Some(e) = self.history_error.lock().clone() {
      return Err(e);
    }

    Ok(
      self
        .donations
        .lock()
        .iter()
        .filter(|(id, ..)| *id == campaign)
        .map(|(id, amount, donor)| Donation {
          donor: *donor,
          campaign: *id,
          amount: *amount,
          timestamp: OffsetDateTime::now_utc(),
        })
        .collect(),
    )
  }
}

/// A wallet that either approves connection prompts with a fixed
/// account or declines them.
pub struct MockWallet {
  authorized: Mutex<Option<Address>>,
  approve_with: Option<Address>,
  prompt: Mutex<Option<oneshot::Receiver<()>>>,
  pub connect_calls: AtomicUsize,
}

impl MockWallet {
  /// Already authorized, never prompts.
  pub fn connected(account: Address) -> Arc<Self> {
    Arc::new(Self {
      authorized: Mutex::new(Some(account)),
      approve_with: Some(account),
      prompt: Mutex::new(None),
      connect_calls: AtomicUsize::new(0),
    })
  }

  /// Not authorized, the user approves the prompt.
  pub fn approving(account: Address) -> Arc<Self> {
    Arc::new(Self {
      authorized: Mutex::new(None),
      approve_with: Some(account),
      prompt: Mutex::new(None),
      connect_calls: AtomicUsize::new(0),
    })
  }

  /// Not authorized, the user declines the prompt.
  pub fn declining() -> Arc<Self> {
    Arc::new(Self {
      authorized: Mutex::new(None),
      approve_with: None,
      prompt: Mutex::new(None),
      connect_calls: AtomicUsize::new(0),
    })
  }

  /// Keeps the next prompt open until the returned sender fires.
  pub fn hold_prompt(&self) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    *self.prompt.lock() = Some(rx);
    tx
  }

  pub fn prompts(&self) -> usize {
    self.connect_calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Wallet for MockWallet {
  async fn current_account(&self) -> Option<Address> {
    *self.authorized.lock()
  }

  async fn connect(&self) -> Result<Address, ConnectionAbandoned> {
    self.connect_calls.fetch_add(1, Ordering::SeqCst);

    let prompt = self.prompt.lock().take();
    if let Some(prompt) = prompt {
      let _ = prompt.await;
    }

    let account = self.approve_with.ok_or(ConnectionAbandoned)?;
    *self.authorized.lock() = Some(account);
    Ok(account)
  }
}

/// Yields to other tasks until `condition` holds.
pub async fn until(mut condition: impl FnMut() -> bool) {
  while !condition() {
    tokio::task::yield_now().await;
  }
}
