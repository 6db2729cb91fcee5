use {
  crate::{
    CampaignCache,
    CampaignStore,
    ConnectionGate,
    Gated,
    SubmissionError,
  },
  blockfund_primitives::{Amount, Campaign, Donation, DonationReceipt},
  std::sync::Arc,
  thiserror::Error,
  tokio::sync::watch,
  tracing::{debug, info, warn},
};

/// A failed donation attempt, naming the action for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("donation failed: {0}")]
pub struct DonateError(#[from] pub SubmissionError);

/// State of the donation modal.
///
/// The campaign is captured when the modal opens and stays the same until
/// it closes, background refreshes of the collection never replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
  #[default]
  Closed,

  Open {
    campaign: Campaign,

    /// Amount as typed by the user, parsed on confirm.
    amount: String,

    /// Failure of the last attempt, kept until the next edit or attempt.
    error: Option<DonateError>,
  },

  Submitting {
    campaign: Campaign,
    amount: String,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DonateOutcome {
  /// The ledger acknowledged the donation, the modal is closed.
  Donated(DonationReceipt),

  /// The attempt failed, the modal is open again with the error.
  Failed(DonateError),

  /// No open modal, or an attempt is already being submitted.
  Ignored,

  /// The wallet connection was abandoned, nothing was submitted.
  Discarded,
}

enum Attempt {
  Ignored,
  Invalid(DonateError),
  Submit(Campaign, Amount),
}

/// Drives a single donation modal from opening to a confirmed donation.
#[derive(Clone)]
pub struct ContributionWorkflow {
  store: Arc<dyn CampaignStore>,
  cache: CampaignCache,
  gate: ConnectionGate,
  modal: Arc<watch::Sender<ModalState>>,
}

impl ContributionWorkflow {
  pub fn new(
    store: Arc<dyn CampaignStore>,
    cache: CampaignCache,
    gate: ConnectionGate,
  ) -> Self {
    Self {
      store,
      cache,
      gate,
      modal: Arc::new(watch::channel(ModalState::Closed).0),
    }
  }

  pub fn modal(&self) -> ModalState {
    self.modal.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<ModalState> {
    self.modal.subscribe()
  }

  /// The user clicked "Donate" on a campaign.
  ///
  /// A wallet must be connected before the modal opens. If the connection
  /// is abandoned the modal stays closed.
  pub async fn request(&self, campaign: Campaign) -> Gated<()> {
    self
      .gate
      .guard(|_| async move { self.open(campaign) })
      .await
  }

  fn open(&self, campaign: Campaign) {
    self.modal.send_if_modified(|state| match state {
      ModalState::Closed => {
        debug!("donation modal opened for campaign {}", campaign.id);
        *state = ModalState::Open {
          campaign,
          amount: String::new(),
          error: None,
        };
        true
      }
      _ => {
        debug!("donation modal already open, ignoring campaign {}", campaign.id);
        false
      }
    });
  }

  /// Replaces the typed amount. Only possible while the modal is open
  /// and not submitting.
  pub fn set_amount(&self, value: &str) {
    self.modal.send_if_modified(|state| match state {
      ModalState::Open { amount, error, .. } => {
        *amount = value.to_owned();
        *error = None;
        true
      }
      _ => false,
    });
  }

  /// Closes the modal. An attempt that is already being submitted
  /// cannot be cancelled, the modal stays up until it completes.
  pub fn close(&self) {
    self.modal.send_if_modified(|state| match state {
      ModalState::Open { .. } => {
        *state = ModalState::Closed;
        true
      }
      _ => false,
    });
  }

  /// Submits the typed amount to the campaign shown in the modal.
  ///
  /// While an attempt is in flight further confirms are ignored. On
  /// success the modal closes and the campaign collection is refreshed
  /// once; the refreshed total may or may not include this donation yet.
  /// On failure the modal reopens with the typed amount intact.
  pub async fn confirm(&self) -> DonateOutcome {
    let (campaign, amount) = match self.begin() {
      Attempt::Ignored => return DonateOutcome::Ignored,
      Attempt::Invalid(e) => return DonateOutcome::Failed(e),
      Attempt::Submit(campaign, amount) => (campaign, amount),
    };

    let id = campaign.id;
    let result = self
      .gate
      .guard(|donor| async move {
        info!("donating {amount} to campaign {id} from {donor}");
        self.store.donate(id, amount, donor).await
      })
      .await;

    match result {
      Gated::Ran(Ok(receipt)) => {
        info!("donation to campaign {id} confirmed: {receipt:?}");
        self.modal.send_replace(ModalState::Closed);
        self.cache.refresh().await;
        DonateOutcome::Donated(receipt)
      }
      Gated::Ran(Err(e)) => {
        warn!("donation to campaign {id} failed: {e}");
        let error = DonateError::from(e);
        self.reopen(Some(error.clone()));
        DonateOutcome::Failed(error)
      }
      Gated::Discarded => {
        self.reopen(None);
        DonateOutcome::Discarded
      }
    }
  }

  /// Donations already recorded for the campaign in the modal.
  pub async fn donations(&self) -> Vec<Donation> {
    let campaign = match &*self.modal.borrow() {
      ModalState::Open { campaign, .. }
      | ModalState::Submitting { campaign, .. } => campaign.id,
      ModalState::Closed => return vec![],
    };
    self.cache.donations(campaign).await
  }

  fn begin(&self) -> Attempt {
    let mut attempt = Attempt::Ignored;
    self.modal.send_if_modified(|state| {
      let ModalState::Open { campaign, amount, error } = state else {
        return false;
      };

      match parse_amount(amount) {
        Ok(value) => {
          attempt = Attempt::Submit(campaign.clone(), value);
          let submitting = ModalState::Submitting {
            campaign: campaign.clone(),
            amount: amount.clone(),
          };
          *state = submitting;
        }
        Err(e) => {
          let e = DonateError::from(e);
          *error = Some(e.clone());
          attempt = Attempt::Invalid(e);
        }
      }
      true
    });
    attempt
  }

  fn reopen(&self, failure: Option<DonateError>) {
    self.modal.send_if_modified(|state| {
      let ModalState::Submitting { campaign, amount } = state else {
        return false;
      };

      let open = ModalState::Open {
        campaign: campaign.clone(),
        amount: std::mem::take(amount),
        error: failure,
      };
      *state = open;
      true
    });
  }
}

fn parse_amount(amount: &str) -> Result<Amount, SubmissionError> {
  let value: Amount = amount
    .parse()
    .map_err(|e| SubmissionError::InvalidAmount(format!("{e}")))?;

  if value.is_zero() {
    return Err(SubmissionError::InvalidAmount(
      "donation must be greater than zero".into(),
    ));
  }
  Ok(value)
}
