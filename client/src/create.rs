use {
  crate::{CampaignCache, CampaignStore, ConnectionGate, Gated, SubmissionError},
  blockfund_primitives::{Amount, AmountError, CampaignId, NewCampaign},
  std::sync::Arc,
  thiserror::Error,
  time::{macros::format_description, Date, OffsetDateTime},
  tokio::sync::watch,
  tracing::{info, warn},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
  #[error("Campaign title is required")]
  MissingTitle,

  #[error("Campaign description is required")]
  MissingDescription,

  #[error("Invalid target amount: {0}")]
  InvalidTarget(#[from] AmountError),

  #[error("Target amount must be greater than zero")]
  ZeroTarget,

  #[error("Invalid deadline '{0}'. Expected YYYY-MM-DD")]
  InvalidDeadline(String),

  #[error("Deadline must be in the future")]
  DeadlineInPast,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
  #[error("create campaign failed: {0}")]
  Invalid(#[from] DraftError),

  #[error("create campaign failed: {0}")]
  Submission(#[from] SubmissionError),
}

/// Raw values of the create-campaign form, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignDraft {
  pub title: String,
  pub description: String,

  /// Decimal target amount, e.g. `1.5`.
  pub target: String,

  /// Calendar date, `YYYY-MM-DD`.
  pub deadline: String,
}

impl CampaignDraft {
  /// Validates the form against the clock sampled at `now`.
  ///
  /// The deadline is the start of the given day in UTC.
  pub fn validate(&self, now: OffsetDateTime) -> Result<NewCampaign, DraftError> {
    let title = self.title.trim();
    if title.is_empty() {
      return Err(DraftError::MissingTitle);
    }

    let description = self.description.trim();
    if description.is_empty() {
      return Err(DraftError::MissingDescription);
    }

    let target: Amount = self.target.parse()?;
    if target.is_zero() {
      return Err(DraftError::ZeroTarget);
    }

    let deadline = Date::parse(
      self.deadline.trim(),
      format_description!("[year]-[month]-[day]"),
    )
    .map_err(|_| DraftError::InvalidDeadline(self.deadline.clone()))?
    .midnight()
    .assume_utc();

    if deadline <= now {
      return Err(DraftError::DeadlineInPast);
    }

    Ok(NewCampaign {
      title: title.to_owned(),
      description: description.to_owned(),
      target,
      deadline,
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
  Editing {
    draft: CampaignDraft,
    error: Option<CreateError>,
  },

  Submitting {
    draft: CampaignDraft,
  },

  Created(CampaignId),
}

impl Default for FormState {
  fn default() -> Self {
    FormState::Editing {
      draft: CampaignDraft::default(),
      error: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
  Created(CampaignId),
  Failed(CreateError),
  Ignored,
  Discarded,
}

/// The create-campaign form and its submission.
///
/// Like donations, a successful creation refreshes the campaign
/// collection instead of inserting the new record locally. A failed
/// submission leaves everything the user typed in place.
#[derive(Clone)]
pub struct CreateCampaignForm {
  store: Arc<dyn CampaignStore>,
  cache: CampaignCache,
  gate: ConnectionGate,
  form: Arc<watch::Sender<FormState>>,
}

impl CreateCampaignForm {
  pub fn new(
    store: Arc<dyn CampaignStore>,
    cache: CampaignCache,
    gate: ConnectionGate,
  ) -> Self {
    Self {
      store,
      cache,
      gate,
      form: Arc::new(watch::channel(FormState::default()).0),
    }
  }

  pub fn state(&self) -> FormState {
    self.form.borrow().clone()
  }

  pub fn subscribe(&self) -> watch::Receiver<FormState> {
    self.form.subscribe()
  }

  /// Edits the draft. Ignored while a submission is in flight.
  pub fn edit(&self, f: impl FnOnce(&mut CampaignDraft)) {
    self.form.send_if_modified(|state| match state {
      FormState::Editing { draft, error } => {
        f(draft);
        *error = None;
        true
      }
      _ => false,
    });
  }

  /// Starts over with an empty draft.
  pub fn reset(&self) {
    self.form.send_if_modified(|state| match state {
      FormState::Submitting { .. } => false,
      _ => {
        *state = FormState::default();
        true
      }
    });
  }

  pub async fn submit(&self) -> CreateOutcome {
    let (draft, campaign) = match self.begin() {
      Ok(Some(attempt)) => attempt,
      Ok(None) => return CreateOutcome::Ignored,
      Err(e) => return CreateOutcome::Failed(e),
    };

    let result = self
      .gate
      .guard(|creator| async move {
        info!("creating campaign '{}' for {creator}", campaign.title);
        self.store.create_campaign(campaign, creator).await
      })
      .await;

    match result {
      Gated::Ran(Ok(id)) => {
        info!("campaign {id} created");
        self.form.send_replace(FormState::Created(id));
        self.cache.refresh().await;
        CreateOutcome::Created(id)
      }
      Gated::Ran(Err(e)) => {
        warn!("campaign creation failed: {e}");
        let error = CreateError::from(e);
        self.form.send_replace(FormState::Editing {
          draft,
          error: Some(error.clone()),
        });
        CreateOutcome::Failed(error)
      }
      Gated::Discarded => {
        self.form.send_replace(FormState::Editing { draft, error: None });
        CreateOutcome::Discarded
      }
    }
  }

  #[allow(clippy::type_complexity)]
  fn begin(&self) -> Result<Option<(CampaignDraft, NewCampaign)>, CreateError> {
    let mut attempt = Ok(None);
    let now = OffsetDateTime::now_utc();
    self.form.send_if_modified(|state| {
      let FormState::Editing { draft, error } = state else {
        return false;
      };

      match draft.validate(now) {
        Ok(campaign) => {
          let draft = draft.clone();
          attempt = Ok(Some((draft.clone(), campaign)));
          *state = FormState::Submitting { draft };
        }
        Err(e) => {
          let e = CreateError::from(e);
          *error = Some(e.clone());
          attempt = Err(e);
        }
      }
      true
    });
    attempt
  }
}
