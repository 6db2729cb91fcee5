mod cache;
mod context;
mod contribution;
mod create;
mod error;
mod gate;
mod session;
mod store;
mod wallet;

pub mod lifecycle;

pub use {
  cache::{CampaignCache, Listing, LoadState, RequestId},
  context::{AppContext, Route, UnknownRoute},
  contribution::{
    ContributionWorkflow,
    DonateError,
    DonateOutcome,
    ModalState,
  },
  create::{
    CampaignDraft,
    CreateCampaignForm,
    CreateError,
    CreateOutcome,
    DraftError,
    FormState,
  },
  error::{ConnectionAbandoned, FetchError, SubmissionError},
  gate::{ConnectionGate, Gated},
  lifecycle::{classify, Filter, LifecycleState},
  session::Session,
  store::{
    apply_donation,
    validate_new_campaign,
    CampaignStore,
    InMemoryCampaignStore,
  },
  wallet::Wallet,
};
