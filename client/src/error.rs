use {blockfund_primitives::CampaignId, thiserror::Error};

/// Read path failures. Those never block browsing, a failed fetch
/// renders the same as an empty ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
  #[error("Network error: {0}")]
  Network(String),

  #[error("Ledger error: {0}")]
  Ledger(String),
}

/// Write path failures. Those are surfaced next to the action that
/// triggered them and the action stays retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
  #[error("Invalid amount: {0}")]
  InvalidAmount(String),

  #[error("Insufficient funds")]
  InsufficientFunds,

  #[error("Transaction rejected: {0}")]
  Rejected(String),

  #[error("Timed out waiting for transaction confirmation")]
  Timeout,

  #[error("Campaign {0} does not exist")]
  UnknownCampaign(CampaignId),

  #[error("Ledger error: {0}")]
  Ledger(String),
}

/// The user declined or cancelled the wallet connection prompt.
///
/// This is a valid outcome of the connection flow rather than a
/// failure, any action waiting on the connection is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Wallet connection abandoned")]
pub struct ConnectionAbandoned;
