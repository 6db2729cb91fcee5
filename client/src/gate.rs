use {
  crate::{ConnectionAbandoned, Session, Wallet},
  blockfund_primitives::Address,
  std::{
    future::Future,
    sync::{
      atomic::{AtomicU64, Ordering},
      Arc,
    },
  },
  tokio::sync::Mutex,
  tracing::{debug, info},
};

/// Outcome of an action passed through the [`ConnectionGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<T> {
  /// A wallet account was available and the action ran with it.
  Ran(T),

  /// The connection was abandoned, the action never started.
  Discarded,
}

/// Makes sure a wallet account is bound before a state-changing
/// action runs.
///
/// When no account is bound, the wallet connection flow is started and
/// the action waits for it. Concurrent callers share a single prompt
/// and all of them observe its outcome.
#[derive(Clone)]
pub struct ConnectionGate {
  wallet: Arc<dyn Wallet>,
  session: Session,
  prompt: Arc<Mutex<()>>,
  prompts: Arc<AtomicU64>,
}

impl ConnectionGate {
  pub fn new(wallet: Arc<dyn Wallet>, session: Session) -> Self {
    Self {
      wallet,
      session,
      prompt: Arc::new(Mutex::new(())),
      prompts: Arc::new(AtomicU64::new(0)),
    }
  }

  /// Picks up an account the wallet has already authorized, without
  /// prompting the user.
  pub async fn restore(&self) -> Option<Address> {
    if let Some(account) = self.session.account() {
      return Some(account);
    }

    let account = self.wallet.current_account().await?;
    info!("restored wallet session for {account}");
    self.session.bind(account);
    Some(account)
  }

  /// Binds a wallet account to the session, prompting the user if needed.
  pub async fn connect(&self) -> Result<Address, ConnectionAbandoned> {
    if let Some(account) = self.session.account() {
      return Ok(account);
    }

    let seen = self.prompts.load(Ordering::SeqCst);
    let _prompt = self.prompt.lock().await;

    // someone else might have completed the prompt while we waited
    if let Some(account) = self.restore().await {
      return Ok(account);
    }

    if self.prompts.load(Ordering::SeqCst) != seen {
      debug!("joined a wallet prompt that was abandoned");
      return Err(ConnectionAbandoned);
    }

    let result = self.wallet.connect().await;
    self.prompts.fetch_add(1, Ordering::SeqCst);
    match result {
      Ok(account) => {
        info!("wallet connected: {account}");
        self.session.bind(account);
        Ok(account)
      }
      Err(ConnectionAbandoned) => {
        info!("wallet connection abandoned");
        Err(ConnectionAbandoned)
      }
    }
  }

  /// Runs `action` with the bound account, connecting first if needed.
  /// If the connection is abandoned the action is dropped unstarted.
  pub async fn guard<F, Fut, T>(&self, action: F) -> Gated<T>
  where
    F: FnOnce(Address) -> Fut,
    Fut: Future<Output = T>,
  {
    match self.connect().await {
      Ok(account) => Gated::Ran(action(account).await),
      Err(ConnectionAbandoned) => Gated::Discarded,
    }
  }

  pub fn session(&self) -> &Session {
    &self.session
  }
}
