use {blockfund_primitives::Address, std::sync::Arc, tokio::sync::watch};

/// Wallet connection state shared by every part of the client.
///
/// There is exactly one instance per application context. The navigation
/// bar, the connection gate and the workflows all observe the same
/// value, so they never disagree about whether a wallet is connected.
#[derive(Debug, Clone)]
pub struct Session {
  account: Arc<watch::Sender<Option<Address>>>,
}

impl Default for Session {
  fn default() -> Self {
    Self {
      account: Arc::new(watch::channel(None).0),
    }
  }
}

impl Session {
  pub fn account(&self) -> Option<Address> {
    *self.account.borrow()
  }

  pub fn is_connected(&self) -> bool {
    self.account.borrow().is_some()
  }

  pub fn subscribe(&self) -> watch::Receiver<Option<Address>> {
    self.account.subscribe()
  }

  pub(crate) fn bind(&self, account: Address) {
    self.account.send_if_modified(|current| {
      let changed = *current != Some(account);
      *current = Some(account);
      changed
    });
  }

  pub(crate) fn clear(&self) {
    self.account.send_if_modified(|current| current.take().is_some());
  }
}
