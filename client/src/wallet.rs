use {crate::ConnectionAbandoned, async_trait::async_trait, blockfund_primitives::Address};

/// The wallet provider holding the user's externally owned account.
///
/// It is the only component able to sign on behalf of the user. Its
/// connection prompt may take arbitrarily long, the user can also
/// decline it.
#[async_trait]
pub trait Wallet: Send + Sync {
  /// Account already authorized for this client, if any.
  /// Never prompts the user.
  async fn current_account(&self) -> Option<Address>;

  /// Asks the user to authorize an account.
  async fn connect(&self) -> Result<Address, ConnectionAbandoned>;
}
