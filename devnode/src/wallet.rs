use {
  async_trait::async_trait,
  blockfund_client::{ConnectionAbandoned, Wallet},
  blockfund_primitives::Address,
  ed25519_dalek::Keypair,
  std::path::PathBuf,
  tracing::{debug, info, warn},
};

/// Wallet backed by an ed25519 key stored in the data directory as
/// base58 text.
///
/// A key on disk counts as an already authorized account. Without one,
/// the connection prompt is answered by the `--yes` flag: approving
/// generates and stores a fresh key, otherwise the prompt is abandoned.
pub struct LocalWallet {
  keyfile: PathBuf,
  auto_approve: bool,
}

impl LocalWallet {
  pub fn new(keyfile: PathBuf, auto_approve: bool) -> Self {
    Self {
      keyfile,
      auto_approve,
    }
  }

  async fn load(&self) -> Option<Keypair> {
    let encoded = tokio::fs::read_to_string(&self.keyfile).await.ok()?;
    let bytes = match bs58::decode(encoded.trim()).into_vec() {
      Ok(bytes) => bytes,
      Err(e) => {
        warn!("ignoring malformed wallet key {:?}: {e}", self.keyfile);
        return None;
      }
    };

    match Keypair::from_bytes(&bytes) {
      Ok(keypair) => Some(keypair),
      Err(e) => {
        warn!("ignoring invalid wallet key {:?}: {e}", self.keyfile);
        None
      }
    }
  }

  async fn generate(&self) -> Result<Keypair, ConnectionAbandoned> {
    let keypair = Keypair::generate(&mut rand::thread_rng());
    let encoded = bs58::encode(keypair.to_bytes()).into_string();
    if let Err(e) = tokio::fs::write(&self.keyfile, encoded).await {
      warn!("failed to store wallet key in {:?}: {e}", self.keyfile);
      return Err(ConnectionAbandoned);
    }
    info!("generated new wallet key in {:?}", self.keyfile);
    Ok(keypair)
  }
}

#[async_trait]
impl Wallet for LocalWallet {
  async fn current_account(&self) -> Option<Address> {
    self.load().await.map(|keypair| keypair.public.into())
  }

  async fn connect(&self) -> Result<Address, ConnectionAbandoned> {
    if let Some(keypair) = self.load().await {
      debug!("wallet key already present");
      return Ok(keypair.public.into());
    }

    if !self.auto_approve {
      warn!("wallet connection requires approval, rerun with --yes");
      return Err(ConnectionAbandoned);
    }

    Ok(self.generate().await?.public.into())
  }
}
