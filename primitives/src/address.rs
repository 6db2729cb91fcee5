use {
  crate::ToBase58String,
  ed25519_dalek::PublicKey,
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    ops::Deref,
    str::FromStr,
  },
  thiserror::Error,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("Invalid base58 encoding: {0}")]
  Encoding(#[from] bs58::decode::Error),

  #[error("Invalid address length {0}. Expected 32 bytes")]
  InvalidLength(usize),
}

/// Represents the identity of an externally owned account.
///
/// Campaign owners and donors are both identified by an address. The
/// platform never interprets it beyond equality, it is whatever identity
/// the connected wallet reports, usually an ed25519 public key.
///
/// Addresses are rendered and parsed as base58 strings.
#[derive(
  Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
  pub const fn new(bytes: [u8; 32]) -> Self {
    Self(bytes)
  }
}

impl AsRef<[u8]> for Address {
  fn as_ref(&self) -> &[u8] {
    &self.0
  }
}

impl Deref for Address {
  type Target = [u8];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0.to_b58())
  }
}

impl Debug for Address {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "address({})", self.0.to_b58())
  }
}

impl FromStr for Address {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut bytes = [0u8; 32];
    let len = bs58::decode(s).into(&mut bytes)?;
    if len != bytes.len() {
      return Err(Error::InvalidLength(len));
    }
    Ok(Self(bytes))
  }
}

impl From<PublicKey> for Address {
  fn from(p: PublicKey) -> Self {
    Self(*p.as_bytes())
  }
}
