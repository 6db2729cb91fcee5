pub trait ToBase58String {
  fn to_b58(&self) -> String;
}

impl<const N: usize> ToBase58String for [u8; N] {
  fn to_b58(&self) -> String {
    bs58::encode(self).into_string()
  }
}
