use {
  serde::{Deserialize, Serialize},
  std::{
    fmt::{Debug, Display},
    str::FromStr,
  },
  thiserror::Error,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("Empty amount")]
  Empty,

  #[error("Invalid character '{0}' in amount")]
  InvalidCharacter(char),

  #[error("Too many fractional digits {0}. At most 18 are allowed")]
  TooPrecise(usize),

  #[error("Amount does not fit in 128 bits of minor units")]
  Overflow,
}

/// A monetary value in fixed-point representation.
///
/// Amounts are stored as an integer number of minor units (wei), with
/// 18 fractional decimal digits per whole unit. All comparisons between
/// funding targets and collected totals happen on those integers, so a
/// campaign can never be misclassified because of rounding.
#[derive(
  Copy,
  Clone,
  Default,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
pub struct Amount(u128);

impl Amount {
  pub const DECIMALS: u32 = 18;
  pub const ZERO: Amount = Amount(0);

  const UNIT: u128 = 10u128.pow(Self::DECIMALS);

  pub const fn from_minor_units(units: u128) -> Self {
    Self(units)
  }

  pub const fn minor_units(&self) -> u128 {
    self.0
  }

  /// Whole units, e.g. `Amount::whole(3)` is `3.0`.
  pub const fn whole(units: u64) -> Self {
    Self(units as u128 * Self::UNIT)
  }

  pub const fn is_zero(&self) -> bool {
    self.0 == 0
  }

  pub fn checked_add(self, other: Amount) -> Option<Amount> {
    self.0.checked_add(other.0).map(Amount)
  }

  /// Percentage of `total` this amount represents, clamped to `[0, 100]`.
  ///
  /// A zero total is treated as fully funded.
  pub fn percent_of(self, total: Amount) -> u8 {
    if self.0 >= total.0 {
      return 100;
    }

    // self < total from here on, so the result is below 100.
    let percent = match self.0.checked_mul(100) {
      Some(scaled) => scaled / total.0,
      None => self.0 / (total.0 / 100),
    };
    percent.min(99) as u8
  }
}

impl Display for Amount {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let whole = self.0 / Self::UNIT;
    let fraction = self.0 % Self::UNIT;
    if fraction == 0 {
      write!(f, "{whole}")
    } else {
      let digits = format!("{fraction:018}");
      write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
  }
}

impl Debug for Amount {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "amount({self})")
  }
}

impl FromStr for Amount {
  type Err = Error;

  /// Parses a non-negative decimal string such as `12`, `0.01` or `.5`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && fraction.is_empty() {
      return Err(Error::Empty);
    }

    if fraction.len() > Self::DECIMALS as usize {
      return Err(Error::TooPrecise(fraction.len()));
    }

    fn digits(part: &str) -> Result<u128, Error> {
      part.chars().try_fold(0u128, |acc, c| {
        let digit = c.to_digit(10).ok_or(Error::InvalidCharacter(c))?;
        acc
          .checked_mul(10)
          .and_then(|acc| acc.checked_add(digit as u128))
          .ok_or(Error::Overflow)
      })
    }

    let scale = 10u128.pow(Self::DECIMALS - fraction.len() as u32);
    let fraction = digits(fraction)? * scale;
    digits(whole)?
      .checked_mul(Self::UNIT)
      .and_then(|whole| whole.checked_add(fraction))
      .map(Amount)
      .ok_or(Error::Overflow)
  }
}
