use std::str::FromStr;

use mestre_util::split_at_decimal_point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must be a finite, non negative number")]
    NotANonNegativeNumber,

    #[error("amount has more than two decimal places")]
    TooManyDecimals,

    #[error("amount is not a number: {0}")]
    Invalid(String),

    #[error("amount is too large")]
    Overflow,
}

type Result<T, E = AmountError> = std::result::Result<T, E>;

/// A BRL amount in centavos
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::From,
    derive_more::Into,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Self = Self(0);

    /// Largest amount whose wire form fits the 13 characters of field `54`
    pub const MAX: Self = Self(999_999_999_999);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn from_reais(reais: f64) -> Result<Self> {
        if !reais.is_finite() || reais < 0.0 {
            return Err(AmountError::NotANonNegativeNumber);
        }

        let cents = (reais * 100.0).round();
        if cents > u64::MAX as f64 {
            return Err(AmountError::Overflow);
        }

        Ok(Self(cents as u64))
    }

    pub const fn as_cents(&self) -> u64 {
        self.0
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_reais(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Amounts that field `54` can carry, zero means the payer types the amount
    pub fn is_payable(&self) -> bool {
        !self.is_zero() && *self <= Self::MAX
    }

    /// Always a dot and two decimals, whatever the display locale
    pub fn to_wire_string(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Accepts `10`, `10.5`, `10.50` and the pt-BR `10,50`
    fn from_str(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AmountError::Empty);
        }

        let input = if input.contains('.') { input.to_string() } else { input.replace(',', ".") };
        let (reais, _, centavos) = split_at_decimal_point(&input);

        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if reais.is_empty() || !all_digits(reais) || !all_digits(centavos) {
            return Err(AmountError::Invalid(input.to_string()));
        }

        if centavos.len() > 2 {
            return Err(AmountError::TooManyDecimals);
        }

        let reais: u64 = reais.parse().map_err(|_| AmountError::Overflow)?;
        let centavos: u64 = match centavos.len() {
            0 => 0,
            1 => centavos.parse::<u64>().map_err(|_| AmountError::Invalid(input.clone()))? * 10,
            _ => centavos.parse().map_err(|_| AmountError::Invalid(input.clone()))?,
        };

        reais
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(centavos))
            .map(Self)
            .ok_or(AmountError::Overflow)
    }
}
