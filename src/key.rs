//! Pix keys ("chaves"), the identifier the payer's bank resolves to an account

use mestre_util::only_digits;
use serde::{Deserialize, Serialize};

use crate::field::MAX_KEY_LEN;

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;
const BRAZIL_CALLING_CODE: &str = "+55";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    uniffi::Enum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum KeyType {
    Cpf,
    Cnpj,
    Email,
    Phone,
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("key is empty")]
    Empty,

    #[error("{key_type} key must have {expected} digits, got {actual}")]
    WrongDigitCount { key_type: KeyType, expected: &'static str, actual: usize },

    #[error("{0} check digits do not match")]
    BadCheckDigits(KeyType),

    #[error("email key is not a valid address")]
    InvalidEmail,

    #[error("random key is not a UUID")]
    InvalidRandom,

    #[error("key is {0} characters long, max is 77")]
    TooLong(usize),

    #[error("key may only contain ASCII characters")]
    NonAscii,
}

/// A key as typed by the user, tagged with its type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PixKey {
    Cpf(String),
    Cnpj(String),
    Email(String),
    Phone(String),
    Random(String),
}

impl PixKey {
    pub fn new(key_type: KeyType, value: impl Into<String>) -> Self {
        let value = value.into();
        match key_type {
            KeyType::Cpf => Self::Cpf(value),
            KeyType::Cnpj => Self::Cnpj(value),
            KeyType::Email => Self::Email(value),
            KeyType::Phone => Self::Phone(value),
            KeyType::Random => Self::Random(value),
        }
    }

    /// Classifies a key read back from a payload, where only the normalized text survives
    pub fn infer(key: &str) -> Self {
        let key = key.trim();
        let all_digits = !key.is_empty() && key.chars().all(|c| c.is_ascii_digit());

        match key {
            phone if phone.starts_with(BRAZIL_CALLING_CODE) => Self::Phone(phone.to_string()),
            email if email.contains('@') => Self::Email(email.to_string()),
            cpf if all_digits && cpf.len() == CPF_LEN => Self::Cpf(cpf.to_string()),
            cnpj if all_digits && cnpj.len() == CNPJ_LEN => Self::Cnpj(cnpj.to_string()),
            other => Self::Random(other.to_string()),
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Cpf(_) => KeyType::Cpf,
            Self::Cnpj(_) => KeyType::Cnpj,
            Self::Email(_) => KeyType::Email,
            Self::Phone(_) => KeyType::Phone,
            Self::Random(_) => KeyType::Random,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::Cpf(value)
            | Self::Cnpj(value)
            | Self::Email(value)
            | Self::Phone(value)
            | Self::Random(value) => value,
        }
    }

    /// The key as it goes on the wire
    ///
    /// CPF and CNPJ keep only digits, phones become `+55` followed by the digits, email
    /// and random keys are only trimmed
    pub fn normalized(&self) -> String {
        match self {
            Self::Cpf(value) | Self::Cnpj(value) => only_digits(value),
            Self::Phone(value) => format!("{BRAZIL_CALLING_CODE}{}", only_digits(value)),
            Self::Email(value) | Self::Random(value) => value.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), KeyError> {
        let normalized = self.normalized();

        let is_empty = match self {
            Self::Phone(_) => normalized == BRAZIL_CALLING_CODE,
            _ => normalized.is_empty(),
        };

        if is_empty {
            return Err(KeyError::Empty);
        }

        if !normalized.is_ascii() {
            return Err(KeyError::NonAscii);
        }

        if normalized.len() > MAX_KEY_LEN {
            return Err(KeyError::TooLong(normalized.len()));
        }

        match self {
            Self::Cpf(_) => validate_cpf(&normalized),
            Self::Cnpj(_) => validate_cnpj(&normalized),
            Self::Phone(_) => validate_phone(&normalized[BRAZIL_CALLING_CODE.len()..]),
            Self::Email(_) => validate_email(&normalized),
            Self::Random(_) => validate_random(&normalized),
        }
    }
}

impl std::fmt::Display for PixKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.key_type(), self.raw())
    }
}

// private
fn digits_of(digits: &str) -> Vec<u32> {
    digits.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

fn validate_cpf(digits: &str) -> Result<(), KeyError> {
    if digits.len() != CPF_LEN {
        return Err(KeyError::WrongDigitCount {
            key_type: KeyType::Cpf,
            expected: "11",
            actual: digits.len(),
        });
    }

    let digits = digits_of(digits);
    if all_same(&digits) {
        return Err(KeyError::BadCheckDigits(KeyType::Cpf));
    }

    let check = |len: usize| -> u32 {
        let weight_start = len as u32 + 1;
        let sum: u32 =
            digits[..len].iter().enumerate().map(|(i, d)| d * (weight_start - i as u32)).sum();

        match sum * 10 % 11 {
            10 => 0,
            rest => rest,
        }
    };

    if check(9) != digits[9] || check(10) != digits[10] {
        return Err(KeyError::BadCheckDigits(KeyType::Cpf));
    }

    Ok(())
}

fn validate_cnpj(digits: &str) -> Result<(), KeyError> {
    const WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    if digits.len() != CNPJ_LEN {
        return Err(KeyError::WrongDigitCount {
            key_type: KeyType::Cnpj,
            expected: "14",
            actual: digits.len(),
        });
    }

    let digits = digits_of(digits);
    if all_same(&digits) {
        return Err(KeyError::BadCheckDigits(KeyType::Cnpj));
    }

    // the first check digit uses the weights without their leading 6
    let check = |len: usize| -> u32 {
        let weights = &WEIGHTS[WEIGHTS.len() - len..];
        let sum: u32 = digits[..len].iter().zip(weights).map(|(d, w)| d * w).sum();

        match sum % 11 {
            0 | 1 => 0,
            rest => 11 - rest,
        }
    };

    if check(12) != digits[12] || check(13) != digits[13] {
        return Err(KeyError::BadCheckDigits(KeyType::Cnpj));
    }

    Ok(())
}

/// area code plus an 8 (landline) or 9 (mobile) digit number
fn validate_phone(national: &str) -> Result<(), KeyError> {
    match national.len() {
        10 | 11 => Ok(()),
        actual => Err(KeyError::WrongDigitCount {
            key_type: KeyType::Phone,
            expected: "10 or 11",
            actual,
        }),
    }
}

fn validate_email(email: &str) -> Result<(), KeyError> {
    if email.chars().any(char::is_whitespace) {
        return Err(KeyError::InvalidEmail);
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(KeyError::InvalidEmail);
    };

    let domain_ok = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    if local.is_empty() || !domain_ok {
        return Err(KeyError::InvalidEmail);
    }

    Ok(())
}

fn validate_random(key: &str) -> Result<(), KeyError> {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

    let groups: Vec<&str> = key.split('-').collect();
    if groups.len() != GROUPS.len() {
        return Err(KeyError::InvalidRandom);
    }

    let well_formed = groups
        .iter()
        .zip(GROUPS)
        .all(|(group, len)| group.len() == len && group.chars().all(|c| c.is_ascii_hexdigit()));

    if !well_formed {
        return Err(KeyError::InvalidRandom);
    }

    Ok(())
}
