use crate::{
    amount::AmountError,
    key::{KeyError, KeyType},
    tlv::TlvError,
};

/// The inputs of a payload, named in errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Key,
    Name,
    City,
    Txid,
    Description,
}

/// Why the strict encoder refuses its inputs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("invalid {key_type} key: {source}")]
    InvalidKeyFormat {
        key_type: KeyType,
        #[source]
        source: KeyError,
    },

    #[error("{field} is {actual} characters long after normalization, max is {max}")]
    FieldTooLong { field: Field, max: usize, actual: usize },

    #[error("txid may only contain letters and digits")]
    InvalidTxid,

    #[error("amount {0} does not fit the payload, max is 9999999999.99")]
    AmountOutOfRange(crate::amount::Amount),

    #[error("unable to assemble payload: {0}")]
    Encoding(#[from] TlvError),
}

/// Why a payload string was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("payload contains non ASCII characters")]
    NonAscii,

    #[error("malformed TLV field at offset {offset}")]
    MalformedTlv { offset: usize },

    #[error("payload does not end with a CRC field")]
    MissingChecksum,

    #[error("checksum mismatch, payload says {found} but content hashes to {expected}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("unsupported payload: {0}")]
    UnsupportedFormat(String),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field {id:02}: {reason}")]
    InvalidField { id: u8, reason: String },
}

impl From<TlvError> for DecodeError {
    fn from(error: TlvError) -> Self {
        match error {
            TlvError::Malformed { offset } => Self::MalformedTlv { offset },
            TlvError::ValueTooLong { id, len } => Self::InvalidField {
                id,
                reason: format!("value is {len} bytes long"),
            },
        }
    }
}

impl DecodeError {
    pub(crate) fn invalid_amount(error: AmountError) -> Self {
        Self::InvalidField { id: crate::field::TRANSACTION_AMOUNT, reason: error.to_string() }
    }
}
