//! Pix BR-Code payloads: the EMV merchant-presented QR string that Brazilian banking apps
//! scan or accept as "Copia e Cola"

pub mod amount;
pub mod config;
pub mod crc;
pub mod decode;
pub mod encode;
pub mod error;
pub mod ffi;
pub mod field;
pub mod key;
pub mod logging;
pub mod merchant;
pub mod payment;
pub mod saved_keys;
pub mod text;
pub mod tlv;

pub use amount::Amount;
pub use config::EncoderConfig;
pub use decode::{DecodedPix, decode, verify_checksum};
pub use encode::{Payload, encode, encode_strict, encode_with, validate};
pub use error::{DecodeError, Field, ValidationError};
pub use key::{KeyType, PixKey};
pub use merchant::MerchantInfo;
pub use payment::PaymentRequest;

uniffi::setup_scaffolding!();
