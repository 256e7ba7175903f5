//! Reading a "Copia e Cola" string back into its fields

use serde::Serialize;
use tracing::warn;

use crate::{
    amount::Amount,
    crc::crc16_hex,
    error::DecodeError,
    field::{self, CRC_LEN, CRC_PREFIX},
    key::PixKey,
    merchant::MerchantInfo,
    payment::PaymentRequest,
    tlv::{TlvField, find, parse_fields},
};

type Result<T, E = DecodeError> = std::result::Result<T, E>;

/// The logical content of a static Pix payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedPix {
    pub key: PixKey,
    pub merchant: MerchantInfo,
    pub payment: PaymentRequest,
}

pub fn decode(payload: &str) -> Result<DecodedPix> {
    decode_fields(payload.trim()).inspect_err(|error| warn!("rejected pix payload: {error}"))
}

/// Checks only the trailing CRC field
pub fn verify_checksum(payload: &str) -> Result<()> {
    let payload = payload.trim();
    if !payload.is_ascii() {
        return Err(DecodeError::NonAscii);
    }

    let crc_start = payload.len().checked_sub(CRC_PREFIX.len() + CRC_LEN);
    let Some(crc_start) = crc_start.filter(|&start| payload[start..].starts_with(CRC_PREFIX))
    else {
        return Err(DecodeError::MissingChecksum);
    };

    let (covered, found) = payload.split_at(crc_start + CRC_PREFIX.len());
    let expected = crc16_hex(covered);

    if !found.eq_ignore_ascii_case(&expected) {
        return Err(DecodeError::ChecksumMismatch { expected, found: found.to_string() });
    }

    Ok(())
}

// private
fn decode_fields(payload: &str) -> Result<DecodedPix> {
    if !payload.is_ascii() {
        return Err(DecodeError::NonAscii);
    }

    let fields = parse_fields(payload)?;

    match fields.last() {
        Some(last) if last.id == field::CRC && last.value.len() == CRC_LEN => {}
        _ => return Err(DecodeError::MissingChecksum),
    }

    verify_checksum(payload)?;

    match fields.first() {
        Some(TlvField { id: field::PAYLOAD_FORMAT_INDICATOR, value: field::PAYLOAD_FORMAT }) => {}
        Some(TlvField { id: field::PAYLOAD_FORMAT_INDICATOR, value }) => {
            return Err(DecodeError::UnsupportedFormat(format!("payload format {value}")));
        }
        _ => return Err(DecodeError::MissingField("payload format indicator")),
    }

    if let Some(currency) = find(&fields, field::TRANSACTION_CURRENCY) {
        if currency.value != field::CURRENCY_BRL {
            return Err(DecodeError::InvalidField {
                id: field::TRANSACTION_CURRENCY,
                reason: format!("currency {} is not BRL", currency.value),
            });
        }
    }

    let account = find(&fields, field::MERCHANT_ACCOUNT_INFORMATION)
        .ok_or(DecodeError::MissingField("merchant account information"))?;
    let (key, description) = read_account(account)?;

    let name = find(&fields, field::MERCHANT_NAME).ok_or(DecodeError::MissingField("merchant name"))?;
    let city = find(&fields, field::MERCHANT_CITY).ok_or(DecodeError::MissingField("merchant city"))?;

    let amount = find(&fields, field::TRANSACTION_AMOUNT)
        .map(|amount| amount.value.parse::<Amount>())
        .transpose()
        .map_err(DecodeError::invalid_amount)?;

    let txid = match find(&fields, field::ADDITIONAL_DATA_FIELD_TEMPLATE) {
        Some(additional) => read_txid(additional)?,
        None => None,
    };

    Ok(DecodedPix {
        key,
        merchant: MerchantInfo::new(name.value, city.value),
        payment: PaymentRequest { amount, txid, description },
    })
}

fn read_account(account: &TlvField<'_>) -> Result<(PixKey, Option<String>)> {
    let children = account.children()?;

    let gui = find(&children, field::account::GUI).ok_or(DecodeError::MissingField("pix GUI"))?;
    if !gui.value.eq_ignore_ascii_case(field::PIX_GUI) {
        return Err(DecodeError::UnsupportedFormat(format!("GUI {}", gui.value)));
    }

    let Some(key) = find(&children, field::account::KEY) else {
        if find(&children, field::account::URL).is_some() {
            return Err(DecodeError::UnsupportedFormat("dynamic pix (location URL)".to_string()));
        }

        return Err(DecodeError::MissingField("pix key"));
    };

    let description =
        find(&children, field::account::DESCRIPTION).map(|description| description.value.to_string());

    Ok((PixKey::infer(key.value), description))
}

fn read_txid(additional: &TlvField<'_>) -> Result<Option<String>> {
    let children = additional.children()?;

    let txid = find(&children, field::additional::REFERENCE_LABEL)
        .map(|label| label.value)
        .filter(|&label| label != field::TXID_UNSPECIFIED)
        .map(str::to_string);

    Ok(txid)
}
