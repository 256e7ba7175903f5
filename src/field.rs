//! Field ids and size limits of the Pix profile of the EMV merchant-presented QR

pub const PAYLOAD_FORMAT_INDICATOR: u8 = 0;
pub const MERCHANT_ACCOUNT_INFORMATION: u8 = 26;
pub const MERCHANT_CATEGORY_CODE: u8 = 52;
pub const TRANSACTION_CURRENCY: u8 = 53;
pub const TRANSACTION_AMOUNT: u8 = 54;
pub const COUNTRY_CODE: u8 = 58;
pub const MERCHANT_NAME: u8 = 59;
pub const MERCHANT_CITY: u8 = 60;
pub const ADDITIONAL_DATA_FIELD_TEMPLATE: u8 = 62;
pub const CRC: u8 = 63;

/// sub-fields of the merchant account information template (`26`)
pub mod account {
    pub const GUI: u8 = 0;
    pub const KEY: u8 = 1;
    pub const DESCRIPTION: u8 = 2;
    pub const URL: u8 = 25;
}

/// sub-fields of the additional data field template (`62`)
pub mod additional {
    pub const REFERENCE_LABEL: u8 = 5;
}

pub const PAYLOAD_FORMAT: &str = "01";
pub const PIX_GUI: &str = "br.gov.bcb.pix";
pub const MERCHANT_CATEGORY_UNSPECIFIED: &str = "0000";
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY_BR: &str = "BR";
pub const TXID_UNSPECIFIED: &str = "***";

/// `id || len` of the CRC field, the checksum covers it
pub const CRC_PREFIX: &str = "6304";
pub const CRC_LEN: usize = 4;

pub const MAX_VALUE_LEN: usize = 99;
pub const MAX_KEY_LEN: usize = 77;
pub const MAX_NAME_LEN: usize = 25;
pub const MAX_CITY_LEN: usize = 15;
pub const MAX_TXID_LEN: usize = 25;
pub const MAX_AMOUNT_LEN: usize = 13;

/// Room left for the description once the GUI and the key are in template `26`
pub fn max_description_len(key_len: usize) -> usize {
    // every sub-field spends 4 characters on id and length
    let used = (4 + PIX_GUI.len()) + (4 + key_len) + 4;
    MAX_VALUE_LEN.saturating_sub(used)
}
