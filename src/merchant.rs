use serde::{Deserialize, Serialize};

use crate::{
    field::{MAX_CITY_LEN, MAX_NAME_LEN},
    text::normalize_merchant_text,
};

/// Who receives the payment, as shown by the payer's banking app
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MerchantInfo {
    pub name: String,
    pub city: String,
}

impl MerchantInfo {
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self { name: name.into(), city: city.into() }
    }

    /// Upper-case ASCII name, at most 25 characters
    pub fn normalized_name(&self) -> String {
        normalize_merchant_text(&self.name, MAX_NAME_LEN)
    }

    /// Upper-case ASCII city, at most 15 characters
    pub fn normalized_city(&self) -> String {
        normalize_merchant_text(&self.city, MAX_CITY_LEN)
    }
}
