use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// The per-charge data of a payload, everything here is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentRequest {
    /// `None` or zero lets the payer type the amount
    pub amount: Option<Amount>,

    /// reference label, `***` on the wire when absent
    pub txid: Option<String>,

    /// free text shown to the payer by some banks
    pub description: Option<String>,
}

impl PaymentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_txid(mut self, txid: impl Into<String>) -> Self {
        self.txid = Some(txid.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
