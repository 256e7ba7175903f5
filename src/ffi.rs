//! Flat records for the native UI, the form sends raw field values on every change

use crate::{
    amount::Amount,
    decode::{DecodedPix, decode},
    encode::{encode, encode_strict, validate},
    key::{KeyType, PixKey},
    merchant::MerchantInfo,
    payment::PaymentRequest,
};

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct PixForm {
    pub key_type: KeyType,
    pub key: String,
    pub name: String,
    pub city: String,
    pub amount: Option<f64>,
    pub txid: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct PixDecoded {
    pub key_type: KeyType,
    pub key: String,
    pub name: String,
    pub city: String,
    pub amount: Option<f64>,
    pub txid: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum PixFfiError {
    #[error("{0}")]
    Amount(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Decode(String),
}

type Result<T, E = PixFfiError> = std::result::Result<T, E>;

impl PixForm {
    /// The amount as the strict encoder sees it, `NaN` and negatives are errors
    fn strict_amount(&self) -> Result<Option<Amount>> {
        self.amount
            .map(Amount::from_reais)
            .transpose()
            .map_err(|error| PixFfiError::Amount(error.to_string()))
    }

    fn into_parts(self, amount: Option<Amount>) -> (PixKey, MerchantInfo, PaymentRequest) {
        let key = PixKey::new(self.key_type, self.key);
        let merchant = MerchantInfo::new(self.name, self.city);
        let payment = PaymentRequest { amount, txid: self.txid, description: self.description };

        (key, merchant, payment)
    }
}

impl From<DecodedPix> for PixDecoded {
    fn from(decoded: DecodedPix) -> Self {
        let DecodedPix { key, merchant, payment } = decoded;

        Self {
            key_type: key.key_type(),
            key: key.raw().to_string(),
            name: merchant.name,
            city: merchant.city,
            amount: payment.amount.map(|amount| amount.as_reais()),
            txid: payment.txid,
            description: payment.description,
        }
    }
}

/// Never fails, an unreadable amount is left for the payer to type
#[uniffi::export]
pub fn encode_pix_preview(form: PixForm) -> String {
    let amount = form.amount.and_then(|reais| Amount::from_reais(reais).ok());
    let (key, merchant, payment) = form.into_parts(amount);

    encode(&key, &merchant, &payment).into()
}

#[uniffi::export]
pub fn encode_pix(form: PixForm) -> Result<String> {
    let amount = form.strict_amount()?;
    let (key, merchant, payment) = form.into_parts(amount);

    encode_strict(&key, &merchant, &payment)
        .map(Into::into)
        .map_err(|error| PixFfiError::Validation(error.to_string()))
}

/// Human readable warnings for the form, empty when the payload is good to share
#[uniffi::export]
pub fn validate_pix(form: PixForm) -> Vec<String> {
    let amount = match form.strict_amount() {
        Ok(amount) => amount,
        Err(error) => return vec![error.to_string()],
    };

    let (key, merchant, payment) = form.into_parts(amount);
    validate(&key, &merchant, &payment).iter().map(ToString::to_string).collect()
}

#[uniffi::export]
pub fn decode_pix(payload: String) -> Result<PixDecoded> {
    decode(&payload).map(PixDecoded::from).map_err(|error| PixFfiError::Decode(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> PixForm {
        PixForm {
            key_type: KeyType::Email,
            key: "joao@ex.com".to_string(),
            name: "João da Silva".to_string(),
            city: "São Paulo".to_string(),
            amount: Some(10.0),
            txid: Some("PEDIDO1".to_string()),
            description: None,
        }
    }

    #[test]
    fn preview_and_strict_agree_on_valid_forms() {
        let preview = encode_pix_preview(form());
        assert_eq!(encode_pix(form()).unwrap(), preview);
        assert!(preview.ends_with("596F"));
    }

    #[test]
    fn preview_ignores_bad_amounts() {
        let payload = encode_pix_preview(PixForm { amount: Some(-3.0), ..form() });
        assert!(payload.contains("53039865802BR"));

        assert!(matches!(
            encode_pix(PixForm { amount: Some(f64::NAN), ..form() }),
            Err(PixFfiError::Amount(_))
        ));
    }

    #[test]
    fn validation_messages() {
        assert!(validate_pix(form()).is_empty());

        let warnings = validate_pix(PixForm { name: String::new(), ..form() });
        assert_eq!(warnings, vec!["name is required".to_string()]);
    }

    #[test]
    fn decode_flattens_fields() {
        let decoded = decode_pix(encode_pix_preview(form())).unwrap();

        assert_eq!(
            decoded,
            PixDecoded {
                key_type: KeyType::Email,
                key: "joao@ex.com".to_string(),
                name: "JOAO DA SILVA".to_string(),
                city: "SAO PAULO".to_string(),
                amount: Some(10.0),
                txid: Some("PEDIDO1".to_string()),
                description: None,
            }
        );

        assert!(matches!(decode_pix("garbage".to_string()), Err(PixFfiError::Decode(_))));
    }
}
