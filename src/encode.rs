//! Building the "Copia e Cola" string
//!
//! [`encode`] never fails so a form can render a QR code on every keystroke, falling back
//! to placeholder literals and silently truncating. [`encode_strict`] is for library
//! callers and refuses anything the lenient path would have to patch up

use mestre_macros::new_type;
use tracing::{debug, warn};

use crate::{
    amount::Amount,
    config::EncoderConfig,
    crc::crc16_hex,
    error::{Field, ValidationError},
    field::{self, MAX_CITY_LEN, MAX_KEY_LEN, MAX_NAME_LEN, MAX_TXID_LEN, max_description_len},
    key::{KeyError, PixKey},
    merchant::MerchantInfo,
    payment::PaymentRequest,
    text::{normalize_merchant_text, sanitize_free_text, sanitize_key, sanitize_txid},
    tlv::{Tlv, TlvError, encode_all},
};

new_type!(Payload, String);

/// Best effort payload, see the module docs
pub fn encode(key: &PixKey, merchant: &MerchantInfo, payment: &PaymentRequest) -> Payload {
    encode_with(&EncoderConfig::default(), key, merchant, payment)
}

pub fn encode_with(
    config: &EncoderConfig,
    key: &PixKey,
    merchant: &MerchantInfo,
    payment: &PaymentRequest,
) -> Payload {
    let parts = Parts::lenient(config, key, merchant, payment);

    match parts.assemble() {
        Ok(payload) => payload,
        Err(error) => {
            warn!("unable to assemble payload ({error}), retrying without optional fields");
            parts.without_optional_fields().assemble().unwrap_or_else(|error| {
                warn!("unable to assemble payload: {error}");
                Payload::from(String::new())
            })
        }
    }
}

/// Payload for inputs that pass [`validate`], or the first problem found
pub fn encode_strict(
    key: &PixKey,
    merchant: &MerchantInfo,
    payment: &PaymentRequest,
) -> Result<Payload, ValidationError> {
    if let Some(error) = validate(key, merchant, payment).into_iter().next() {
        debug!("refusing to encode payload: {error}");
        return Err(error);
    }

    let parts = Parts::strict(key, merchant, payment);
    Ok(parts.assemble()?)
}

/// Every reason [`encode_strict`] would refuse these inputs
pub fn validate(
    key: &PixKey,
    merchant: &MerchantInfo,
    payment: &PaymentRequest,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(error) = key.validate() {
        errors.push(match error {
            KeyError::Empty => ValidationError::MissingField(Field::Key),
            KeyError::TooLong(actual) => {
                ValidationError::FieldTooLong { field: Field::Key, max: MAX_KEY_LEN, actual }
            }
            source => ValidationError::InvalidKeyFormat { key_type: key.key_type(), source },
        });
    }

    let merchant_fields = [
        (Field::Name, merchant.name.as_str(), MAX_NAME_LEN),
        (Field::City, merchant.city.as_str(), MAX_CITY_LEN),
    ];

    for (field, value, max) in merchant_fields {
        let normalized = normalize_merchant_text(value, usize::MAX);
        if normalized.is_empty() {
            errors.push(ValidationError::MissingField(field));
        } else if normalized.len() > max {
            errors.push(ValidationError::FieldTooLong { field, max, actual: normalized.len() });
        }
    }

    if let Some(amount) = payment.amount {
        if amount > Amount::MAX {
            errors.push(ValidationError::AmountOutOfRange(amount));
        }
    }

    if let Some(txid) = strict_txid(payment) {
        if !txid.chars().all(|c| c.is_ascii_alphanumeric()) {
            errors.push(ValidationError::InvalidTxid);
        } else if txid.len() > MAX_TXID_LEN {
            errors.push(ValidationError::FieldTooLong {
                field: Field::Txid,
                max: MAX_TXID_LEN,
                actual: txid.len(),
            });
        }
    }

    let description = payment.description.as_deref();
    if let Some(description) = description.and_then(|d| sanitize_free_text(d, usize::MAX)) {
        let max = max_description_len(key.normalized().len());
        if description.len() > max {
            errors.push(ValidationError::FieldTooLong {
                field: Field::Description,
                max,
                actual: description.len(),
            });
        }
    }

    errors
}

// private

/// The normalized values that go on the wire
#[derive(Debug)]
struct Parts {
    key: String,
    name: String,
    city: String,
    amount: Option<Amount>,
    txid: Option<String>,
    description: Option<String>,
}

impl Parts {
    fn lenient(
        config: &EncoderConfig,
        key: &PixKey,
        merchant: &MerchantInfo,
        payment: &PaymentRequest,
    ) -> Self {
        let key = sanitize_key(&key.normalized());

        let mut name = merchant.normalized_name();
        if name.is_empty() {
            debug!("merchant name is empty, using {:?}", config.fallback_name);
            name = normalize_merchant_text(&config.fallback_name, MAX_NAME_LEN);
        }

        let mut city = merchant.normalized_city();
        if city.is_empty() {
            debug!("merchant city is empty, using {:?}", config.fallback_city);
            city = normalize_merchant_text(&config.fallback_city, MAX_CITY_LEN);
        }

        let amount = payment.amount.filter(|amount| {
            if *amount > Amount::MAX {
                debug!("amount {amount} does not fit field 54, leaving it to the payer");
            }

            amount.is_payable()
        });

        let txid = payment.txid.as_deref().and_then(sanitize_txid);

        let description = payment
            .description
            .as_deref()
            .and_then(|text| sanitize_free_text(text, max_description_len(key.len())));

        Self { key, name, city, amount, txid, description }
    }

    /// Only called once [`validate`] found nothing
    fn strict(key: &PixKey, merchant: &MerchantInfo, payment: &PaymentRequest) -> Self {
        Self {
            key: key.normalized(),
            name: merchant.normalized_name(),
            city: merchant.normalized_city(),
            amount: payment.amount.filter(Amount::is_payable),
            txid: strict_txid(payment).map(str::to_string),
            description: payment
                .description
                .as_deref()
                .and_then(|text| sanitize_free_text(text, usize::MAX)),
        }
    }

    /// Drops the key, txid and description, leaving only fields of fixed or capped size
    fn without_optional_fields(self) -> Self {
        Self { key: String::new(), txid: None, description: None, ..self }
    }

    fn assemble(&self) -> Result<Payload, TlvError> {
        let mut account_info = vec![
            Tlv::text(field::account::GUI, field::PIX_GUI),
            Tlv::text(field::account::KEY, &self.key),
        ];

        if let Some(description) = &self.description {
            account_info.push(Tlv::text(field::account::DESCRIPTION, description));
        }

        let mut fields = vec![
            Tlv::text(field::PAYLOAD_FORMAT_INDICATOR, field::PAYLOAD_FORMAT),
            Tlv::template(field::MERCHANT_ACCOUNT_INFORMATION, account_info),
            Tlv::text(field::MERCHANT_CATEGORY_CODE, field::MERCHANT_CATEGORY_UNSPECIFIED),
            Tlv::text(field::TRANSACTION_CURRENCY, field::CURRENCY_BRL),
        ];

        if let Some(amount) = self.amount {
            fields.push(Tlv::text(field::TRANSACTION_AMOUNT, amount.to_wire_string()));
        }

        let txid = self.txid.as_deref().unwrap_or(field::TXID_UNSPECIFIED);

        fields.extend([
            Tlv::text(field::COUNTRY_CODE, field::COUNTRY_BR),
            Tlv::text(field::MERCHANT_NAME, &self.name),
            Tlv::text(field::MERCHANT_CITY, &self.city),
            Tlv::template(
                field::ADDITIONAL_DATA_FIELD_TEMPLATE,
                vec![Tlv::text(field::additional::REFERENCE_LABEL, txid)],
            ),
        ]);

        let mut payload = encode_all(&fields)?;

        // the checksum covers its own id and length
        payload.push_str(field::CRC_PREFIX);
        let crc = crc16_hex(&payload);
        payload.push_str(&crc);

        Ok(Payload::from(payload))
    }
}

/// The caller's txid, unless it is blank or the `***` placeholder
fn strict_txid(payment: &PaymentRequest) -> Option<&str> {
    payment
        .txid
        .as_deref()
        .map(str::trim)
        .filter(|txid| !txid.is_empty() && *txid != field::TXID_UNSPECIFIED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::key::KeyType;

    const RANDOM_KEY: &str = "123e4567-e12b-12d1-a456-426655440000";

    fn joao() -> (PixKey, MerchantInfo, PaymentRequest) {
        (
            PixKey::Email("joao@ex.com".into()),
            MerchantInfo::new("João da Silva", "São Paulo"),
            PaymentRequest::new().with_amount(Amount::from_cents(1000)).with_txid("PEDIDO1"),
        )
    }

    #[test]
    fn email_key_with_amount_and_txid() {
        let (key, merchant, payment) = joao();
        let payload = encode(&key, &merchant, &payment);

        assert_eq!(
            payload.as_str(),
            "00020126330014br.gov.bcb.pix0111joao@ex.com520400005303986540510.005802BR\
             5913JOAO DA SILVA6009SAO PAULO62110507PEDIDO16304596F"
        );
        assert!(payload.contains("5913JOAO DA SILVA"));
        assert!(payload.contains("540510.00"));
    }

    #[test]
    fn cpf_key_is_digits_only() {
        let payload = encode(
            &PixKey::Cpf("529.982.247-25".into()),
            &MerchantInfo::new("Mestre das Contas", "Curitiba"),
            &PaymentRequest::new().with_amount(Amount::from_cents(123_456)).with_txid("NF2024"),
        );

        assert_eq!(
            payload.as_str(),
            "00020126330014br.gov.bcb.pix01115299822472552040000530398654071234.565802BR\
             5917MESTRE DAS CONTAS6008CURITIBA62100506NF202463042AF2"
        );
    }

    #[test]
    fn description_goes_into_the_account_template() {
        let payload = encode(
            &PixKey::Random(RANDOM_KEY.into()),
            &MerchantInfo::new("Padaria Açúcar", "Recife"),
            &PaymentRequest::new()
                .with_amount("25,90".parse().unwrap())
                .with_description("Pão de queijo"),
        );

        assert_eq!(
            payload.as_str(),
            "00020126750014br.gov.bcb.pix0136123e4567-e12b-12d1-a456-4266554400000213Pao de queijo\
             520400005303986540525.905802BR5914PADARIA ACUCAR6006RECIFE62070503***6304DBB0"
        );
    }

    #[test]
    fn empty_form_still_produces_a_payload() {
        let payload = encode(
            &PixKey::Phone("(11) 91234-5678".into()),
            &MerchantInfo::default(),
            &PaymentRequest::default(),
        );

        assert_eq!(
            payload.as_str(),
            "00020126360014br.gov.bcb.pix0114+55119123456785204000053039865802BR\
             5909RECEBEDOR6009SAO PAULO62070503***630449B0"
        );
    }

    #[test]
    fn custom_fallbacks() {
        let config = EncoderConfig {
            fallback_name: "Loja".to_string(),
            fallback_city: "Belém".to_string(),
        };

        let (key, _, payment) = joao();
        let payload = encode_with(&config, &key, &MerchantInfo::default(), &payment);

        assert!(payload.contains("5904LOJA6005BELEM"));
    }

    #[test]
    fn zero_amount_omits_field_54() {
        let (key, merchant, _) = joao();

        for payment in [
            PaymentRequest::new(),
            PaymentRequest::new().with_amount(Amount::ZERO),
        ] {
            let payload = encode(&key, &merchant, &payment);
            assert!(!payload.contains("5303986540"), "{payload}");
            assert!(payload.contains("53039865802BR"), "{payload}");
        }
    }

    #[test]
    fn oversized_amount_is_left_to_the_payer() {
        let (key, merchant, _) = joao();
        let payment = PaymentRequest::new().with_amount(Amount::from_cents(u64::MAX));

        let payload = encode(&key, &merchant, &payment);
        assert!(payload.contains("53039865802BR"));
    }

    #[test]
    fn missing_txid_is_three_asterisks() {
        let (key, merchant, _) = joao();

        for txid in [None, Some(""), Some("***"), Some("---")] {
            let payment = PaymentRequest { txid: txid.map(str::to_string), ..Default::default() };
            let payload = encode(&key, &merchant, &payment);
            assert!(payload.contains("62070503***6304"), "{payload}");
        }
    }

    #[test]
    fn long_inputs_are_truncated() {
        let payload = encode(
            &PixKey::Random(RANDOM_KEY.into()),
            &MerchantInfo::new("Mestre das Contas Calculadoras Ltda", "São José dos Campos"),
            &PaymentRequest::new().with_txid("A".repeat(40)),
        );

        assert!(payload.contains("5925MESTRE DAS CONTAS CALCULA"));
        assert!(payload.contains("6015SAO JOSE DOS CA"));
        assert!(payload.contains(&format!("62290525{}", "A".repeat(25))));
    }

    #[test]
    fn multibyte_keys_never_break_the_preview() {
        let merchant = MerchantInfo::new("Joao", "Recife");

        for key in [PixKey::Random("ç".repeat(40)), PixKey::Email("ã".repeat(77))] {
            let payload = encode(&key, &merchant, &PaymentRequest::new().with_description("Doação"));

            assert!(payload.is_ascii(), "{payload}");
            assert!(crate::decode::decode(&payload).is_ok(), "{payload}");
        }

        let payload = encode(&PixKey::Random("ç".repeat(40)), &merchant, &PaymentRequest::default());
        assert!(payload.contains(&format!("0140{}", "c".repeat(40))));
    }

    #[test]
    fn non_ascii_key_is_refused_by_strict() {
        let key = PixKey::Email("joão@ex.com".into());
        let (_, merchant, payment) = joao();

        assert_eq!(
            encode_strict(&key, &merchant, &payment),
            Err(ValidationError::InvalidKeyFormat {
                key_type: KeyType::Email,
                source: KeyError::NonAscii,
            })
        );
    }

    #[test]
    fn bare_parts_always_assemble() {
        let parts = Parts {
            key: "k".repeat(200),
            name: "RECEBEDOR".to_string(),
            city: "SAO PAULO".to_string(),
            amount: None,
            txid: Some("T".repeat(200)),
            description: Some("d".repeat(200)),
        };

        assert!(parts.assemble().is_err());

        let payload = parts.without_optional_fields().assemble().unwrap();
        assert!(payload.contains("26220014br.gov.bcb.pix0100"));
        assert!(payload.contains("62070503***6304"));
    }

    #[test]
    fn encoding_is_deterministic() {
        let (key, merchant, payment) = joao();
        assert_eq!(encode(&key, &merchant, &payment), encode(&key, &merchant, &payment));
    }

    #[test]
    fn payload_has_no_whitespace_outside_text_fields() {
        let (key, merchant, payment) = joao();
        let payload = encode(&key, &merchant, &payment);

        assert!(!payload.contains('\n'));
        assert!(payload.ends_with("596F"));
    }

    #[test]
    fn strict_matches_lenient_for_valid_input() {
        let (key, merchant, payment) = joao();

        assert_eq!(validate(&key, &merchant, &payment), vec![]);
        assert_eq!(encode_strict(&key, &merchant, &payment).unwrap(), encode(&key, &merchant, &payment));
    }

    #[test]
    fn strict_refuses_placeholders() {
        let (key, _, payment) = joao();
        let error = encode_strict(&key, &MerchantInfo::default(), &payment).unwrap_err();
        assert_eq!(error, ValidationError::MissingField(Field::Name));

        let errors = validate(&PixKey::Cpf(String::new()), &MerchantInfo::default(), &payment);
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingField(Field::Key),
                ValidationError::MissingField(Field::Name),
                ValidationError::MissingField(Field::City),
            ]
        );
    }

    #[test]
    fn strict_refuses_truncation() {
        let (key, _, payment) = joao();
        let merchant = MerchantInfo::new("Mestre das Contas Calculadoras Ltda", "São Paulo");

        assert_eq!(
            encode_strict(&key, &merchant, &payment).unwrap_err(),
            ValidationError::FieldTooLong { field: Field::Name, max: 25, actual: 35 }
        );
    }

    #[test]
    fn strict_reports_key_problems() {
        let (_, merchant, payment) = joao();
        let key = PixKey::Cpf("529.982.247-24".into());

        assert_eq!(
            encode_strict(&key, &merchant, &payment).unwrap_err(),
            ValidationError::InvalidKeyFormat {
                key_type: KeyType::Cpf,
                source: KeyError::BadCheckDigits(KeyType::Cpf),
            }
        );

        // lenient still renders something
        assert!(encode(&key, &merchant, &payment).contains("011152998224724"));
    }

    #[test]
    fn strict_checks_txid_amount_and_description() {
        let (key, merchant, _) = joao();

        let payment = PaymentRequest::new().with_txid("PEDIDO-1");
        assert_eq!(validate(&key, &merchant, &payment), vec![ValidationError::InvalidTxid]);

        let payment = PaymentRequest::new().with_amount(Amount::from_cents(u64::MAX));
        assert_eq!(
            validate(&key, &merchant, &payment),
            vec![ValidationError::AmountOutOfRange(Amount::from_cents(u64::MAX))]
        );

        let payment = PaymentRequest::new().with_description("x".repeat(80));
        assert_eq!(
            validate(&key, &merchant, &payment),
            vec![ValidationError::FieldTooLong { field: Field::Description, max: 62, actual: 80 }]
        );
    }

    #[test]
    fn strict_accepts_the_placeholder_txid() {
        let (key, merchant, _) = joao();
        let payment = PaymentRequest::new().with_txid("***");

        let payload = encode_strict(&key, &merchant, &payment).unwrap();
        assert!(payload.contains("62070503***"));
    }
}
