//! Tag-length-value fields of the EMV QR text format
//!
//! Every field is a two digit id, a two digit decimal length and the value. Templates
//! (`26`, `62`) carry another TLV stream as their value, so one recursive type covers both

use winnow::{
    ModalResult, Parser,
    combinator::repeat,
    token::{take, take_while},
};

use crate::field::MAX_VALUE_LEN;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TlvError {
    #[error("field {id:02} value is {len} bytes long, max is 99")]
    ValueTooLong { id: u8, len: usize },

    #[error("malformed TLV field at offset {offset}")]
    Malformed { offset: usize },
}

type Result<T, E = TlvError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlvValue {
    Text(String),
    Template(Vec<Tlv>),
}

/// A field being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tlv {
    pub id: u8,
    pub value: TlvValue,
}

impl Tlv {
    pub fn text(id: u8, value: impl Into<String>) -> Self {
        Self { id, value: TlvValue::Text(value.into()) }
    }

    pub fn template(id: u8, children: Vec<Tlv>) -> Self {
        Self { id, value: TlvValue::Template(children) }
    }

    /// Appends `id || len || value` to `out`
    pub fn encode_into(&self, out: &mut String) -> Result<()> {
        let nested;
        let value = match &self.value {
            TlvValue::Text(text) => text.as_str(),
            TlvValue::Template(children) => {
                nested = encode_all(children)?;
                nested.as_str()
            }
        };

        if value.len() > MAX_VALUE_LEN {
            return Err(TlvError::ValueTooLong { id: self.id, len: value.len() });
        }

        out.push_str(&format!("{:02}{:02}", self.id, value.len()));
        out.push_str(value);
        Ok(())
    }

    pub fn encode(&self) -> Result<String> {
        let mut out = String::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }
}

pub fn encode_all(fields: &[Tlv]) -> Result<String> {
    let mut out = String::new();
    for field in fields {
        field.encode_into(&mut out)?;
    }

    Ok(out)
}

/// A field read back from a payload, borrowing from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlvField<'a> {
    pub id: u8,
    pub value: &'a str,
}

impl<'a> TlvField<'a> {
    /// Reads the value as a nested TLV stream
    pub fn children(&self) -> Result<Vec<TlvField<'a>>> {
        parse_fields(self.value)
    }
}

/// Splits `input` into its top level fields
///
/// Lengths count characters, callers are expected to hand in ASCII only
pub fn parse_fields(input: &str) -> Result<Vec<TlvField<'_>>> {
    repeat(0.., parse_field)
        .parse(input)
        .map_err(|error| TlvError::Malformed { offset: error.offset() })
}

pub fn find<'a, 'f>(fields: &'f [TlvField<'a>], id: u8) -> Option<&'f TlvField<'a>> {
    fields.iter().find(|field| field.id == id)
}

// private
fn parse_field<'i>(input: &mut &'i str) -> ModalResult<TlvField<'i>> {
    let id = parse_two_digits.parse_next(input)?;
    let len = parse_two_digits.parse_next(input)?;
    let value = take(len as usize).parse_next(input)?;

    Ok(TlvField { id, value })
}

fn parse_two_digits(input: &mut &str) -> ModalResult<u8> {
    take_while(2, '0'..='9').parse_to().parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_field_is_zero_padded() {
        assert_eq!(Tlv::text(0, "01").encode().unwrap(), "000201");
        assert_eq!(Tlv::text(58, "BR").encode().unwrap(), "5802BR");
        assert_eq!(Tlv::text(59, "").encode().unwrap(), "5900");
    }

    #[test]
    fn template_length_is_computed_from_children() {
        let template = Tlv::template(
            26,
            vec![Tlv::text(0, "br.gov.bcb.pix"), Tlv::text(1, "joao@ex.com")],
        );

        assert_eq!(template.encode().unwrap(), "26330014br.gov.bcb.pix0111joao@ex.com");
    }

    #[test]
    fn nested_templates_recurse() {
        let inner = Tlv::template(1, vec![Tlv::text(5, "AB")]);
        let outer = Tlv::template(62, vec![inner]);

        assert_eq!(outer.encode().unwrap(), "621001060502AB");
    }

    #[test]
    fn value_over_99_bytes_is_rejected() {
        let long = "A".repeat(100);
        let error = Tlv::text(59, long).encode().unwrap_err();
        assert_eq!(error, TlvError::ValueTooLong { id: 59, len: 100 });

        assert!(Tlv::text(59, "A".repeat(99)).encode().is_ok());
    }

    #[test]
    fn oversized_child_fails_the_whole_template() {
        let template = Tlv::template(26, vec![Tlv::text(1, "A".repeat(98))]);
        assert!(matches!(template.encode(), Err(TlvError::ValueTooLong { id: 26, len: 102 })));
    }

    #[test]
    fn parses_flat_stream() {
        let fields = parse_fields("0002015802BR5909RECEBEDOR").unwrap();

        assert_eq!(
            fields,
            vec![
                TlvField { id: 0, value: "01" },
                TlvField { id: 58, value: "BR" },
                TlvField { id: 59, value: "RECEBEDOR" },
            ]
        );
    }

    #[test]
    fn parses_nested_template() {
        let fields = parse_fields("26330014br.gov.bcb.pix0111joao@ex.com").unwrap();
        assert_eq!(fields.len(), 1);

        let children = fields[0].children().unwrap();
        assert_eq!(find(&children, 0).unwrap().value, "br.gov.bcb.pix");
        assert_eq!(find(&children, 1).unwrap().value, "joao@ex.com");
        assert!(find(&children, 2).is_none());
    }

    #[test]
    fn empty_input_has_no_fields() {
        assert_eq!(parse_fields("").unwrap(), vec![]);
    }

    #[test]
    fn length_past_end_is_malformed() {
        // 59 claims 20 characters, only 9 remain
        let error = parse_fields("0002015920RECEBEDOR").unwrap_err();
        assert_eq!(error, TlvError::Malformed { offset: 6 });
    }

    #[test]
    fn non_digit_length_is_malformed() {
        let error = parse_fields("00020158XXBR").unwrap_err();
        assert_eq!(error, TlvError::Malformed { offset: 6 });
    }

    #[test]
    fn dangling_bytes_are_malformed() {
        let error = parse_fields("00020158").unwrap_err();
        assert_eq!(error, TlvError::Malformed { offset: 6 });
    }

    #[test]
    fn encode_then_parse_keeps_ids_and_values() {
        let fields = vec![
            Tlv::text(0, "01"),
            Tlv::template(62, vec![Tlv::text(5, "***")]),
            Tlv::text(60, "SAO PAULO"),
        ];

        let encoded = encode_all(&fields).unwrap();
        let parsed = parse_fields(&encoded).unwrap();

        assert_eq!(parsed.iter().map(|field| field.id).collect::<Vec<_>>(), vec![0, 62, 60]);
        assert_eq!(parsed[1].children().unwrap(), vec![TlvField { id: 5, value: "***" }]);
        assert_eq!(parsed[2].value, "SAO PAULO");
    }
}
