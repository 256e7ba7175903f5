//! Text clean-up for the EMV text fields, which only allow basic latin characters

use mestre_util::truncate_chars;
use unicode_normalization::{UnicodeNormalization as _, char::is_combining_mark};

use crate::field::{MAX_KEY_LEN, MAX_TXID_LEN};

/// "São Paulo" -> "Sao Paulo"
pub fn strip_diacritics(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Upper-cases, strips accents, drops anything that is not printable ASCII and only then
/// truncates to `max` characters
pub fn normalize_merchant_text(input: &str, max: usize) -> String {
    let upper = input.to_uppercase();
    let ascii: String = strip_diacritics(&upper).chars().filter(is_printable_ascii).collect();

    truncate_chars(ascii.trim(), max).trim_end().to_string()
}

/// Keeps only ASCII letters and digits, the txid alphabet
///
/// `None` when nothing usable is left
pub fn sanitize_txid(input: &str) -> Option<String> {
    let txid: String =
        strip_diacritics(input).chars().filter(char::is_ascii_alphanumeric).collect();

    if txid.is_empty() {
        return None;
    }

    Some(truncate_chars(&txid, MAX_TXID_LEN).to_string())
}

/// Free text that keeps its case, used for the payment description
pub fn sanitize_free_text(input: &str, max: usize) -> Option<String> {
    let ascii: String = strip_diacritics(input).chars().filter(is_printable_ascii).collect();
    let text = truncate_chars(ascii.trim(), max).trim_end();

    if text.is_empty() {
        return None;
    }

    Some(text.to_string())
}

/// The key as the lenient encoder puts it on the wire, accents stripped, other non ASCII
/// and whitespace dropped, at most 77 characters
pub fn sanitize_key(input: &str) -> String {
    let ascii: String = strip_diacritics(input).chars().filter(char::is_ascii_graphic).collect();
    truncate_chars(&ascii, MAX_KEY_LEN).to_string()
}

pub fn is_printable_ascii(c: &char) -> bool {
    c.is_ascii_graphic() || *c == ' '
}
