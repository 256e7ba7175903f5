pub mod result_ext;

/// Splits an amount string around its first `.`
///
/// Returns `(before, ".", after)`, or `(amount, "", "")` when there is no decimal point
pub fn split_at_decimal_point(amount: &str) -> (&str, &str, &str) {
    let decimal_index = match memchr::memchr(b'.', amount.as_bytes()) {
        Some(decimal_index) => decimal_index,
        None => return (amount, "", ""),
    };

    let before_decimal = &amount[..decimal_index];
    let after_decimal = &amount[decimal_index + 1..];
    (before_decimal, ".", after_decimal)
}

/// Keeps only the ASCII digits of `input`
pub fn only_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Cuts `input` down to at most `max` characters, never splitting a char
pub fn truncate_chars(input: &str, max: usize) -> &str {
    match input.char_indices().nth(max) {
        Some((byte_index, _)) => &input[..byte_index],
        None => input,
    }
}
