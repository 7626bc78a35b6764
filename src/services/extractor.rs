use crate::error::ParseError;

/// Extract a meter value from one line of recognized text.
///
/// Keeps every ASCII decimal digit in original order, drops everything
/// else, and parses the concatenation as a base-10 integer. Sign and
/// decimal separators are discarded along with the rest: "12.5" reads
/// as 125 and "-3" as 3. This mirrors the deployed extraction rule;
/// downstream consumers depend on it.
pub fn extract_reading(text: &str) -> Result<i32, ParseError> {
    let digits: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return Err(ParseError::NoDigits {
            text: text.to_string(),
        });
    }

    digits
        .parse::<i32>()
        .map_err(|_| ParseError::Overflow { digits })
}
