//! Price and mileage parsing

use once_cell::sync::Lazy;
use regex::Regex;

/// A digit group (possibly split by spaces) followed by "км" or "тыс"
static MILEAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\s*\d+)*)\s*(?:км|тыс)").unwrap());

/// Parses a price string by keeping only its digits
///
/// Separators, currency signs and words are dropped. Returns 0 when nothing
/// numeric remains, which callers treat as "price unknown".
///
/// # Example
///
/// ```
/// use lot_harvester::text::parse_price;
///
/// assert_eq!(parse_price("2 490 000 ₽"), 2_490_000);
/// assert_eq!(parse_price("n/a"), 0);
/// ```
pub fn parse_price(text: &str) -> u64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Parses a mileage phrase into kilometers
///
/// Looks for the first number followed by a distance marker ("км") or the
/// "thousand" abbreviation ("тыс"), case-insensitively. Whitespace inside the
/// number is removed, so "121 900 км" reads as 121900.
///
/// Numbers below 1000 are taken to be in thousands: "120 тыс" is 120000 km.
/// This also turns a genuine "500 км" into 500000; the ambiguity is accepted.
pub fn parse_mileage(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    let captures = MILEAGE_RE.captures(&lowered)?;

    let digits: String = captures[1].chars().filter(|c| !c.is_whitespace()).collect();
    let mileage: u32 = digits.parse().ok()?;

    if mileage < 1000 {
        mileage.checked_mul(1000)
    } else {
        Some(mileage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_with_separators() {
        assert_eq!(parse_price("2 490 000 ₽"), 2_490_000);
        assert_eq!(parse_price("1,250,000 руб."), 1_250_000);
        assert_eq!(parse_price("\u{a0}990\u{a0}000\u{a0}₽"), 990_000);
    }

    #[test]
    fn test_parse_price_plain_digits() {
        assert_eq!(parse_price("3500000"), 3_500_000);
    }

    #[test]
    fn test_parse_price_no_digits() {
        assert_eq!(parse_price("n/a"), 0);
        assert_eq!(parse_price(""), 0);
        assert_eq!(parse_price("Цена договорная"), 0);
    }

    #[test]
    fn test_parse_price_overflow_is_unknown() {
        assert_eq!(parse_price("99999999999999999999999"), 0);
    }

    #[test]
    fn test_parse_mileage_with_spaces() {
        assert_eq!(parse_mileage("121 900 км"), Some(121_900));
    }

    #[test]
    fn test_parse_mileage_thousands_marker() {
        assert_eq!(parse_mileage("120 тыс"), Some(120_000));
        assert_eq!(parse_mileage("пробег 85 тыс. км"), Some(85_000));
    }

    #[test]
    fn test_parse_mileage_case_insensitive() {
        assert_eq!(parse_mileage("45 000 КМ"), Some(45_000));
    }

    #[test]
    fn test_parse_mileage_inside_title() {
        assert_eq!(
            parse_mileage("BMW 5 серия 2.0 AT, 2017, 121 900 км"),
            Some(121_900)
        );
    }

    #[test]
    fn test_parse_mileage_non_breaking_space() {
        assert_eq!(parse_mileage("98\u{a0}500\u{a0}км"), Some(98_500));
    }

    #[test]
    fn test_parse_mileage_no_marker() {
        assert_eq!(parse_mileage("BMW X5 3.0 AT, 2019"), None);
        assert_eq!(parse_mileage(""), None);
        assert_eq!(parse_mileage("121 900 miles"), None);
    }
}
