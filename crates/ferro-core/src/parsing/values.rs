use crate::error::FerroError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// A number as printed in gazettes and record sheets: ASCII digits with
/// optional grouping commas (western or Indian grouping) and an optional
/// fraction.
pub static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+(?:,[0-9]+)*(?:\.[0-9]+)?").expect("valid number regex")
});

/// The gazette's "not available" marker: NA, N.A., N/A.
pub static NA_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bn(?:\.\s?|/)?a\b\.?").expect("valid NA regex"));

static BARE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(?:,[0-9]+)*(?:\.[0-9]+)?$").expect("valid bare number regex")
});

/// Parse a monetary amount or quantity, stripping grouping separators.
///
/// - "3,000" -> 3000
/// - "1,23,456.50" -> 123456.50
/// - "4 500" -> 4500
pub fn parse_amount(s: &str) -> Result<Decimal, FerroError> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    Decimal::from_str(&cleaned)
        .map_err(|e| FerroError::ParseError(format!("invalid amount '{}': {}", s.trim(), e)))
}

/// True if the text is nothing but a "not available" style marker.
pub fn is_not_available(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "" | "na" | "n.a." | "n.a" | "n/a" | "nil" | "nan" | "-"
    )
}

/// True if the whole line is a single number (a price wrapped onto its own line).
pub fn is_bare_number(s: &str) -> bool {
    BARE_NUMBER.is_match(s.trim())
}

/// Parse a record quantity. Never fails: unparseable, "not available" and
/// negative quantities become zero.
pub fn parse_quantity(s: &str) -> Decimal {
    if is_not_available(s) {
        return Decimal::ZERO;
    }
    match parse_amount(s) {
        Ok(q) if q.is_sign_negative() => Decimal::ZERO,
        Ok(q) => q,
        Err(_) => {
            log::debug!("unparseable quantity '{}', treating as zero", s.trim());
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_plain() {
        assert_eq!(parse_amount("650").unwrap(), dec!(650));
    }

    #[test]
    fn test_parse_amount_grouped() {
        assert_eq!(parse_amount("3,000").unwrap(), dec!(3000));
        assert_eq!(parse_amount("1,23,456.50").unwrap(), dec!(123456.50));
        assert_eq!(parse_amount(" 4 500 ").unwrap(), dec!(4500));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_not_available_markers() {
        for s in ["NA", "n.a.", "N/A", "nil", "NaN", "", "  ", "-"] {
            assert!(is_not_available(s), "{s:?}");
        }
        assert!(!is_not_available("100"));
    }

    #[test]
    fn test_na_marker_regex() {
        assert!(NA_MARKER.is_match("NA"));
        assert!(NA_MARKER.is_match("65% and above   N.A."));
        assert!(NA_MARKER.is_match("n/a"));
        assert!(!NA_MARKER.is_match("Goa"));
        assert!(!NA_MARKER.is_match("Karnataka"));
        assert!(!NA_MARKER.is_match("National"));
    }

    #[test]
    fn test_bare_number() {
        assert!(is_bare_number(" 4,250 "));
        assert!(is_bare_number("650.5"));
        assert!(!is_bare_number("62% 650"));
    }

    #[test]
    fn test_non_ascii_digits_are_not_numbers() {
        assert!(!is_bare_number("６５０"));
        assert!(NUMBER.find("६२").is_none());
        assert_eq!(parse_quantity("１００"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("1,000"), dec!(1000));
        assert_eq!(parse_quantity("12.5"), dec!(12.5));
        assert_eq!(parse_quantity("NA"), Decimal::ZERO);
        assert_eq!(parse_quantity("nil"), Decimal::ZERO);
        assert_eq!(parse_quantity("lots"), Decimal::ZERO);
        assert_eq!(parse_quantity("-5"), Decimal::ZERO);
    }
}
