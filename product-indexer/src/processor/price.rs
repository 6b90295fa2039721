//! Free-form price parsing.

use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::errors::IngestError;

/// Marker used to detect `"$low - $high"` ranges.
const RANGE_CURRENCY: char = '$';

/// Parse a feed price string into a canonical decimal.
///
/// Blank input is absent, not an error. When the text holds more than one `$`
/// it is read as a range and only the part before the last `$` is kept. Every
/// character other than ASCII digits and `.` is then stripped and the rest is
/// parsed. Ranges written with other currency symbols are not detected.
///
/// # Example
///
/// ```
/// use product_indexer::processor::normalize_price;
///
/// let price = normalize_price(Some("$9.39 - $49.33")).unwrap().unwrap();
/// assert_eq!(price.to_string(), "9.39");
/// assert!(normalize_price(Some("   ")).unwrap().is_none());
/// ```
pub fn normalize_price(raw: Option<&str>) -> Result<Option<BigDecimal>, IngestError> {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    let retained = match (raw.find(RANGE_CURRENCY), raw.rfind(RANGE_CURRENCY)) {
        (Some(first), Some(last)) if first != last => &raw[..last],
        _ => raw,
    };

    let cleaned: String = retained
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) || cleaned.matches('.').count() > 1 {
        return Err(IngestError::invalid_price(raw));
    }

    BigDecimal::from_str(&cleaned)
        .map(Some)
        .map_err(|_| IngestError::invalid_price(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_valid_prices() {
        let cases = [
            ("$12.99", "12.99", "dollar sign"),
            ("€25.50", "25.50", "euro symbol"),
            ("£15.75", "15.75", "pound symbol"),
            ("15.75", "15.75", "no currency symbol"),
            ("  $  18.99  ", "18.99", "surrounding whitespace"),
            ("¥1000.00", "1000.00", "yen symbol"),
            ("$0.99", "0.99", "under one dollar"),
            ("$1000000.00", "1000000.00", "large amount"),
            ("$9.39 - $49.33", "9.39", "range keeps the low value"),
            ("$1,299.00", "1299.00", "thousands separator"),
        ];

        for (input, expected, description) in cases {
            let result = normalize_price(Some(input)).unwrap();
            assert_eq!(result, Some(decimal(expected)), "{}", description);
        }
    }

    #[test]
    fn test_empty_prices_are_absent() {
        assert!(normalize_price(None).unwrap().is_none());
        assert!(normalize_price(Some("")).unwrap().is_none());
        assert!(normalize_price(Some("   ")).unwrap().is_none());
    }

    #[test]
    fn test_invalid_prices() {
        let cases = [
            ("$abc.def", "letters after currency"),
            ("not-a-price", "no digits at all"),
            ("$", "currency symbol only"),
            ("12.34.56", "multiple decimal points"),
            ("$12.34.56", "multiple decimal points with currency"),
        ];

        for (input, description) in cases {
            let err = normalize_price(Some(input)).unwrap_err();
            assert!(
                matches!(err, IngestError::InvalidPriceFormat(ref raw) if raw == input),
                "{}",
                description
            );
            assert!(err.to_string().contains("Unable to parse price"));
        }
    }

    #[test]
    fn test_normalizing_a_normalized_price_is_stable() {
        let first = normalize_price(Some("12.99")).unwrap().unwrap();
        let second = normalize_price(Some(&first.to_string())).unwrap().unwrap();

        assert_eq!(first, decimal("12.99"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_range_with_other_currency_is_not_split() {
        // Only `$` marks a range, so both bounds run together.
        assert_eq!(
            normalize_price(Some("€9 - €49")).unwrap(),
            Some(decimal("949"))
        );
    }
}
