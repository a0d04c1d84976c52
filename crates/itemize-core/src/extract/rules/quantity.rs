//! Quantity parsing and proximity-based quantity recovery.

use super::patterns::{
    DECIMAL_QUANTITY, INTEGER_TOKEN, LETTER_CODE_TOKEN, SHIPPED_EACH, SHIPPED_LO_EACH,
    SHIPPED_SET, THREE_DIGIT_TOKEN, TWO_DIGIT_TOKEN,
};

/// Collapse a whole-valued quantity to integer form ("24.0" becomes "24"),
/// keep real fractions as-is ("4.25").
fn collapse(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Re-parse a declared quantity property, keeping zero values.
pub fn parse_quantity(raw: &str) -> Option<String> {
    let caps = DECIMAL_QUANTITY.captures(raw)?;
    let value: f64 = caps[1].parse().ok()?;
    Some(collapse(value))
}

/// Re-parse a declared quantity property, rejecting zero and negatives.
pub fn parse_positive_quantity(raw: &str) -> Option<String> {
    let caps = DECIMAL_QUANTITY.captures(raw)?;
    let value: f64 = caps[1].parse().ok()?;
    if value > 0.0 { Some(collapse(value)) } else { None }
}

/// Two-pass shipped-quantity scan over whitespace-separated tokens.
///
/// The first pass skips product-code remnants (bare 3-digit and 2-4 letter
/// tokens) and integers that are the leading half of a split decimal price
/// ("16 50"); the second pass takes any small integer at all.
pub fn extract_shipped_quantity(text: &str) -> Option<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    for (i, token) in tokens.iter().enumerate() {
        if THREE_DIGIT_TOKEN.is_match(token) || LETTER_CODE_TOKEN.is_match(token) {
            continue;
        }
        if INTEGER_TOKEN.is_match(token) && token.len() <= 3 {
            if let Ok(num) = token.parse::<u64>() {
                if (1..=999).contains(&num) {
                    if let Some(next) = tokens.get(i + 1) {
                        if TWO_DIGIT_TOKEN.is_match(next) {
                            continue;
                        }
                    }
                    return Some(num.to_string());
                }
            }
        }
    }

    for token in &tokens {
        if INTEGER_TOKEN.is_match(token) && token.len() <= 3 {
            if let Ok(num) = token.parse::<u64>() {
                if (1..=999).contains(&num) {
                    return Some(num.to_string());
                }
            }
        }
    }

    None
}

/// Recover a shipped quantity near a product code.
///
/// Collects every "shipped back uom" idiom ("8 0 lo each", "6 0 Set",
/// "24 0 each") with its distance to the code occurrence, then takes the
/// closest positive count, falling back to the closest match of any value.
pub fn extract_quantity_near_code(text: &str, product_code: &str) -> Option<String> {
    let code_pos = text.find(product_code)?;

    let mut candidates: Vec<(usize, u64)> = Vec::new();
    for pattern in [&*SHIPPED_LO_EACH, &*SHIPPED_SET, &*SHIPPED_EACH] {
        for caps in pattern.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            if let Ok(shipped) = caps[1].parse::<u64>() {
                candidates.push((whole.start().abs_diff(code_pos), shipped));
            }
        }
    }
    candidates.sort_by_key(|(distance, _)| *distance);

    if let Some((_, shipped)) = candidates.iter().find(|(_, shipped)| *shipped > 0) {
        return Some(shipped.to_string());
    }
    candidates.first().map(|(_, shipped)| shipped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_collapses_integral() {
        assert_eq!(parse_quantity("6.00"), Some("6".to_string()));
        assert_eq!(parse_quantity("4 EA"), Some("4".to_string()));
        assert_eq!(parse_quantity("4.25"), Some("4.25".to_string()));
        assert_eq!(parse_quantity("0"), Some("0".to_string()));
        assert_eq!(parse_quantity("none"), None);
    }

    #[test]
    fn test_parse_positive_quantity_rejects_zero() {
        assert_eq!(parse_positive_quantity("0"), None);
        assert_eq!(parse_positive_quantity("0.00"), None);
        assert_eq!(parse_positive_quantity("3"), Some("3".to_string()));
    }

    #[test]
    fn test_shipped_second_pass_accepts_remnants() {
        // Pass one skips "006", "AR" and the split price "8 00"; the
        // lenient pass then reads "006" as 6.
        assert_eq!(
            extract_shipped_quantity("006 AR 8 00 16.50 132.00"),
            Some("6".to_string())
        );
    }

    #[test]
    fn test_shipped_takes_first_clean_integer() {
        assert_eq!(
            extract_shipped_quantity("DF8011 Vase 24 192.00"),
            Some("24".to_string())
        );
        assert_eq!(extract_shipped_quantity("no numbers here"), None);
    }

    #[test]
    fn test_near_code_prefers_positive() {
        let text = "DA1234 8 0 lo each DB5678 0 0 each";
        assert_eq!(
            extract_quantity_near_code(text, "DB5678"),
            Some("8".to_string())
        );
    }

    #[test]
    fn test_near_code_falls_back_to_closest_zero() {
        let text = "DA1234 0 0 each elsewhere 0 0 Set";
        assert_eq!(
            extract_quantity_near_code(text, "DA1234"),
            Some("0".to_string())
        );
    }

    #[test]
    fn test_near_code_requires_code_occurrence() {
        assert_eq!(extract_quantity_near_code("8 0 lo each", "ZZ9999"), None);
    }
}
