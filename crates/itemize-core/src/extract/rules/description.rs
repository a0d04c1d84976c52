//! Description cleaning and context recovery.

use regex::Regex;

use super::patterns::{
    CTX_CAPITALIZED, CTX_DIMENSION, CTX_SET, DESC_CAPITALIZED, DESC_DIMENSION, DESC_QUOTED,
    DESC_SET_PREFIX, NUMERIC_DOTTED_LINE, PRICE_ANY, QTY_IDIOM_EACH, QTY_IDIOM_SET, UPC_ANY,
};

/// Case-insensitive whole-word test with a dynamically escaped needle.
fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Strip an escaped word from text, case-insensitively.
fn strip_word(text: &str, word: &str) -> String {
    if word.is_empty() {
        return text.to_string();
    }
    match Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))) {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.to_string(),
    }
}

fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a raw item description.
///
/// First tries to lift a structured phrase out of the text - "S/3" set
/// prefixes, dimension phrases, long capitalized runs, quoted spans - that
/// does not itself contain the product code or a UPC run. When none
/// qualifies, falls back to stripping code, UPC runs, prices, and quantity
/// idioms from the raw text.
pub fn clean_item_description(description: &str, product_code: &str) -> String {
    if description.is_empty() {
        return String::new();
    }
    let original = description.trim();

    let mut clean = String::new();
    let phrase_patterns: [&Regex; 4] = [
        &DESC_SET_PREFIX,
        &DESC_DIMENSION,
        &DESC_CAPITALIZED,
        &DESC_QUOTED,
    ];
    'patterns: for pattern in phrase_patterns {
        for caps in pattern.captures_iter(original) {
            let candidate = caps.get(1).unwrap().as_str().trim();
            if !contains_word(candidate, product_code)
                && !UPC_ANY.is_match(candidate)
                && candidate.len() > 10
            {
                clean = candidate.to_string();
                break 'patterns;
            }
        }
    }

    if clean.len() < 5 {
        let mut stripped = strip_word(original, product_code);
        stripped = UPC_ANY.replace_all(&stripped, "").into_owned();
        stripped = PRICE_ANY.replace_all(&stripped, "").into_owned();
        stripped = QTY_IDIOM_EACH.replace_all(&stripped, "").into_owned();
        stripped = QTY_IDIOM_SET.replace_all(&stripped, "").into_owned();
        clean = normalize_ws(&stripped)
            .trim_matches(&[' ', '-', '\n', '\r'][..])
            .to_string();
    }

    normalize_ws(&clean)
        .trim_matches(&[' ', '-', '\n', '\r'][..])
        .to_string()
}

/// Recover a description from the snippet around a code when the declared
/// one is unusable.
///
/// The line right before the code occurrence wins when it reads like prose;
/// for codes opening the snippet, structured phrases are searched instead,
/// and the plain cleaner is the last resort.
pub fn extract_description_from_context(full_text: &str, product_code: &str) -> String {
    let lines: Vec<&str> = full_text.split('\n').collect();

    let code_line_idx = if product_code.is_empty() {
        None
    } else {
        lines.iter().position(|line| line.contains(product_code))
    };

    if let Some(idx) = code_line_idx {
        if idx > 0 {
            let candidate = lines[idx - 1].trim();
            if candidate.len() > 10
                && !NUMERIC_DOTTED_LINE.is_match(candidate)
                && !UPC_ANY.is_match(candidate)
            {
                return candidate.to_string();
            }
        }
    }

    if code_line_idx.is_none_or(|idx| idx == 0) {
        for pattern in [&*CTX_DIMENSION, &*CTX_SET, &*CTX_CAPITALIZED] {
            for caps in pattern.captures_iter(full_text) {
                let candidate = caps.get(1).unwrap().as_str().trim();
                if !contains_word(candidate, product_code)
                    && !UPC_ANY.is_match(candidate)
                    && candidate.len() > 15
                {
                    return candidate.to_string();
                }
            }
        }
    }

    clean_item_description(full_text, product_code)
}
