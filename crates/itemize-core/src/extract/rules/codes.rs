//! Product-code and UPC location.

use super::patterns::{PREFIXED_NUMERIC_CODE, SHORT_ALPHANUMERIC_CODE, UPC_RUN};
use super::{window, ExtractionMatch, FieldExtractor};
use crate::models::config::UpcConfig;

/// Longest token still treated as a product code; longer matches are UPC
/// fragments.
const MAX_CODE_LEN: usize = 10;

/// Prepend the leading zero that 12-digit UPCs drop in print.
pub fn normalize_upc(run: &str) -> String {
    if run.len() == 12 && !run.starts_with('0') {
        format!("0{run}")
    } else {
        run.to_string()
    }
}

/// Locate a short product code.
///
/// Digit-prefixed codes ("006 AR") are only trusted when they appear in the
/// raw snippet; letter-digit codes ("DF8011", "DG0110A") are searched across
/// the declared description first, then the snippet.
pub fn extract_short_product_code(full_text: &str, description: &str) -> Option<String> {
    if let Some(caps) = PREFIXED_NUMERIC_CODE.captures(full_text) {
        return Some(caps[1].to_string());
    }

    let combined = format!("{description} {full_text}");
    SHORT_ALPHANUMERIC_CODE
        .captures_iter(&combined)
        .map(|caps| caps[1].to_string())
        .find(|code| code.len() <= MAX_CODE_LEN)
}

/// UPC run extractor with optional code-anchored search windows.
///
/// With an anchor set, the text right after the code is searched first,
/// then a window around it, then the whole text; every hit is normalized to
/// 13 digits.
pub struct UpcExtractor {
    after_window: usize,
    around_window: usize,
    anchor: Option<String>,
}

impl UpcExtractor {
    pub fn new() -> Self {
        let defaults = UpcConfig::default();
        Self {
            after_window: defaults.after_code_window,
            around_window: defaults.around_code_window,
            anchor: None,
        }
    }

    /// Set the search windows from configuration.
    pub fn with_windows(mut self, config: &UpcConfig) -> Self {
        self.after_window = config.after_code_window;
        self.around_window = config.around_code_window;
        self
    }

    /// Anchor the search on a product code occurrence.
    pub fn with_anchor(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.anchor = if code.is_empty() { None } else { Some(code) };
        self
    }

    fn first_run(text: &str) -> Option<String> {
        UPC_RUN.captures(text).map(|caps| normalize_upc(&caps[1]))
    }
}

impl Default for UpcExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for UpcExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if let Some(code) = &self.anchor {
            if let Some(code_pos) = text.find(code.as_str()) {
                let code_end = code_pos + code.len();

                let after = window(text, code_end, code_end + self.after_window);
                if let Some(upc) = Self::first_run(after) {
                    return Some(ExtractionMatch::new(upc, "after code"));
                }

                let around = window(
                    text,
                    code_pos.saturating_sub(self.around_window),
                    code_pos + self.around_window,
                );
                if let Some(upc) = Self::first_run(around) {
                    return Some(ExtractionMatch::new(upc, "around code"));
                }
            }
        }
        Self::first_run(text).map(|upc| ExtractionMatch::new(upc, "full text"))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        UPC_RUN
            .captures_iter(text)
            .map(|caps| {
                let group = caps.get(1).unwrap();
                ExtractionMatch::new(normalize_upc(group.as_str()), group.as_str())
                    .with_position(group.start(), group.end())
            })
            .collect()
    }
}

/// Find the UPC belonging to a product code, nearest occurrence first.
pub fn extract_upc_near_code(text: &str, product_code: &str, config: &UpcConfig) -> Option<String> {
    UpcExtractor::new()
        .with_windows(config)
        .with_anchor(product_code)
        .extract(text)
        .map(|m| m.value)
}
