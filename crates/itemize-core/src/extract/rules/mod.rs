//! Rule-based field extractors for invoice line items.

pub mod codes;
pub mod description;
pub mod header;
pub mod patterns;
pub mod price;
pub mod quantity;

pub use codes::{extract_short_product_code, extract_upc_near_code, normalize_upc, UpcExtractor};
pub use description::{clean_item_description, extract_description_from_context};
pub use header::{
    extract_best_vendor, extract_order_date, extract_order_number,
    extract_specific_invoice_number, format_invoice_date,
};
pub use patterns::*;
pub use price::{clean_price, extract_wholesale_price, format_currency, PriceExtractor};
pub use quantity::{
    extract_quantity_near_code, extract_shipped_quantity, parse_positive_quantity, parse_quantity,
};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A positioned extraction result.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Slice a byte window out of `text` without panicking: endpoints clamp to
/// the text length and snap down to char boundaries.
pub(crate) fn window(text: &str, start: usize, end: usize) -> &str {
    let mut end = end.min(text.len());
    let mut start = start.min(end);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    while end > start && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_clamps_and_snaps() {
        assert_eq!(window("abcdef", 2, 4), "cd");
        assert_eq!(window("abcdef", 2, 99), "cdef");
        assert_eq!(window("abcdef", 9, 12), "");
        // 'ü' spans bytes 1..3; both endpoints land inside it.
        assert_eq!(window("aüb", 2, 2), "");
        assert_eq!(window("aüb", 0, 2), "a");
    }
}
