//! Tertiary extraction strategy: raw-text scanning.

use tracing::debug;

use super::rules::codes::extract_short_product_code;
use super::rules::patterns::{PRICE_LINE, TEXT_LINE_CODE};
use super::rules::price::extract_wholesale_price;
use super::rules::quantity::extract_shipped_quantity;
use super::ExtractionStrategy;
use crate::models::config::EngineConfig;
use crate::models::document::Document;
use crate::models::row::{InvoiceHeader, LineRow};

/// Scans the raw document text for `AB123`-style line starts. Last
/// resort when neither entities nor tables yield anything.
pub struct TextLineItems<'a> {
    config: &'a EngineConfig,
}

impl<'a> TextLineItems<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }
}

impl ExtractionStrategy for TextLineItems<'_> {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, document: &Document, header: &InvoiceHeader) -> Vec<LineRow> {
        let mut rows = Vec::new();
        let lines: Vec<&str> = document.text.split('\n').collect();

        for (i, raw_line) in lines.iter().enumerate() {
            let line = raw_line.trim();
            if !TEXT_LINE_CODE.is_match(line) {
                continue;
            }

            let mut product_code = line.to_string();
            let mut description = String::new();
            let mut context = line.to_string();

            let window_end = (i + 1 + self.config.text_scan.context_lines).min(lines.len());
            for raw_next in &lines[i + 1..window_end] {
                let next_line = raw_next.trim();
                if next_line.is_empty() {
                    continue;
                }
                context.push(' ');
                context.push_str(next_line);

                // First substantial prose line is the description.
                if description.is_empty()
                    && next_line.len() > 10
                    && next_line.chars().any(|c| c.is_alphabetic())
                    && !PRICE_LINE.is_match(next_line)
                {
                    description = next_line.to_string();
                }
            }

            if let Some(short_code) = extract_short_product_code(&context, &description) {
                product_code = short_code;
            }

            let Some(price) = extract_wholesale_price(&context, &self.config.price) else {
                continue;
            };
            let quantity = extract_shipped_quantity(&context).unwrap_or_default();

            let full_description = if description.is_empty() {
                product_code.clone()
            } else {
                format!("{product_code} - {description}")
                    .trim_matches(&[' ', '-'][..])
                    .to_string()
            };

            rows.push(LineRow::new(header, full_description, price, quantity));
        }

        debug!("Extracted {} rows from raw text", rows.len());
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<LineRow> {
        let config = EngineConfig::default();
        let document = Document {
            text: text.to_string(),
            ..Default::default()
        };
        let header = InvoiceHeader::new("01/15/2025", "Generic Co", "INV100");
        TextLineItems::new(&config).extract(&document, &header)
    }

    #[test]
    fn test_code_line_with_context() {
        let rows = extract("KC2101\nWooden Birdhouse Kit\n4 0 each\n8.50 6.80\ntotals below");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "KC2101 - Wooden Birdhouse Kit");
        assert_eq!(rows[0].unit_price, "$6.80");
        assert_eq!(rows[0].quantity, "4");
        assert_eq!(rows[0].vendor, "Generic Co");
    }

    #[test]
    fn test_line_without_price_dropped() {
        let rows = extract("AB123\nGarden Stake Assortment\nno prices anywhere");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_bare_code_without_description() {
        let rows = extract("XY77\n12.00 9.50");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "XY77");
        assert_eq!(rows[0].unit_price, "$9.50");
    }

    #[test]
    fn test_context_window_is_bounded() {
        // The price sits on the eighth line after the code, outside the
        // seven-line context window.
        let rows = extract("AB123\na\nb\nc\nd\ne\nf\ng\n3.25 2.50");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_lowercase_lines_are_not_codes() {
        let rows = extract("ab123\n8.50 6.80\nplain prose line here");
        assert!(rows.is_empty());
    }
}
