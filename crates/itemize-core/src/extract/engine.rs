//! Vendor dispatch and the top-level extraction entry point.

use tracing::info;

use super::{run_cascade, EntityLineItems, TableLineItems, TextLineItems};
use crate::extract::rules::{
    extract_best_vendor, extract_order_date, extract_order_number, format_invoice_date,
};
use crate::models::config::EngineConfig;
use crate::models::document::Document;
use crate::models::row::{InvoiceHeader, LineRow};
use crate::vendors::Vendor;

/// Turns parsed documents into normalized line rows.
///
/// Classified vendors get their specialized pass first; when it yields
/// nothing, and always for generic documents, the entity/table/text
/// cascade runs.
pub struct ExtractionEngine {
    config: EngineConfig,
}

impl ExtractionEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Extract every line row the document yields.
    pub fn process(&self, document: &Document) -> Vec<LineRow> {
        let vendor = Vendor::detect(&document.text);
        info!("Detected vendor type: {}", vendor);

        if let Some(specialization) = vendor.specialization() {
            let rows = specialization.extract(document, &self.config);
            info!("{} processing returned {} rows", vendor, rows.len());
            if !rows.is_empty() {
                return rows;
            }
            info!(
                "{} specialized processing found no items, falling back to generic processing",
                vendor
            );
            let header = specialization.fallback_header(document);
            return self.run_generic(document, &header);
        }

        let header = self.generic_header(document);
        info!(
            "Generic processing - Vendor: '{}', Invoice#: '{}', Date: '{}'",
            header.vendor, header.number, header.date
        );
        self.run_generic(document, &header)
    }

    /// Header for unclassified documents: declared entities first, then
    /// order-confirmation text scans.
    fn generic_header(&self, document: &Document) -> InvoiceHeader {
        let number = document
            .entity_text("invoice_id")
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| extract_order_number(&document.text))
            .unwrap_or_default();
        let date = document
            .entity_text("invoice_date")
            .map(format_invoice_date)
            .filter(|d| !d.is_empty())
            .or_else(|| extract_order_date(&document.text))
            .unwrap_or_default();
        InvoiceHeader::new(date, extract_best_vendor(&document.entities), number)
    }

    fn run_generic(&self, document: &Document, header: &InvoiceHeader) -> Vec<LineRow> {
        run_cascade(
            &[
                &EntityLineItems::new(&self.config),
                &TableLineItems,
                &TextLineItems::new(&self.config),
            ],
            document,
            header,
        )
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{
        Entity, Layout, Page, Table, TableCell, TableRow, TextAnchor,
    };

    fn line_item(mention: &str, props: &[(&str, &str)]) -> Entity {
        Entity {
            entity_type: "line_item".to_string(),
            mention_text: mention.to_string(),
            properties: props
                .iter()
                .map(|(prop_type, text)| Entity {
                    entity_type: format!("line_item/{prop_type}"),
                    mention_text: (*text).to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn field(entity_type: &str, mention: &str) -> Entity {
        Entity {
            entity_type: entity_type.to_string(),
            mention_text: mention.to_string(),
            ..Default::default()
        }
    }

    fn cell(start: u64, end: u64) -> TableCell {
        TableCell {
            layout: Layout {
                text_anchor: Some(TextAnchor::from_segments([(start, end)])),
            },
        }
    }

    #[test]
    fn test_generic_document_end_to_end() {
        let document = Document {
            text: "Invoice INV100\nDF8011 Gift Box".to_string(),
            entities: vec![
                field("invoice_id", "INV100"),
                field("invoice_date", "2025-01-15"),
                field("supplier_name", "Generic Co"),
                line_item(
                    "DF8011 Gift Box 4 12.00 48.00",
                    &[
                        ("description", "Gift Box"),
                        ("product_code", "DF8011"),
                        ("unit_price", "12.00"),
                        ("quantity", "4"),
                        ("amount", "48.00"),
                    ],
                ),
            ],
            ..Default::default()
        };

        let rows = ExtractionEngine::new().process(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].cells(),
            [
                "".to_string(),
                "01/15/2025".to_string(),
                "Generic Co".to_string(),
                "INV100".to_string(),
                "DF8011 - Gift Box".to_string(),
                "$12.00".to_string(),
                "4".to_string(),
            ]
        );
    }

    #[test]
    fn test_cascade_reaches_table_extraction() {
        let text = "Description Price Handwoven Basket 9.00";
        let document = Document {
            text: text.to_string(),
            pages: vec![Page {
                tables: vec![Table {
                    header_rows: vec![TableRow {
                        cells: vec![cell(0, 11), cell(12, 17)],
                    }],
                    body_rows: vec![TableRow {
                        cells: vec![cell(18, 34), cell(35, 39)],
                    }],
                }],
            }],
            ..Default::default()
        };

        let rows = ExtractionEngine::new().process(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Handwoven Basket");
        assert_eq!(rows[0].unit_price, "$9.00");
        assert_eq!(rows[0].quantity, "");
    }

    #[test]
    fn test_harpercollins_dispatch() {
        let document = Document {
            text: "HarperCollins Publishers\nDiscount: 50.00% OFF".to_string(),
            entities: vec![line_item(
                "9780001839236 3 14.97",
                &[("product_code", "9780001839236")],
            )],
            ..Default::default()
        };

        let rows = ExtractionEngine::new().process(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vendor, "HarperCollins");
        assert_eq!(rows[0].date, "04/29/25");
        assert_eq!(rows[0].invoice_number, "NS4435067");
        assert_eq!(rows[0].description, "9780001839236 - Summer Story");
        assert_eq!(rows[0].unit_price, "4.995");
        assert_eq!(rows[0].quantity, "3");
    }

    #[test]
    fn test_empty_specialization_falls_back_to_cascade() {
        let document = Document {
            text: "One Hundred 80 Degrees order confirmation".to_string(),
            entities: vec![line_item(
                "DF8011 Gift Box",
                &[
                    ("description", "Gift Box"),
                    ("product_code", "DF8011"),
                    ("unit_price", "12.00"),
                ],
            )],
            ..Default::default()
        };

        // The specialized pass refuses the row (no quantity), so the
        // generic cascade runs under the fallback header.
        let rows = ExtractionEngine::new().process(&document);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vendor, "OneHundred80");
        assert_eq!(rows[0].invoice_number, "Unknown");
        assert_eq!(rows[0].date, "Unknown");
        assert_eq!(rows[0].description, "DF8011 - Gift Box");
        assert_eq!(rows[0].unit_price, "$12.00");
        assert_eq!(rows[0].quantity, "");
    }

    #[test]
    fn test_document_without_items_yields_no_rows() {
        let document = Document {
            text: "A letter with no commerce in it".to_string(),
            ..Default::default()
        };
        assert!(ExtractionEngine::new().process(&document).is_empty());
    }
}
