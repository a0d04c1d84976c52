//! OneHundred80: property-driven rows with UPC stamping and a document-text
//! description repair pass.

use regex::Regex;
use tracing::{debug, info};

use super::Specialization;
use crate::extract::rules::patterns::{
    DIM_PAIR, DIM_TRIPLE, DOUBLE_COMMA, HEADER_FRAGMENT, HEADER_LINE_HINT, INTEGER_RUN, MULTI_WS,
    NUMERIC_PRICE_LINE, OH_DATE, OH_ORDER_DATE, SLASH_DATE, TRAILING_INT, TRAILING_PRICE, UPC_12,
    UPC_12_LINE, UPC_ANY,
};
use crate::extract::rules::{
    clean_price, extract_best_vendor, extract_order_date, extract_order_number, window,
};
use crate::models::config::EngineConfig;
use crate::models::document::Document;
use crate::models::row::{InvoiceHeader, LineRow};

/// Context window around a product code occurrence.
const PRODUCT_WINDOW_BEFORE: usize = 200;
const PRODUCT_WINDOW_AFTER: usize = 300;

/// Context window around a UPC occurrence.
const UPC_WINDOW_BEFORE: usize = 100;
const UPC_WINDOW_AFTER: usize = 400;

/// Text between a unit-of-measure marker and the first price after the
/// given anchor. Built per anchor, so construction failure is tolerated.
fn uom_description_pattern(anchor: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"(?s){}.*?(?:EA|ST)\s+(.+?)(?:\$|\d+\.\d{{2}})",
        regex::escape(anchor)
    ))
    .ok()
}

/// Scan the document text for a fuller printing of a product description.
///
/// Invoice rows print `SKU UPC QTY UOM description price`, so candidates
/// are the text between a unit-of-measure marker and the next price near
/// each occurrence of the code, or the line right below the code. The
/// longest candidate wins; the UPC anchors a last-chance search when the
/// code finds nothing.
pub fn deep_scan_description(document_text: &str, product_code: &str, upc_code: &str) -> String {
    let mut best = String::new();

    if !product_code.is_empty() && document_text.contains(product_code) {
        let mut positions = Vec::new();
        let mut start = 0;
        while let Some(found) = document_text[start..].find(product_code) {
            let pos = start + found;
            positions.push(pos);
            start = pos + 1;
        }

        let pattern = uom_description_pattern(product_code);
        for pos in positions {
            let context = window(
                document_text,
                pos.saturating_sub(PRODUCT_WINDOW_BEFORE),
                pos + PRODUCT_WINDOW_AFTER,
            );

            if let Some(caps) = pattern.as_ref().and_then(|re| re.captures(context)) {
                let candidate = MULTI_WS.replace_all(caps[1].trim(), " ").to_string();
                if candidate.len() > best.len() && candidate.len() > 10 {
                    best = candidate;
                }
            }

            let lines: Vec<&str> = context.split('\n').collect();
            for (i, line) in lines.iter().enumerate() {
                if !line.contains(product_code) || i + 1 >= lines.len() {
                    continue;
                }
                let next_line = lines[i + 1].trim();
                if next_line.len() > 15
                    && !NUMERIC_PRICE_LINE.is_match(next_line)
                    && !UPC_12_LINE.is_match(next_line)
                    && next_line.len() > best.len()
                {
                    best = next_line.to_string();
                }
            }
        }
    }

    if !upc_code.is_empty() && best.is_empty() {
        let search_upc = upc_code.strip_prefix('0').unwrap_or(upc_code);
        if let Some(upc_pos) = document_text.find(search_upc) {
            let context = window(
                document_text,
                upc_pos.saturating_sub(UPC_WINDOW_BEFORE),
                upc_pos + UPC_WINDOW_AFTER,
            );
            let caps = uom_description_pattern(search_upc).and_then(|re| re.captures(context));
            if let Some(caps) = caps {
                let candidate = MULTI_WS.replace_all(caps[1].trim(), " ").to_string();
                if candidate.len() > 10 {
                    best = candidate;
                }
            }
        }
    }

    if best.is_empty() {
        return String::new();
    }
    let best = MULTI_WS.replace_all(&best, " ");
    let best = TRAILING_PRICE.replace(best.trim(), "");
    let best = TRAILING_INT.replace(&best, "");
    let best = UPC_ANY.replace_all(&best, "");
    best.trim().to_string()
}

/// Repair a declared description against the document text.
fn repair_description(
    description: &str,
    product_code: &str,
    upc_code: &str,
    document_text: &str,
) -> String {
    // Dimension ranges print squashed: `575"` means 5-7.5", and paired
    // measurements lose the quote on the first number.
    let description = DIM_TRIPLE.replace_all(description, "${1}-${2}.${3}\"");
    let description = DIM_PAIR.replace_all(&description, "${1}\" - ${2}\"");
    let mut description = description
        .trim_end_matches(&['.', ',', ';', ':', ' ', '\n', '\r'][..])
        .to_string();

    // Truncated and wrap-label descriptions usually have a fuller printing
    // elsewhere in the document.
    if description.len() < 30 || description.contains("Wrap") {
        let context = deep_scan_description(document_text, product_code, upc_code);
        if context.len() > description.len() {
            description = context;
        }
    }

    // Multi-line descriptions flatten to the longest line plus any other
    // line that adds non-overlapping detail.
    if description.contains('\n') {
        let lines: Vec<&str> = description.split('\n').collect();
        let mut main_desc = String::new();
        for line in &lines {
            if line.len() > main_desc.len() {
                main_desc = (*line).to_string();
            }
        }
        for line in &lines {
            let trimmed = line.trim();
            if trimmed.is_empty() || *line == main_desc || trimmed.len() <= 10 {
                continue;
            }
            if HEADER_LINE_HINT.is_match(line) {
                continue;
            }
            let main_lower = main_desc.to_lowercase();
            let line_lower = line.to_lowercase();
            let overlaps = line_lower
                .split_whitespace()
                .take(3)
                .any(|word| main_lower.contains(word));
            if !overlaps {
                main_desc = format!("{main_desc}, {trimmed}");
            }
        }
        description = main_desc;
    }

    let description = DOUBLE_COMMA.replace_all(&description, ",");
    let description = MULTI_WS.replace_all(&description, " ");

    // Table headers bleed into descriptions; everything from the first
    // header word onward is artifact.
    let description = HEADER_FRAGMENT.replace_all(description.trim(), "");
    description.trim().trim_end_matches(',').to_string()
}

/// OneHundred80 rows come from the declared properties, with the UPC read
/// out of the entity text and descriptions repaired against the document.
pub struct OneHundred80;

impl OneHundred80 {
    fn order_header(&self, document: &Document) -> InvoiceHeader {
        let date = [&*OH_ORDER_DATE, &*OH_DATE, &*SLASH_DATE]
            .iter()
            .find_map(|pattern| pattern.captures(&document.text))
            .map(|caps| caps[1].to_string())
            .unwrap_or_default();
        InvoiceHeader::new(
            date,
            extract_best_vendor(&document.entities),
            document.entity_text("purchase_order").unwrap_or_default(),
        )
    }
}

impl Specialization for OneHundred80 {
    fn extract(&self, document: &Document, _config: &EngineConfig) -> Vec<LineRow> {
        let header = self.order_header(document);
        info!(
            "OneHundred80 processing: Vendor={}, PO={}, Date={}",
            header.vendor, header.number, header.date
        );

        let mut rows = Vec::new();
        for entity in document.line_items() {
            let entity_text = &entity.mention_text;
            if entity_text.trim().len() < 5 {
                continue;
            }

            let mut product_code = String::new();
            let mut description = String::new();
            let mut unit_price = String::new();
            let mut quantity = String::new();
            for prop in &entity.properties {
                match prop.entity_type.as_str() {
                    "line_item/product_code" => {
                        product_code = prop.mention_text.trim().to_string();
                    }
                    "line_item/description" => {
                        description = prop.mention_text.trim().to_string();
                    }
                    "line_item/unit_price" => {
                        unit_price = clean_price(&prop.mention_text);
                    }
                    "line_item/quantity" => {
                        if let Some(caps) = INTEGER_RUN.captures(prop.mention_text.trim()) {
                            quantity = caps[1].to_string();
                        }
                    }
                    _ => {}
                }
            }

            let upc_code = UPC_12
                .captures(entity_text)
                .map(|caps| format!("0{}", &caps[1]))
                .unwrap_or_default();

            if !product_code.is_empty() && !description.is_empty() {
                description =
                    repair_description(&description, &product_code, &upc_code, &document.text);
            }

            let full_description = if !product_code.is_empty()
                && !upc_code.is_empty()
                && !description.is_empty()
            {
                format!("{product_code} - UPC: {upc_code} - {description}")
            } else if !product_code.is_empty() && !description.is_empty() {
                format!("{product_code} - {description}")
            } else {
                continue;
            };

            if !product_code.is_empty() && !unit_price.is_empty() && !quantity.is_empty() {
                debug!("Added {}: {} | Qty: {}", product_code, unit_price, quantity);
                rows.push(LineRow::new(&header, full_description, unit_price, quantity));
            }
        }
        info!("OneHundred80 processing produced {} rows", rows.len());
        rows
    }

    fn fallback_header(&self, document: &Document) -> InvoiceHeader {
        InvoiceHeader::new(
            extract_order_date(&document.text).unwrap_or_else(|| "Unknown".to_string()),
            "OneHundred80",
            extract_order_number(&document.text).unwrap_or_else(|| "Unknown".to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::Entity;

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

    #[test]
    fn test_property_row_with_upc_prefix() {
        let document = Document {
            text: "One Hundred 80 Degrees\nOrder Date: 01/17/2025\n".to_string(),
            entities: vec![
                Entity {
                    entity_type: "purchase_order".to_string(),
                    mention_text: "PO7632".to_string(),
                    ..Default::default()
                },
                line_item(
                    "ABC123 012345678905 6 EA Ceramic Bird House Garden Decor 4.50 27.00",
                    &[
                        ("product_code", "ABC123"),
                        ("description", "Ceramic Bird House Garden Decor"),
                        ("unit_price", "4.50"),
                        ("quantity", "6"),
                    ],
                ),
            ],
            ..Default::default()
        };

        let rows = OneHundred80.extract(&document, &EngineConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "01/17/2025");
        assert_eq!(rows[0].invoice_number, "PO7632");
        assert_eq!(
            rows[0].description,
            "ABC123 - UPC: 0012345678905 - Ceramic Bird House Garden Decor"
        );
        assert_eq!(rows[0].unit_price, "$4.50");
        assert_eq!(rows[0].quantity, "6");
    }

    #[test]
    fn test_dimension_ranges_reformatted() {
        let document = Document {
            text: "01/17/2025".to_string(),
            entities: vec![line_item(
                "XY999 squashed dimensions",
                &[
                    ("product_code", "XY999"),
                    ("description", "575\" Gift Wrap Roll"),
                    ("unit_price", "2.00"),
                    ("quantity", "3"),
                ],
            )],
            ..Default::default()
        };

        let rows = OneHundred80.extract(&document, &EngineConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "XY999 - 5-7.5\" Gift Wrap Roll");
    }

    #[test]
    fn test_multiline_description_flattens() {
        let description = "Short top\nCeramic Vase Collection Large\nUnit Price 4.50\nhand painted finish detail";
        let repaired = repair_description(description, "XY999", "", "no occurrences here");
        assert_eq!(
            repaired,
            "Ceramic Vase Collection Large, hand painted finish detail"
        );
    }

    #[test]
    fn test_header_fragments_stripped() {
        let repaired = repair_description(
            "Ceramic Vase Collection Large Unit Price 4.50 Extended",
            "XY999",
            "",
            "",
        );
        assert_eq!(repaired, "Ceramic Vase Collection Large");
    }

    #[test]
    fn test_short_description_upgraded_from_document() {
        let text = "Order Date: 01/17/2025\nXY999 045544332211 6 EA Hand Painted Ceramic Vase Large 4.50 27.00\n";
        let document = Document {
            text: text.to_string(),
            entities: vec![line_item(
                "XY999 045544332211 6 EA Vase 4.50",
                &[
                    ("product_code", "XY999"),
                    ("description", "Vase"),
                    ("unit_price", "4.50"),
                    ("quantity", "6"),
                ],
            )],
            ..Default::default()
        };

        let rows = OneHundred80.extract(&document, &EngineConfig::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].description,
            "XY999 - UPC: 0045544332211 - Hand Painted Ceramic Vase Large"
        );
    }

    #[test]
    fn test_rows_need_price_quantity_and_description() {
        let document = Document {
            text: "01/17/2025".to_string(),
            entities: vec![
                // No unit price.
                line_item(
                    "AB111 something descriptive enough",
                    &[
                        ("product_code", "AB111"),
                        ("description", "Wooden Advent Calendar"),
                        ("quantity", "2"),
                    ],
                ),
                // No description at all.
                line_item(
                    "AB222 4.00 2",
                    &[
                        ("product_code", "AB222"),
                        ("unit_price", "4.00"),
                        ("quantity", "2"),
                    ],
                ),
            ],
            ..Default::default()
        };

        let rows = OneHundred80.extract(&document, &EngineConfig::default());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_fallback_header() {
        let document = Document {
            text: "Order # AB1234 placed on May 29, 2025".to_string(),
            ..Default::default()
        };
        let header = OneHundred80.fallback_header(&document);
        assert_eq!(header.date, "05/29/25");
        assert_eq!(header.vendor, "OneHundred80");
        assert_eq!(header.number, "AB1234");

        let empty = Document::default();
        let header = OneHundred80.fallback_header(&empty);
        assert_eq!(header.date, "Unknown");
        assert_eq!(header.number, "Unknown");
    }
}
