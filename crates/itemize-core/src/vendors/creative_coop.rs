//! Creative-Coop: positional code/UPC/description mapping over the item
//! table, plus a row-format recovery ladder for prices and quantities.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use super::Specialization;
use crate::extract::rules::patterns::{
    CC_FULL_ROW, CC_GAPPED_ROW, CC_NUMBER_TOKEN, CC_ORDER_DATE, COMBINED_ENTRY_CODE, CS_NUMBER,
    INTEGER_RUN, LINE_OR_PIPE_SPLIT, NUMERIC_DASH_LINE, UPC_12,
};
use crate::extract::rules::{
    clean_price, extract_best_vendor, extract_order_date, format_invoice_date, window,
};
use crate::models::config::{CreativeCoopConfig, EngineConfig};
use crate::models::document::Document;
use crate::models::row::{InvoiceHeader, LineRow};

/// Anchor marking the head of the item table.
const TABLE_MARKER: &str = "Extended | Amount |";

/// Table-layout words; a line equal to one of these is formatting, not a
/// description.
const TABLE_WORDS: [&str; 12] = [
    "customer", "item", "shipped", "back", "ordered", "um", "list", "price", "truck", "your",
    "extended", "amount",
];

/// Words marking a line as a physical product description.
const MATERIAL_WORDS: [&str; 7] = [
    "cotton",
    "stoneware",
    "frame",
    "pillow",
    "glass",
    "wood",
    "resin",
];

/// UPC and description a product code resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductMapping {
    /// 13-digit UPC, leading zero included.
    pub upc: String,

    /// Description line printed with the item.
    pub description: String,
}

/// Price and quantity accumulated for one product code.
struct ProductData {
    ordered: String,
    wholesale: String,
}

/// Pick the best description line out of the text between a UPC and the
/// next product code.
///
/// A usable line is longer than ten characters, is not bare numbers or a
/// table-layout word, and shows either a dimension quote or a material
/// word. The longest such line wins; failing that, the first line longer
/// than five characters that is not bare numbers.
fn description_from_between_text(text: &str) -> String {
    let lines: Vec<&str> = LINE_OR_PIPE_SPLIT.split(text.trim()).collect();

    let mut best: Option<&str> = None;
    for line in &lines {
        let line = line.trim();
        if line.len() <= 10 || NUMERIC_DASH_LINE.is_match(line) {
            continue;
        }
        let lower = line.to_lowercase();
        if TABLE_WORDS.contains(&lower.as_str()) {
            continue;
        }
        if !(line.contains('"') || MATERIAL_WORDS.iter().any(|word| lower.contains(word))) {
            continue;
        }
        if best.is_none_or(|current| line.len() > current.len()) {
            best = Some(line);
        }
    }
    if let Some(line) = best {
        return line.to_string();
    }

    for line in &lines {
        let line = line.trim();
        if line.len() > 5 && !NUMERIC_DASH_LINE.is_match(line) {
            return line.to_string();
        }
    }
    String::new()
}

/// Map each product code in the item table to the UPC and description
/// printed with it.
///
/// The table prints each code before its own UPC and description, so a
/// code's pair is the first UPC after it plus the text running up to the
/// next code. Some dumps print the first item's pair ahead of its code
/// instead; the first code claims that leading pair when it yields a
/// description.
pub fn build_product_mappings(
    document_text: &str,
    config: &CreativeCoopConfig,
) -> BTreeMap<String, ProductMapping> {
    let table_start = document_text.find(TABLE_MARKER).unwrap_or(0);
    let section = window(
        document_text,
        table_start,
        table_start + config.mapping_window,
    );

    let upcs: Vec<(usize, &str)> = UPC_12
        .find_iter(section)
        .map(|m| (m.start(), m.as_str()))
        .collect();
    let products: Vec<(usize, &str)> = COMBINED_ENTRY_CODE
        .find_iter(section)
        .map(|m| (m.start(), m.as_str()))
        .collect();
    debug!(
        "Creative-Coop mapping: found {} UPCs and {} product codes",
        upcs.len(),
        products.len()
    );

    let mut mappings = BTreeMap::new();
    for (i, &(product_pos, product_code)) in products.iter().enumerate() {
        if i == 0 {
            if let Some(&(first_upc_pos, first_upc)) = upcs.first() {
                let span = window(section, first_upc_pos + 12, product_pos);
                let description = description_from_between_text(span);
                if !description.is_empty() {
                    mappings.insert(
                        product_code.to_string(),
                        ProductMapping {
                            upc: format!("0{first_upc}"),
                            description,
                        },
                    );
                    continue;
                }
            }
        }

        let Some(&(upc_pos, upc)) = upcs.iter().find(|&&(pos, _)| pos > product_pos) else {
            continue;
        };
        let next_product_pos = products.get(i + 1).map_or(section.len(), |&(pos, _)| pos);
        let description =
            description_from_between_text(window(section, upc_pos + 12, next_product_pos));
        if !description.is_empty() {
            mappings.insert(
                product_code.to_string(),
                ProductMapping {
                    upc: format!("0{upc}"),
                    description,
                },
            );
        }
    }
    debug!("Extracted {} Creative-Coop product mappings", mappings.len());
    mappings
}

/// Creative-Coop invoices carry wholesale prices and ordered quantities in
/// printed row text the property annotations miss; rows are assembled from
/// the table mapping with a pattern ladder over each line-item entity.
pub struct CreativeCoop;

impl Specialization for CreativeCoop {
    fn extract(&self, document: &Document, config: &EngineConfig) -> Vec<LineRow> {
        let header = InvoiceHeader::new(
            format_invoice_date(document.entity_text("invoice_date").unwrap_or_default()),
            extract_best_vendor(&document.entities),
            document.entity_text("invoice_id").unwrap_or_default(),
        );
        info!(
            "Creative-Coop processing: Vendor={}, Invoice={}, Date={}",
            header.vendor, header.number, header.date
        );

        let mappings = build_product_mappings(&document.text, &config.creative_coop);

        let mut product_data: HashMap<String, ProductData> = HashMap::new();
        for entity in document.line_items() {
            let entity_text = &entity.mention_text;
            let product_codes: Vec<&str> = COMBINED_ENTRY_CODE
                .find_iter(entity_text)
                .map(|m| m.as_str())
                .collect();
            if product_codes.is_empty() {
                continue;
            }
            let numbers: Vec<&str> = CC_NUMBER_TOKEN
                .find_iter(entity_text)
                .map(|m| m.as_str())
                .collect();

            for product_code in product_codes {
                let data = product_data
                    .entry(product_code.to_string())
                    .or_insert_with(|| ProductData {
                        ordered: "0".to_string(),
                        wholesale: String::new(),
                    });

                // Standard row: ordered back UM unit wholesale amount.
                if let Some(caps) = CC_FULL_ROW.captures(entity_text) {
                    data.ordered = caps[1].to_string();
                    data.wholesale = format!("${}", &caps[4]);
                    debug!(
                        "Row layout for {}: ordered={}, wholesale={}",
                        product_code, data.ordered, data.wholesale
                    );
                }

                // Wholesale printed further right than the standard layout.
                if data.wholesale.is_empty() {
                    for caps in CC_GAPPED_ROW.captures_iter(entity_text) {
                        if let (Ok(unit), Ok(wholesale)) =
                            (caps[3].parse::<f64>(), caps[4].parse::<f64>())
                        {
                            if wholesale <= unit {
                                data.ordered = caps[1].to_string();
                                data.wholesale = format!("${}", &caps[4]);
                                debug!(
                                    "Gapped layout for {}: ordered={}, wholesale={}",
                                    product_code, data.ordered, data.wholesale
                                );
                                break;
                            }
                        }
                    }
                }

                // Bare number run: a quantity followed within a few tokens
                // by a list price then a lower wholesale price.
                if data.wholesale.is_empty() && numbers.len() >= 5 {
                    'scan: for i in 0..numbers.len() - 4 {
                        let Ok(value) = numbers[i].parse::<f64>() else {
                            continue;
                        };
                        let potential_ordered = value as i64;
                        for j in (i + 2)..(numbers.len() - 2).min(i + 6) {
                            if !numbers[j].contains('.') || !numbers[j + 1].contains('.') {
                                continue;
                            }
                            if let (Ok(price1), Ok(price2)) =
                                (numbers[j].parse::<f64>(), numbers[j + 1].parse::<f64>())
                            {
                                if price2 < price1 && price2 > 0.0 {
                                    data.ordered = potential_ordered.to_string();
                                    data.wholesale = format!("${price2:.2}");
                                    debug!(
                                        "Number scan for {}: ordered={}, wholesale={}",
                                        product_code, data.ordered, data.wholesale
                                    );
                                    break 'scan;
                                }
                            }
                        }
                    }
                }

                // Last resort: the declared properties.
                if data.wholesale.is_empty() {
                    for prop in &entity.properties {
                        match prop.entity_type.as_str() {
                            "line_item/unit_price" => {
                                data.wholesale = clean_price(&prop.mention_text);
                            }
                            "line_item/quantity" => {
                                if let Some(caps) = INTEGER_RUN.captures(prop.mention_text.trim()) {
                                    data.ordered = caps[1].to_string();
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        let mut rows = Vec::new();
        for (product_code, mapping) in &mappings {
            let (mut ordered, mut wholesale) = match product_data.get(product_code) {
                Some(data) => (data.ordered.clone(), data.wholesale.clone()),
                None => ("0".to_string(), "$0.00".to_string()),
            };
            if wholesale.is_empty() {
                wholesale = "$0.00".to_string();
            }
            if ordered.is_empty() {
                ordered = "0".to_string();
            }

            if ordered.parse::<i64>().is_ok_and(|n| n > 0) {
                rows.push(LineRow::new(
                    &header,
                    format!(
                        "{product_code} - UPC: {} - {}",
                        mapping.upc, mapping.description
                    ),
                    wholesale,
                    ordered,
                ));
            } else {
                debug!("Skipping {}: zero ordered quantity", product_code);
            }
        }
        info!("Creative-Coop processing produced {} rows", rows.len());
        rows
    }

    fn fallback_header(&self, document: &Document) -> InvoiceHeader {
        let mut number = document
            .entity_text("invoice_id")
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "Unknown".to_string());
        let mut date = document
            .entity_text("invoice_date")
            .map(format_invoice_date)
            .filter(|d| !d.is_empty())
            .or_else(|| extract_order_date(&document.text))
            .unwrap_or_else(|| "Unknown".to_string());

        // Customer-service invoices print their own number and date labels.
        if let Some(caps) = CS_NUMBER.captures(&document.text) {
            number = format!("CS{}", &caps[1]);
        }
        if let Some(caps) = CC_ORDER_DATE.captures(&document.text) {
            date = caps[1].to_string();
        }
        InvoiceHeader::new(date, "Creative-Coop", number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::Entity;

    fn line_item(mention: &str) -> Entity {
        Entity {
            entity_type: "line_item".to_string(),
            mention_text: mention.to_string(),
            ..Default::default()
        }
    }

    const TABLE_TEXT: &str = "Extended | Amount |\n\
        DA4315\n\
        807472767250\n\
        6\" stoneware pitcher blue\n\
        DF5599\n\
        191009123456\n\
        8\" cotton pillow stripe\n\
        DG1010A\n";

    #[test]
    fn test_mappings_pair_codes_with_following_upc() {
        let mappings = build_product_mappings(TABLE_TEXT, &CreativeCoopConfig::default());

        assert_eq!(mappings.len(), 2);
        assert_eq!(
            mappings["DA4315"],
            ProductMapping {
                upc: "0807472767250".to_string(),
                description: "6\" stoneware pitcher blue".to_string(),
            }
        );
        assert_eq!(
            mappings["DF5599"],
            ProductMapping {
                upc: "0191009123456".to_string(),
                description: "8\" cotton pillow stripe".to_string(),
            }
        );
        // Nothing follows the last code, so it stays unmapped.
        assert!(!mappings.contains_key("DG1010A"));
    }

    #[test]
    fn test_first_code_claims_leading_pair() {
        let text = "Extended | Amount |\n\
            807472767250\n\
            6\" stoneware pitcher blue\n\
            DA4315\n";
        let mappings = build_product_mappings(text, &CreativeCoopConfig::default());

        assert_eq!(mappings["DA4315"].upc, "0807472767250");
        assert_eq!(mappings["DA4315"].description, "6\" stoneware pitcher blue");
    }

    #[test]
    fn test_between_text_prefers_material_lines() {
        let text = "12.00\nAmount\nwood picture frame 4x6\nlonger line of plain words here";
        assert_eq!(description_from_between_text(text), "wood picture frame 4x6");
    }

    #[test]
    fn test_between_text_falls_back_to_first_usable_line() {
        assert_eq!(
            description_from_between_text("12.00 -\nsomething\n"),
            "something"
        );
        assert_eq!(description_from_between_text("12.00\n- 4 -\n"), "");
    }

    #[test]
    fn test_standard_row_supplies_price_and_quantity() {
        let mut document = Document {
            text: TABLE_TEXT.to_string(),
            ..Default::default()
        };
        document
            .entities
            .push(line_item("DA4315 12 0 each 10.00 8.00 96.00"));
        document
            .entities
            .push(line_item("DF5599 8 0 Set 12.50 8\" cotton pillow 10.00 80.00"));

        let rows = CreativeCoop.extract(&document, &EngineConfig::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].description,
            "DA4315 - UPC: 0807472767250 - 6\" stoneware pitcher blue"
        );
        assert_eq!(rows[0].unit_price, "$8.00");
        assert_eq!(rows[0].quantity, "12");
        // The gapped layout validates wholesale against the unit price.
        assert_eq!(rows[1].unit_price, "$10.00");
        assert_eq!(rows[1].quantity, "8");
    }

    #[test]
    fn test_number_scan_recovers_unlabelled_rows() {
        let mut document = Document {
            text: TABLE_TEXT.to_string(),
            ..Default::default()
        };
        document
            .entities
            .push(line_item("DA4315 4 2 12 24.00 19.20 96.00"));

        let rows = CreativeCoop.extract(&document, &EngineConfig::default());
        let row = rows
            .iter()
            .find(|r| r.description.starts_with("DA4315"))
            .unwrap();
        assert_eq!(row.unit_price, "$19.20");
        assert_eq!(row.quantity, "4");
    }

    #[test]
    fn test_property_fallback_and_zero_quantity_skip() {
        let mut document = Document {
            text: TABLE_TEXT.to_string(),
            ..Default::default()
        };
        let mut entity = line_item("DA4315 back ordered");
        entity.properties = vec![
            Entity {
                entity_type: "line_item/unit_price".to_string(),
                mention_text: "7.25".to_string(),
                ..Default::default()
            },
            Entity {
                entity_type: "line_item/quantity".to_string(),
                mention_text: "6 units".to_string(),
                ..Default::default()
            },
        ];
        document.entities.push(entity);

        let rows = CreativeCoop.extract(&document, &EngineConfig::default());
        // DF5599 has a mapping but no data, so only DA4315 survives.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].unit_price, "$7.25");
        assert_eq!(rows[0].quantity, "6");
    }

    #[test]
    fn test_fallback_header_prefers_cs_labels() {
        let document = Document {
            text: "Creative Co-op\nCS012345\nORDER DATE: 01/15/2025\n".to_string(),
            entities: vec![Entity {
                entity_type: "invoice_id".to_string(),
                mention_text: "INV-9".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        let header = CreativeCoop.fallback_header(&document);
        assert_eq!(header.number, "CS012345");
        assert_eq!(header.date, "01/15/2025");
        assert_eq!(header.vendor, "Creative-Coop");
    }

    #[test]
    fn test_fallback_header_unknown_defaults() {
        let document = Document {
            text: "nothing useful".to_string(),
            ..Default::default()
        };

        let header = CreativeCoop.fallback_header(&document);
        assert_eq!(header.number, "Unknown");
        assert_eq!(header.date, "Unknown");
    }
}
