//! Splitting multi-product entities into per-product items.
//!
//! Two layouts show up in practice: a code block listing several `D`-prefixed
//! codes with UPCs and descriptions spread over nearby lines, and a priced
//! row repeating `CODE UPC PRICE QTY TOTAL` tuples on a single data line with
//! the descriptions on their own lines.

use regex::Regex;

use super::rules::codes::{extract_upc_near_code, normalize_upc};
use super::rules::description::clean_item_description;
use super::rules::patterns::{
    BACK_DIMENSION, BACK_LAST_LINE, BACK_SET, CODE_WITH_UPC, COMBINED_ENTRY_CODE, DATA_LINE_HINT,
    DESC_CODE_TAG, NUMERIC_ONLY_LINE, PRICED_TUPLE, SAME_LINE_DESC, TWELVE_DIGIT_RUN, UPC_LINE,
    UPC_RUN,
};
use super::rules::price::clean_price;
use super::rules::quantity::{extract_quantity_near_code, parse_quantity};
use crate::models::config::EngineConfig;
use crate::models::document::Entity;

/// One product pulled out of a multi-product entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitItem {
    /// Composed description.
    pub description: String,

    /// Unit price, `$0.00` when the entity declared none.
    pub unit_price: String,

    /// Quantity, empty when unknown.
    pub quantity: String,
}

/// Split a code-block entity into per-product items.
///
/// Every `D`-code occurrence becomes one item; UPCs come from the same
/// line, the next two lines, or a document-wide anchored search, and
/// descriptions from the code line itself, the neighboring lines, or the
/// text right before the code.
pub fn split_combined_entity(
    entity_text: &str,
    entity: &Entity,
    document_text: &str,
    config: &EngineConfig,
) -> Vec<SplitItem> {
    let mut items = Vec::new();

    let same_line_pairs: Vec<(String, String)> = CODE_WITH_UPC
        .captures_iter(entity_text)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();
    let all_codes: Vec<String> = COMBINED_ENTRY_CODE
        .captures_iter(entity_text)
        .map(|caps| caps[1].to_string())
        .collect();
    let lines: Vec<&str> = entity_text.split('\n').collect();

    for product_code in &all_codes {
        let code_line_idx = lines.iter().position(|line| line.contains(product_code.as_str()));

        let mut upc_code: Option<String> = None;
        for (code, upc) in &same_line_pairs {
            if code == product_code {
                upc_code = Some(normalize_upc(upc));
                break;
            }
        }
        if upc_code.is_none() {
            if let Some(idx) = code_line_idx {
                for line in lines.iter().skip(idx + 1).take(2) {
                    if let Some(caps) = UPC_RUN.captures(line.trim()) {
                        upc_code = Some(normalize_upc(&caps[1]));
                        break;
                    }
                }
            }
        }
        if upc_code.is_none() && !document_text.is_empty() {
            upc_code = extract_upc_near_code(document_text, product_code, &config.upc);
        }

        // Case 1: description on the code line, up to the quantity columns.
        let mut description = String::new();
        if let Some(idx) = code_line_idx {
            let line = lines[idx].trim();
            if let Some(pos) = line.find(product_code.as_str()) {
                let after_code = line[pos + product_code.len()..].trim();
                if let Some(caps) = SAME_LINE_DESC.captures(after_code) {
                    let candidate = caps[1].trim();
                    if candidate.len() > 10 {
                        description = candidate.to_string();
                    }
                }
            }
        }

        // Case 2: the line right before the code.
        if description.len() < 5 {
            if let Some(idx) = code_line_idx {
                if idx > 0 {
                    description = lines[idx - 1].split_whitespace().collect::<Vec<_>>().join(" ");
                }
            }
        }

        // Case 3: prose on the lines after the code, once a UPC is known.
        if description.len() < 5 && upc_code.is_some() {
            if let Some(idx) = code_line_idx {
                for line in lines.iter().skip(idx + 1).take(3) {
                    let candidate = line.trim();
                    if !candidate.is_empty()
                        && !UPC_LINE.is_match(candidate)
                        && !NUMERIC_ONLY_LINE.is_match(candidate)
                        && candidate.len() > 10
                    {
                        description = candidate.to_string();
                        break;
                    }
                }
            }
        }

        // Case 4: the last phrase before the code occurrence.
        if description.len() < 5 {
            if let Some(code_pos) = entity_text.find(product_code.as_str()) {
                if code_pos > 0 {
                    let before = &entity_text[..code_pos];
                    for pattern in [&*BACK_LAST_LINE, &*BACK_DIMENSION, &*BACK_SET] {
                        if let Some(caps) = pattern.captures_iter(before).last() {
                            let candidate = caps.get(1).unwrap().as_str().trim();
                            if candidate.len() > 5 {
                                description = candidate.to_string();
                                break;
                            }
                        }
                    }
                }
            }
        }

        let mut quantity = String::new();
        if !document_text.is_empty() {
            if let Some(qty) = extract_quantity_near_code(document_text, product_code) {
                quantity = qty;
            }
        }

        let mut unit_price = String::new();
        for prop in &entity.properties {
            if prop.entity_type == "line_item/unit_price" {
                unit_price = clean_price(&prop.mention_text);
            } else if prop.entity_type == "line_item/quantity" && quantity.is_empty() {
                if let Some(parsed) = parse_quantity(&prop.mention_text) {
                    quantity = parsed;
                }
            }
        }

        if description.len() > 3 {
            let clean_description = clean_item_description(&description, product_code);
            let composed = match &upc_code {
                Some(upc) => format!("{product_code} - UPC: {upc} - {clean_description}"),
                None => format!("{product_code} - {clean_description}"),
            };
            items.push(SplitItem {
                description: composed,
                unit_price: if unit_price.is_empty() {
                    "$0.00".to_string()
                } else {
                    unit_price
                },
                quantity,
            });
        }
    }

    items
}

/// Split a priced-row entity into per-product items.
///
/// The last line matching `CODE UPC PRICE` is the data line; every
/// `CODE UPC PRICE QTY TOTAL` tuple on it becomes one item, paired with a
/// description line by code mention, position, or `#CODE` tag.
pub fn split_priced_rows(entity_text: &str) -> Vec<SplitItem> {
    let mut items = Vec::new();
    let lines: Vec<&str> = entity_text.split('\n').collect();

    let mut data_line = "";
    let mut descriptions: Vec<&str> = Vec::new();
    for line in &lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if DATA_LINE_HINT.is_match(line) {
            data_line = line;
        } else {
            descriptions.push(line);
        }
    }
    if data_line.is_empty() {
        return items;
    }

    let tuples: Vec<(&str, &str, &str)> = PRICED_TUPLE
        .captures_iter(data_line)
        .map(|caps| {
            (
                caps.get(1).unwrap().as_str(),
                caps.get(3).unwrap().as_str(),
                caps.get(4).unwrap().as_str(),
            )
        })
        .collect();

    for (i, (code, price, qty)) in tuples.iter().enumerate() {
        let mut description = String::new();

        let tag = format!("#{code}");
        for candidate in &descriptions {
            if candidate.contains(&tag) || candidate.contains(code) {
                description = candidate.to_string();
                break;
            }
        }

        if description.is_empty() && !descriptions.is_empty() {
            if i < descriptions.len() {
                description = descriptions[i].to_string();
            } else {
                // Variant-pipe layouts: "Name | default - #CODE".
                if let Ok(re) =
                    Regex::new(&format!(r"([^|]+)\|\s*default\s*-\s*#{}", regex::escape(code)))
                {
                    if let Some(caps) = re.captures(entity_text) {
                        description = format!("{} | default - #{code}", caps[1].trim());
                    }
                }
                if description.is_empty() {
                    let variant_lines: Vec<&str> = lines
                        .iter()
                        .map(|line| line.trim())
                        .filter(|line| {
                            line.contains('|')
                                && line.contains("default")
                                && !TWELVE_DIGIT_RUN.is_match(line)
                        })
                        .collect();
                    if variant_lines.len() > i {
                        description = variant_lines[i].to_string();
                    } else {
                        for line in &variant_lines {
                            if let Some(caps) = DESC_CODE_TAG.captures(line) {
                                if &caps[1] == *code {
                                    description = line.to_string();
                                    break;
                                }
                            }
                        }
                    }
                }
                if description.is_empty() {
                    description = descriptions[0].to_string();
                }
            }
        }

        let composed = if description.is_empty() {
            code.to_string()
        } else {
            let mut cleaned = description;
            if let Ok(re) = Regex::new(&format!(r"\s*-\s*#{}\s*$", regex::escape(code))) {
                cleaned = re.replace_all(&cleaned, "").into_owned();
            }
            if let Ok(re) = Regex::new(&format!(r"\s*#{}\s*", regex::escape(code))) {
                cleaned = re.replace_all(&cleaned, "").into_owned();
            }
            format!("{code} - {}", cleaned.trim())
        };

        items.push(SplitItem {
            description: composed,
            unit_price: format!("${price}"),
            quantity: qty.to_string(),
        });
    }

    items
}
