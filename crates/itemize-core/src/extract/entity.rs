//! Primary extraction strategy: typed `line_item` entities.

use rust_decimal::Decimal;
use tracing::debug;

use super::rules::codes::{extract_short_product_code, extract_upc_near_code};
use super::rules::description::{clean_item_description, extract_description_from_context};
use super::rules::header::extract_specific_invoice_number;
use super::rules::patterns::{COMBINED_ENTRY_CODE, PRICED_TUPLE_HINT};
use super::rules::price::{clean_price, extract_wholesale_price, format_currency};
use super::rules::quantity::{
    extract_quantity_near_code, extract_shipped_quantity, parse_positive_quantity,
};
use super::split::{split_combined_entity, split_priced_rows};
use super::ExtractionStrategy;
use crate::models::config::EngineConfig;
use crate::models::document::Document;
use crate::models::row::{InvoiceHeader, LineRow};

/// Extracts rows from `line_item` entities, refining the declared
/// properties with text heuristics and splitting multi-product entities.
pub struct EntityLineItems<'a> {
    config: &'a EngineConfig,
}

impl<'a> EntityLineItems<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }
}

impl ExtractionStrategy for EntityLineItems<'_> {
    fn name(&self) -> &'static str {
        "entity"
    }

    fn extract(&self, document: &Document, header: &InvoiceHeader) -> Vec<LineRow> {
        let mut rows = Vec::new();
        // Summary invoices reassign the working invoice number as sections
        // are identified, and the change sticks for subsequent entities.
        let mut header = header.clone();

        for entity in document.line_items() {
            let full_line_text = entity.mention_text.trim().to_string();

            let combined_codes = COMBINED_ENTRY_CODE.find_iter(&full_line_text).count();
            if combined_codes > 1 {
                debug!("Splitting combined entity with {} product codes", combined_codes);
                let items =
                    split_combined_entity(&full_line_text, entity, &document.text, self.config);
                for item in items {
                    if item.description.len() > self.config.description.min_len
                        && !item.unit_price.is_empty()
                        && item.unit_price != "$0.00"
                    {
                        rows.push(LineRow::new(
                            &header,
                            item.description,
                            item.unit_price,
                            item.quantity,
                        ));
                    }
                }
                continue;
            }

            let priced_tuples = PRICED_TUPLE_HINT.find_iter(&full_line_text).count();
            let vendor_lower = header.vendor.to_lowercase();
            if priced_tuples > 1
                || (!header.vendor.is_empty()
                    && vendor_lower.contains("rifle")
                    && priced_tuples >= 1
                    && full_line_text.contains('\n'))
            {
                debug!("Splitting entity with {} priced rows", priced_tuples);
                for item in split_priced_rows(&full_line_text) {
                    if item.description.len() > self.config.description.min_len
                        && !item.unit_price.is_empty()
                        && item.unit_price != "$0.00"
                    {
                        rows.push(LineRow::new(
                            &header,
                            item.description,
                            item.unit_price,
                            item.quantity,
                        ));
                    }
                }
                continue;
            }

            let mut item_description = String::new();
            let mut product_code = String::new();
            let mut unit_price = String::new();
            let mut quantity = String::new();
            let mut line_total = String::new();

            for prop in &entity.properties {
                match prop.entity_type.as_str() {
                    "line_item/description" => {
                        item_description = prop.mention_text.trim().to_string();
                    }
                    "line_item/product_code" => {
                        if product_code.is_empty() {
                            product_code = prop.mention_text.trim().to_string();
                        }
                    }
                    "line_item/unit_price" => unit_price = clean_price(&prop.mention_text),
                    "line_item/quantity" => quantity = prop.mention_text.trim().to_string(),
                    "line_item/amount" => line_total = clean_price(&prop.mention_text),
                    _ => {}
                }
            }

            if let Some(number) = extract_specific_invoice_number(&document.text, &full_line_text) {
                header.number = number;
            }

            if let Some(short_code) = extract_short_product_code(&full_line_text, &item_description)
            {
                product_code = short_code;
            }

            // Book lines list the line total; derive the per-unit price.
            let is_book = product_code.len() == 13 && product_code.starts_with("978");
            if is_book && !line_total.is_empty() && !quantity.is_empty() {
                if let (Ok(total), Ok(qty)) = (
                    line_total.trim_start_matches('$').parse::<Decimal>(),
                    quantity.parse::<i64>(),
                ) {
                    if qty > 0 {
                        unit_price = format_currency(total / Decimal::from(qty));
                    }
                }
            }

            if unit_price.is_empty() {
                if let Some(wholesale) =
                    extract_wholesale_price(&full_line_text, &self.config.price)
                {
                    unit_price = wholesale;
                }
            }

            if let Some(qty) = extract_quantity_near_code(&document.text, &product_code) {
                quantity = qty;
            } else {
                for prop in &entity.properties {
                    if prop.entity_type == "line_item/quantity" {
                        if let Some(parsed) = parse_positive_quantity(&prop.mention_text) {
                            quantity = parsed;
                        }
                        break;
                    }
                }
                if quantity.is_empty() {
                    if let Some(shipped) = extract_shipped_quantity(&full_line_text) {
                        quantity = shipped;
                    }
                }
            }

            let full_description = if !product_code.is_empty() {
                if item_description.len() > self.config.description.min_len {
                    if vendor_lower.contains("creative") || vendor_lower.contains("coop") {
                        let upc_code =
                            extract_upc_near_code(&full_line_text, &product_code, &self.config.upc);
                        let clean = clean_item_description(&item_description, &product_code);
                        compose_description(&product_code, upc_code.as_deref(), &clean)
                    } else {
                        format!("{product_code} - {item_description}")
                    }
                } else {
                    let upc_code =
                        extract_upc_near_code(&full_line_text, &product_code, &self.config.upc);
                    let mut clean = clean_item_description(&full_line_text, &product_code);
                    if clean.len() < self.config.description.rescan_len {
                        clean = extract_description_from_context(&full_line_text, &product_code);
                    }
                    compose_description(&product_code, upc_code.as_deref(), &clean)
                }
            } else if !item_description.is_empty() {
                item_description.clone()
            } else {
                full_line_text.clone()
            };

            let mut skip_item = false;
            if !product_code.is_empty() {
                let code_upper = product_code.to_uppercase();
                if code_upper == "SHIP" || code_upper == "SHIPPING" {
                    debug!("Skipping shipping line item: {}", product_code);
                    skip_item = true;
                } else if code_upper == "NOT IN STOCK"
                    || code_upper == "OOS"
                    || code_upper == "OUT OF STOCK"
                {
                    debug!("Skipping out-of-stock line item: {}", product_code);
                    skip_item = true;
                }
            }
            if !skip_item && !full_description.is_empty() {
                let desc_lower = full_description.to_lowercase();
                if desc_lower.contains("not in stock")
                    || desc_lower.contains("oos")
                    || (desc_lower.contains("ship")
                        && full_description.len() < self.config.description.short_len)
                {
                    skip_item = true;
                }
            }

            if full_description.len() > self.config.description.min_len
                && !unit_price.is_empty()
                && !skip_item
            {
                // A zero total with no quantity is a cancelled line.
                if !(line_total == "$0.00" && quantity.is_empty()) {
                    rows.push(LineRow::new(&header, full_description, unit_price, quantity));
                }
            }
        }

        debug!("Extracted {} rows from entities", rows.len());
        rows
    }
}

fn compose_description(product_code: &str, upc_code: Option<&str>, description: &str) -> String {
    match upc_code {
        Some(upc) => format!("{product_code} - UPC: {upc} - {description}"),
        None => format!("{product_code} - {description}"),
    }
}
