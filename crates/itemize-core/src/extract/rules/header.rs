//! Invoice-level field resolution: dates, order numbers, vendor names.

use chrono::NaiveDate;

use super::patterns::{
    DATE_LABEL, INVOICE_NUMBER_OCCURRENCE, ISBN_PREFIXED, ORDER_DATE_LABEL, ORDER_DATE_PLACED,
    ORDER_ID_LABEL, ORDER_NUMBER_HASH, ORDER_NUMBER_LABEL,
};
use crate::models::document::Entity;

/// Entity types that can carry the vendor name, in priority order.
const VENDOR_FIELDS: [&str; 4] = [
    "remit_to_name",
    "supplier_name",
    "vendor_name",
    "bill_from_name",
];

/// Reformat an ISO `invoice_date` mention to `MM/DD/YYYY`.
///
/// Empty input stays empty and anything unparseable passes through
/// untouched.
pub fn format_invoice_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%m/%d/%Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Scan raw text for an order number (`Order #`, `Order Number:`,
/// `Order ID:`).
pub fn extract_order_number(text: &str) -> Option<String> {
    for pattern in [&*ORDER_NUMBER_HASH, &*ORDER_NUMBER_LABEL, &*ORDER_ID_LABEL] {
        if let Some(caps) = pattern.captures(text) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Scan raw text for a long-form order date ("placed on May 29, 2025") and
/// reformat it to `MM/DD/YY`; the matched text passes through when it does
/// not parse.
pub fn extract_order_date(text: &str) -> Option<String> {
    for pattern in [&*ORDER_DATE_PLACED, &*ORDER_DATE_LABEL, &*DATE_LABEL] {
        if let Some(caps) = pattern.captures(text) {
            let matched = &caps[1];
            return Some(match NaiveDate::parse_from_str(matched, "%B %d, %Y") {
                Ok(date) => date.format("%m/%d/%y").to_string(),
                Err(_) => matched.to_string(),
            });
        }
    }
    None
}

/// Resolve the vendor name across candidate entities.
///
/// Highest confidence wins; ties break on the candidate-field priority
/// order. Newlines inside the winning mention flatten to spaces.
pub fn extract_best_vendor(entities: &[Entity]) -> String {
    let mut candidates: Vec<(&Entity, usize)> = Vec::new();
    for entity in entities {
        if let Some(priority) = VENDOR_FIELDS.iter().position(|f| *f == entity.entity_type) {
            if !entity.mention_text.trim().is_empty() {
                candidates.push((entity, priority));
            }
        }
    }
    if candidates.is_empty() {
        return String::new();
    }

    candidates.sort_by(|a, b| {
        b.0.confidence
            .partial_cmp(&a.0.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
    candidates[0].0.mention_text.replace('\n', " ").trim().to_string()
}

/// Resolve the invoice number a line item belongs to on a summary invoice.
///
/// Summary documents repeat `Invoice # N` once per section; a book line is
/// tied to the nearest occurrence preceding its ISBN in the document text.
/// Returns nothing unless the document shows several invoice numbers.
pub fn extract_specific_invoice_number(
    document_text: &str,
    line_item_text: &str,
) -> Option<String> {
    let occurrences: Vec<(usize, String)> = INVOICE_NUMBER_OCCURRENCE
        .captures_iter(document_text)
        .map(|caps| (caps.get(0).unwrap().start(), caps[1].to_string()))
        .collect();
    if occurrences.len() <= 1 {
        return None;
    }

    let isbn = ISBN_PREFIXED.captures(line_item_text)?;
    let isbn_pos = document_text.find(&isbn[1])?;

    occurrences
        .into_iter()
        .filter(|(pos, _)| *pos < isbn_pos)
        .min_by_key(|(pos, _)| isbn_pos - *pos)
        .map(|(_, number)| number)
}
