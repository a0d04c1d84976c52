//! Output row model.

use serde::{Deserialize, Serialize};

/// Invoice-level fields stamped onto every row a strategy emits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Normalized invoice or order date.
    pub date: String,

    /// Resolved vendor name.
    pub vendor: String,

    /// Invoice or order number.
    pub number: String,
}

impl InvoiceHeader {
    pub fn new(
        date: impl Into<String>,
        vendor: impl Into<String>,
        number: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            vendor: vendor.into(),
            number: number.into(),
        }
    }
}

/// One normalized invoice line.
///
/// Every field is a display string; `unit_price` is `$D.DD` (or a plain
/// decimal for catalog prices) and `quantity` a decimal string, both empty
/// when unknown. Rows are immutable once assembled and duplicates are legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRow {
    /// Invoice or order date.
    pub date: String,

    /// Vendor name.
    pub vendor: String,

    /// Invoice or order number.
    pub invoice_number: String,

    /// Composed item description, usually `CODE - description` or
    /// `CODE - UPC: 0NNNNNNNNNNNN - description`.
    pub description: String,

    /// Unit (wholesale) price.
    pub unit_price: String,

    /// Quantity.
    pub quantity: String,
}

impl LineRow {
    /// Assemble a row from the resolved header and per-item fields.
    pub fn new(
        header: &InvoiceHeader,
        description: impl Into<String>,
        unit_price: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        Self {
            date: header.date.clone(),
            vendor: header.vendor.clone(),
            invoice_number: header.number.clone(),
            description: description.into(),
            unit_price: unit_price.into(),
            quantity: quantity.into(),
        }
    }

    /// The positional 7-column form downstream sheet writers consume:
    /// a leading placeholder column, then date, vendor, invoice number,
    /// description, unit price, and quantity.
    pub fn cells(&self) -> [String; 7] {
        [
            String::new(),
            self.date.clone(),
            self.vendor.clone(),
            self.invoice_number.clone(),
            self.description.clone(),
            self.unit_price.clone(),
            self.quantity.clone(),
        ]
    }
}
