//! Secondary extraction strategy: detected table grids.

use tracing::debug;

use super::rules::price::clean_price;
use super::ExtractionStrategy;
use crate::models::document::Document;
use crate::models::row::{InvoiceHeader, LineRow};

/// Header keywords that mark an item/description column.
const ITEM_HEADER_WORDS: [&str; 5] = ["description", "item", "product", "sku", "code"];

/// Header keywords that qualify a table as a line-item table.
const PRICE_GATE_WORDS: [&str; 5] = ["price", "amount", "cost", "total", "extended"];

/// Header keywords that mark a priced column when reading cells.
/// Narrower than the gate list: a bare "total" column never supplies
/// the unit price.
const PRICE_CELL_WORDS: [&str; 6] =
    ["your price", "unit price", "price", "extended", "amount", "cost"];

/// Extracts rows from detected tables. Quantity is left empty; the
/// grids this handles do not carry a usable quantity column.
pub struct TableLineItems;

impl ExtractionStrategy for TableLineItems {
    fn name(&self) -> &'static str {
        "table"
    }

    fn extract(&self, document: &Document, header: &InvoiceHeader) -> Vec<LineRow> {
        let mut rows = Vec::new();

        let table_count: usize = document.pages.iter().map(|page| page.tables.len()).sum();
        debug!("Found {} tables in document", table_count);

        for page in &document.pages {
            for table in &page.tables {
                let Some(header_row) = table.header_rows.first() else {
                    continue;
                };
                let headers: Vec<String> = header_row
                    .cells
                    .iter()
                    .map(|cell| cell.text(&document.text).trim().to_lowercase())
                    .collect();

                let has_item_column = headers
                    .iter()
                    .any(|h| ITEM_HEADER_WORDS.iter().any(|kw| h.contains(kw)));
                let has_price_column = headers
                    .iter()
                    .any(|h| PRICE_GATE_WORDS.iter().any(|kw| h.contains(kw)));
                if !has_item_column || !has_price_column {
                    continue;
                }

                for body_row in &table.body_rows {
                    let cells: Vec<String> = body_row
                        .cells
                        .iter()
                        .map(|cell| cell.text(&document.text).trim().to_string())
                        .collect();

                    let mut item_description = String::new();
                    let mut wholesale_price = String::new();

                    for (idx, head) in headers.iter().enumerate() {
                        let Some(cell) = cells.get(idx) else {
                            continue;
                        };
                        if ITEM_HEADER_WORDS.iter().any(|kw| head.contains(kw)) {
                            // Several item columns: keep the longest cell.
                            if item_description.is_empty() || cell.len() > item_description.len() {
                                item_description = cell.clone();
                            }
                        } else if PRICE_CELL_WORDS.iter().any(|kw| head.contains(kw)) {
                            // "your"/"unit" price beats list price.
                            if wholesale_price.is_empty()
                                || head.contains("your")
                                || head.contains("unit")
                            {
                                wholesale_price = clean_price(cell);
                            }
                        }
                    }

                    if !item_description.is_empty() && !wholesale_price.is_empty() {
                        rows.push(LineRow::new(
                            header,
                            item_description,
                            wholesale_price,
                            String::new(),
                        ));
                    }
                }
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{Layout, Page, Table, TableCell, TableRow, TextAnchor};

    fn cell(start: u64, end: u64) -> TableCell {
        TableCell {
            layout: Layout {
                text_anchor: Some(TextAnchor::from_segments([(start, end)])),
            },
        }
    }

    fn table_document(
        text: &str,
        header_cells: Vec<TableCell>,
        body: Vec<Vec<TableCell>>,
    ) -> Document {
        Document {
            text: text.to_string(),
            pages: vec![Page {
                tables: vec![Table {
                    header_rows: vec![TableRow { cells: header_cells }],
                    body_rows: body
                        .into_iter()
                        .map(|cells| TableRow { cells })
                        .collect(),
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_extracts_description_and_price_columns() {
        let text = "Item Description List Price Your Price DF8011 Gift Box 15.00 12.00";
        let document = table_document(
            text,
            vec![cell(0, 16), cell(17, 27), cell(28, 38)],
            vec![vec![cell(39, 54), cell(55, 60), cell(61, 66)]],
        );
        let header = InvoiceHeader::new("01/15/2025", "Generic Co", "INV100");

        let rows = TableLineItems.extract(&document, &header);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "DF8011 Gift Box");
        // "Your Price" overrides the list price column.
        assert_eq!(rows[0].unit_price, "$12.00");
        assert_eq!(rows[0].quantity, "");
    }

    #[test]
    fn test_table_without_price_header_skipped() {
        let text = "Item Description Weight DF8011 Gift Box 2kg";
        let document = table_document(
            text,
            vec![cell(0, 16), cell(17, 23)],
            vec![vec![cell(24, 39), cell(40, 43)]],
        );
        let header = InvoiceHeader::default();

        assert!(TableLineItems.extract(&document, &header).is_empty());
    }

    #[test]
    fn test_total_column_gates_but_supplies_no_price() {
        let text = "Item Total DF8011 Gift Box 48.00";
        let document = table_document(
            text,
            vec![cell(0, 4), cell(5, 10)],
            vec![vec![cell(11, 26), cell(27, 32)]],
        );
        let header = InvoiceHeader::default();

        // The table qualifies through "total" but no cell-level price
        // keyword matches, so the row lacks a price and is dropped.
        assert!(TableLineItems.extract(&document, &header).is_empty());
    }

    #[test]
    fn test_longest_item_cell_wins() {
        let text = "SKU Description Price A1 Handwoven Basket Large 9.00";
        let document = table_document(
            text,
            vec![cell(0, 3), cell(4, 15), cell(16, 21)],
            vec![vec![cell(22, 24), cell(25, 47), cell(48, 52)]],
        );
        let header = InvoiceHeader::default();

        let rows = TableLineItems.extract(&document, &header);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Handwoven Basket Large");
        assert_eq!(rows[0].unit_price, "$9.00");
    }

    #[test]
    fn test_rows_with_fewer_cells_than_headers() {
        let text = "Item Price DF8011 Gift Box";
        let document = table_document(
            text,
            vec![cell(0, 4), cell(5, 10)],
            vec![vec![cell(11, 26)]],
        );
        let header = InvoiceHeader::default();

        // Price column has no cell in this row.
        assert!(TableLineItems.extract(&document, &header).is_empty());
    }
}
