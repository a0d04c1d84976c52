//! Line-item extraction strategies and the cascade that orders them.

pub mod engine;
pub mod entity;
pub mod rules;
pub mod split;
pub mod table;
pub mod text;

pub use engine::ExtractionEngine;
pub use entity::EntityLineItems;
pub use table::TableLineItems;
pub use text::TextLineItems;

use tracing::{debug, info};

use crate::models::document::Document;
use crate::models::row::{InvoiceHeader, LineRow};

/// One extraction strategy in the fallback cascade.
///
/// A strategy that finds nothing it understands returns an empty vec;
/// it never fails.
pub trait ExtractionStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn extract(&self, document: &Document, header: &InvoiceHeader) -> Vec<LineRow>;
}

/// Run strategies in order, stopping at the first non-empty result.
pub fn run_cascade(
    strategies: &[&dyn ExtractionStrategy],
    document: &Document,
    header: &InvoiceHeader,
) -> Vec<LineRow> {
    for strategy in strategies {
        let rows = strategy.extract(document, header);
        if !rows.is_empty() {
            info!("{} extraction returned {} rows", strategy.name(), rows.len());
            return rows;
        }
        debug!("No rows from {} extraction, falling back", strategy.name());
    }
    Vec::new()
}
