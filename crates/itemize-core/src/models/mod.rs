//! Data models: document input, row output, engine configuration.

pub mod config;
pub mod document;
pub mod row;

pub use config::EngineConfig;
pub use document::{Document, Entity, Page, Table, TableCell, TableRow, TextAnchor, TextSegment};
pub use row::{InvoiceHeader, LineRow};
