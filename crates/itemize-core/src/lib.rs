//! Core library for invoice line-item extraction.
//!
//! This crate provides:
//! - Data models for parsed document-understanding results
//! - A cascade of extraction strategies (entities, tables, raw text)
//! - Vendor classification with specialized per-vendor processing
//! - Normalized 7-column output rows for sheet writers
#![recursion_limit = "512"]

pub mod error;
pub mod extract;
pub mod models;
pub mod vendors;

pub use error::{DocumentError, ItemizeError, Result};
pub use extract::{
    run_cascade, EntityLineItems, ExtractionEngine, ExtractionStrategy, TableLineItems,
    TextLineItems,
};
pub use models::{Document, EngineConfig, Entity, InvoiceHeader, LineRow};
pub use vendors::{CreativeCoop, HarperCollins, OneHundred80, Specialization, Vendor};
