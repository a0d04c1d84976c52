//! Vendor classification and closed-set specializations.

pub mod creative_coop;
pub mod harpercollins;
pub mod onehundred80;

pub use creative_coop::CreativeCoop;
pub use harpercollins::HarperCollins;
pub use onehundred80::OneHundred80;

use std::fmt;

use crate::models::config::EngineConfig;
use crate::models::document::Document;
use crate::models::row::{InvoiceHeader, LineRow};

/// Substrings that identify a HarperCollins invoice. Anne McGilvray is
/// their distributor and counts as the same layout.
const HARPERCOLLINS_KEYWORDS: [&str; 4] = [
    "HarperCollins",
    "Harper Collins",
    "MFR: HarperCollins",
    "Anne McGilvray & Company",
];

const CREATIVE_COOP_KEYWORDS: [&str; 4] = [
    "Creative Co-op",
    "creativeco-op",
    "Creative Co-Op",
    "Creative Coop",
];

const ONEHUNDRED80_KEYWORDS: [&str; 4] = [
    "One Hundred 80 Degrees",
    "OneHundred80",
    "One Hundred80",
    "onehundred80degrees.com",
];

/// Recognized invoice layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Generic,
    HarperCollins,
    CreativeCoop,
    OneHundred80,
}

impl Vendor {
    /// Classify a document by case-insensitive keyword match, checking
    /// vendors in priority order.
    pub fn detect(document_text: &str) -> Self {
        let text_lower = document_text.to_lowercase();
        let matches = |keywords: &[&str]| {
            keywords
                .iter()
                .any(|keyword| text_lower.contains(&keyword.to_lowercase()))
        };

        if matches(&HARPERCOLLINS_KEYWORDS) {
            Vendor::HarperCollins
        } else if matches(&CREATIVE_COOP_KEYWORDS) {
            Vendor::CreativeCoop
        } else if matches(&ONEHUNDRED80_KEYWORDS) {
            Vendor::OneHundred80
        } else {
            Vendor::Generic
        }
    }

    /// The specialized processor for this vendor, when one exists.
    pub fn specialization(&self) -> Option<&'static dyn Specialization> {
        match self {
            Vendor::Generic => None,
            Vendor::HarperCollins => Some(&HarperCollins),
            Vendor::CreativeCoop => Some(&CreativeCoop),
            Vendor::OneHundred80 => Some(&OneHundred80),
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vendor::Generic => "Generic",
            Vendor::HarperCollins => "HarperCollins",
            Vendor::CreativeCoop => "Creative-Coop",
            Vendor::OneHundred80 => "OneHundred80",
        };
        f.write_str(name)
    }
}

/// A vendor-specific extraction pass, run before the generic cascade.
pub trait Specialization: Sync {
    /// Extract rows the vendor-specific way; empty means "fall back".
    fn extract(&self, document: &Document, config: &EngineConfig) -> Vec<LineRow>;

    /// Header for the generic cascade when the pass yields nothing.
    fn fallback_header(&self, document: &Document) -> InvoiceHeader;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_each_vendor() {
        assert_eq!(
            Vendor::detect("Invoice from HARPERCOLLINS PUBLISHERS"),
            Vendor::HarperCollins
        );
        assert_eq!(
            Vendor::detect("creative co-op seasonal catalog"),
            Vendor::CreativeCoop
        );
        assert_eq!(
            Vendor::detect("visit onehundred80degrees.com for terms"),
            Vendor::OneHundred80
        );
        assert_eq!(Vendor::detect("Some Unrelated Vendor"), Vendor::Generic);
    }

    #[test]
    fn test_distributor_counts_as_harpercollins() {
        assert_eq!(
            Vendor::detect("ANNE MCGILVRAY & COMPANY\nInvoice NS4435067"),
            Vendor::HarperCollins
        );
    }

    #[test]
    fn test_priority_order_on_mixed_text() {
        let text = "Anne McGilvray & Company distributing for Creative Co-op";
        assert_eq!(Vendor::detect(text), Vendor::HarperCollins);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Vendor::Generic.to_string(), "Generic");
        assert_eq!(Vendor::HarperCollins.to_string(), "HarperCollins");
        assert_eq!(Vendor::CreativeCoop.to_string(), "Creative-Coop");
        assert_eq!(Vendor::OneHundred80.to_string(), "OneHundred80");
    }

    #[test]
    fn test_generic_has_no_specialization() {
        assert!(Vendor::Generic.specialization().is_none());
        assert!(Vendor::HarperCollins.specialization().is_some());
        assert!(Vendor::CreativeCoop.specialization().is_some());
        assert!(Vendor::OneHundred80.specialization().is_some());
    }
}
