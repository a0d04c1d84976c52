//! Configuration structures for the extraction engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ItemizeError, Result};

/// Main configuration for the extraction engine.
///
/// Every number here is an empirically tuned threshold, not an invariant;
/// the defaults are the values the heuristics were calibrated with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Price plausibility bounds.
    pub price: PriceConfig,

    /// UPC search windows.
    pub upc: UpcConfig,

    /// Description length cutoffs.
    pub description: DescriptionConfig,

    /// Raw-text scanning.
    pub text_scan: TextScanConfig,

    /// Creative-Coop table mapping.
    pub creative_coop: CreativeCoopConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            price: PriceConfig::default(),
            upc: UpcConfig::default(),
            description: DescriptionConfig::default(),
            text_scan: TextScanConfig::default(),
            creative_coop: CreativeCoopConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ItemizeError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ItemizeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Bounds a candidate wholesale price must fall inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceConfig {
    /// Smallest plausible unit price.
    pub min_price: Decimal,

    /// Largest plausible unit price.
    pub max_price: Decimal,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            min_price: Decimal::new(1, 2),
            max_price: Decimal::new(500, 0),
        }
    }
}

/// Byte windows for UPC searches anchored on a product code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpcConfig {
    /// Window scanned after the code before widening.
    pub after_code_window: usize,

    /// Window scanned around the code before falling back to the whole
    /// text.
    pub around_code_window: usize,
}

impl Default for UpcConfig {
    fn default() -> Self {
        Self {
            after_code_window: 100,
            around_code_window: 200,
        }
    }
}

/// Length cutoffs for deciding whether a description is usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    /// Shortest description worth emitting a row for.
    pub min_len: usize,

    /// Cleaned descriptions below this re-scan the surrounding context.
    pub rescan_len: usize,

    /// Descriptions below this count as "short" for shipping-marker
    /// filtering and deep-scan upgrades.
    pub short_len: usize,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            min_len: 5,
            rescan_len: 10,
            short_len: 30,
        }
    }
}

/// Raw-text fallback scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextScanConfig {
    /// Lines of context gathered after a code-shaped line.
    pub context_lines: usize,
}

impl Default for TextScanConfig {
    fn default() -> Self {
        Self { context_lines: 7 }
    }
}

/// Creative-Coop product-mapping window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreativeCoopConfig {
    /// Bytes of the item table scanned for code/UPC/description mappings.
    pub mapping_window: usize,
}

impl Default for CreativeCoopConfig {
    fn default() -> Self {
        Self {
            mapping_window: 8000,
        }
    }
}
