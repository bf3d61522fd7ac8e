//! Printer configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | PRINTER_PAPER_MM | 58 | Paper width (58 or 80) |
//! | PRINTER_HOST | 127.0.0.1 | Printer host |
//! | PRINTER_PORT | 9100 | Raw TCP port |
//! | PRINTER_TIMEOUT_MS | 5000 | Connect timeout |
//! | PRINTER_STATUS_TIMEOUT_MS | 500 | Status reply timeout |
//! | PRINTER_GBK | true | Encode text as GBK |

use serde::{Deserialize, Serialize};

/// Supported paper widths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperWidth {
    #[default]
    #[serde(rename = "58mm")]
    Mm58,
    #[serde(rename = "80mm")]
    Mm80,
}

impl PaperWidth {
    /// Map a width in millimetres; anything other than 58 or 80 is rejected
    pub fn from_mm(mm: u32) -> Option<Self> {
        match mm {
            58 => Some(PaperWidth::Mm58),
            80 => Some(PaperWidth::Mm80),
            _ => None,
        }
    }

    /// Printable dots per line
    pub fn dots(self) -> u32 {
        match self {
            PaperWidth::Mm58 => 384,
            PaperWidth::Mm80 => 576,
        }
    }

    /// Characters per line at the base font size
    pub fn chars(self) -> usize {
        match self {
            PaperWidth::Mm58 => 32,
            PaperWidth::Mm80 => 48,
        }
    }
}

/// Printer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    pub paper: PaperWidth,
    pub host: String,
    pub port: u16,
    /// Connect timeout (milliseconds)
    pub timeout_ms: u64,
    /// Status reply timeout (milliseconds)
    pub status_timeout_ms: u64,
    /// Encode text as GBK (inbuilt firmware default)
    pub gbk: bool,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            paper: PaperWidth::Mm58,
            host: "127.0.0.1".into(),
            port: 9100,
            timeout_ms: 5000,
            status_timeout_ms: 500,
            gbk: true,
        }
    }
}

impl PrinterConfig {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            paper: get("PRINTER_PAPER_MM")
                .and_then(|v| v.parse().ok())
                .and_then(PaperWidth::from_mm)
                .unwrap_or(defaults.paper),
            host: get("PRINTER_HOST").unwrap_or(defaults.host),
            port: get("PRINTER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            timeout_ms: get("PRINTER_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),
            status_timeout_ms: get("PRINTER_STATUS_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.status_timeout_ms),
            gbk: get("PRINTER_GBK")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.gbk),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = PrinterConfig::from_lookup(|_| None);
        assert_eq!(config, PrinterConfig::default());
        assert_eq!(config.paper.chars(), 32);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("PRINTER_PAPER_MM", "80"),
            ("PRINTER_HOST", "10.0.0.7"),
            ("PRINTER_PORT", "9101"),
            ("PRINTER_GBK", "false"),
            ("PRINTER_TIMEOUT_MS", "oops"),
        ]
        .into_iter()
        .collect();

        let config = PrinterConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.paper, PaperWidth::Mm80);
        assert_eq!(config.host, "10.0.0.7");
        assert_eq!(config.port, 9101);
        assert!(!config.gbk);
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn test_unknown_paper_width_falls_back() {
        let config =
            PrinterConfig::from_lookup(|k| (k == "PRINTER_PAPER_MM").then(|| "76".to_string()));
        assert_eq!(config.paper, PaperWidth::Mm58);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: PrinterConfig =
            serde_json::from_str(r#"{"paper":"80mm","port":9200}"#).unwrap();
        assert_eq!(config.paper.dots(), 576);
        assert_eq!(config.port, 9200);
        assert_eq!(config.host, "127.0.0.1");
    }
}
