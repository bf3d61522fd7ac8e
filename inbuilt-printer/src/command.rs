//! Printer command vocabulary
//!
//! Every operation a [`PrinterSink`](crate::PrinterSink) accepts has a
//! [`Command`] value. Commands serialize to tagged JSON so a recorded
//! sequence can be compared in tests or handed to a device bridge.

use serde::{Deserialize, Serialize};

use crate::error::{PrintError, PrintResult};

/// Horizontal alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Vendor alignment code (also the ESC a parameter)
    pub fn code(self) -> u8 {
        match self {
            Align::Left => 0,
            Align::Center => 1,
            Align::Right => 2,
        }
    }
}

/// Printer style keys understood by the inbuilt printer service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterStyleKey {
    EnableDoubleWidth,
    EnableDoubleHeight,
    EnableBold,
    EnableUnderline,
    /// White text on black background
    EnableAntiWhite,
    EnableStrikethrough,
    EnableItalic,
    /// Upside-down printing
    EnableInvert,
    SetTextRightSpacing,
    SetRelativePosition,
    SetAbsolutePosition,
    SetLineSpacing,
    SetLeftSpacing,
    SetStrikethroughStyle,
}

impl PrinterStyleKey {
    /// Numeric key as defined by the vendor service
    pub fn code(self) -> u16 {
        match self {
            PrinterStyleKey::EnableDoubleWidth => 1000,
            PrinterStyleKey::EnableDoubleHeight => 1001,
            PrinterStyleKey::EnableBold => 1002,
            PrinterStyleKey::EnableUnderline => 1003,
            PrinterStyleKey::EnableAntiWhite => 1004,
            PrinterStyleKey::EnableStrikethrough => 1005,
            PrinterStyleKey::EnableItalic => 1006,
            PrinterStyleKey::EnableInvert => 1007,
            PrinterStyleKey::SetTextRightSpacing => 2000,
            PrinterStyleKey::SetRelativePosition => 2001,
            PrinterStyleKey::SetAbsolutePosition => 2002,
            PrinterStyleKey::SetLineSpacing => 2003,
            PrinterStyleKey::SetLeftSpacing => 2004,
            PrinterStyleKey::SetStrikethroughStyle => 2005,
        }
    }

    /// Look up a key from its vendor code
    pub fn from_code(code: u16) -> Option<Self> {
        Some(match code {
            1000 => PrinterStyleKey::EnableDoubleWidth,
            1001 => PrinterStyleKey::EnableDoubleHeight,
            1002 => PrinterStyleKey::EnableBold,
            1003 => PrinterStyleKey::EnableUnderline,
            1004 => PrinterStyleKey::EnableAntiWhite,
            1005 => PrinterStyleKey::EnableStrikethrough,
            1006 => PrinterStyleKey::EnableItalic,
            1007 => PrinterStyleKey::EnableInvert,
            2000 => PrinterStyleKey::SetTextRightSpacing,
            2001 => PrinterStyleKey::SetRelativePosition,
            2002 => PrinterStyleKey::SetAbsolutePosition,
            2003 => PrinterStyleKey::SetLineSpacing,
            2004 => PrinterStyleKey::SetLeftSpacing,
            2005 => PrinterStyleKey::SetStrikethroughStyle,
            _ => return None,
        })
    }

    /// `Enable*` keys take [`PrinterStyleValue`]; `Set*` keys take a number
    pub fn is_toggle(self) -> bool {
        self.code() < 2000
    }
}

/// Values for the `Enable*` style keys
pub struct PrinterStyleValue;

impl PrinterStyleValue {
    pub const ENABLE: i32 = 1;
    pub const DISABLE: i32 = 2;
}

/// QR code error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrErrorLevel {
    /// ~7% recovery
    Low,
    /// ~15% recovery
    #[default]
    Medium,
    /// ~25% recovery
    Quartile,
    /// ~30% recovery
    High,
}

/// 1D barcode symbologies, in vendor order (0..=8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeSymbology {
    UpcA,
    UpcE,
    Ean13,
    Ean8,
    Code39,
    Itf,
    Codabar,
    Code93,
    Code128,
}

impl BarcodeSymbology {
    /// Code set selector sent ahead of `data`
    ///
    /// Code128 defaults to code set B unless the data selects one itself.
    pub fn code_set_prefix(self, data: &str) -> &'static [u8] {
        if self == BarcodeSymbology::Code128 && !data.starts_with('{') {
            b"{B"
        } else {
            b""
        }
    }
}

/// Largest QR payload: the store-data length field is 16 bits and
/// includes three function bytes
pub const QR_MAX_DATA_LEN: usize = u16::MAX as usize - 3;

/// Largest 1D barcode payload, code set prefix included (`GS k m n`)
pub const BARCODE_MAX_DATA_LEN: usize = u8::MAX as usize;

/// Reject QR data the store-data command cannot frame
pub fn check_qr_data(data: &str) -> PrintResult<()> {
    if data.len() > QR_MAX_DATA_LEN {
        return Err(PrintError::InvalidArgument(format!(
            "QR data is {} bytes, limit is {}",
            data.len(),
            QR_MAX_DATA_LEN
        )));
    }
    Ok(())
}

/// Reject barcode data longer than a single `GS k` payload
pub fn check_barcode_data(data: &str, symbology: BarcodeSymbology) -> PrintResult<()> {
    let len = symbology.code_set_prefix(data).len() + data.len();
    if len > BARCODE_MAX_DATA_LEN {
        return Err(PrintError::InvalidArgument(format!(
            "{:?} barcode payload is {} bytes, limit is {}",
            symbology, len, BARCODE_MAX_DATA_LEN
        )));
    }
    Ok(())
}

/// Where the human-readable barcode text is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPosition {
    #[default]
    None,
    Above,
    Below,
    Both,
}

/// One table row: texts, proportional widths and alignments of equal length
///
/// Only constructible through [`ColumnRow::new`], so every value in
/// circulation has matching column counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColumnRow")]
pub struct ColumnRow {
    texts: Vec<String>,
    widths: Vec<u32>,
    aligns: Vec<Align>,
}

#[derive(Deserialize)]
struct RawColumnRow {
    texts: Vec<String>,
    widths: Vec<u32>,
    aligns: Vec<Align>,
}

impl TryFrom<RawColumnRow> for ColumnRow {
    type Error = PrintError;

    fn try_from(raw: RawColumnRow) -> PrintResult<Self> {
        ColumnRow::new(raw.texts, raw.widths, raw.aligns)
    }
}

impl ColumnRow {
    /// Validate and build a row
    ///
    /// Fails with [`PrintError::InvalidArgument`] when the three sequences
    /// differ in length, are empty, or all widths are zero.
    pub fn new(texts: Vec<String>, widths: Vec<u32>, aligns: Vec<Align>) -> PrintResult<Self> {
        if texts.len() != widths.len() || texts.len() != aligns.len() {
            return Err(PrintError::InvalidArgument(format!(
                "column count mismatch: {} texts, {} widths, {} aligns",
                texts.len(),
                widths.len(),
                aligns.len()
            )));
        }
        if texts.is_empty() {
            return Err(PrintError::InvalidArgument(
                "column row has no columns".to_string(),
            ));
        }
        if widths.iter().all(|w| *w == 0) {
            return Err(PrintError::InvalidArgument(
                "column widths are all zero".to_string(),
            ));
        }
        Ok(Self {
            texts,
            widths,
            aligns,
        })
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn aligns(&self) -> &[Align] {
        &self.aligns
    }

    /// Iterate `(text, width, align)` per column
    pub fn columns(&self) -> impl Iterator<Item = (&str, u32, Align)> {
        self.texts
            .iter()
            .zip(&self.widths)
            .zip(&self.aligns)
            .map(|((t, w), a)| (t.as_str(), *w, *a))
    }
}

/// A single printer command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Reset print state; buffered unfinished jobs are kept
    Init,
    FontSize {
        points: u32,
    },
    FontWeight {
        bold: bool,
    },
    Alignment {
        align: Align,
    },
    Style {
        key: PrinterStyleKey,
        value: i32,
    },
    /// Text honoring the current style; line breaks are explicit `\n`
    Text {
        text: String,
    },
    Columns(ColumnRow),
    LineWrap {
        lines: u8,
    },
    QrCode {
        data: String,
        module_size: u8,
        error_level: QrErrorLevel,
    },
    Barcode {
        data: String,
        symbology: BarcodeSymbology,
        height: u8,
        width: u8,
        text_position: TextPosition,
    },
    /// Base64 encoded image scaled to `pixel_width` dots
    Bitmap {
        data: String,
        pixel_width: u32,
    },
    Raw {
        bytes: Vec<u8>,
    },
    CutPaper,
    OpenDrawer,
    EnterBuffer {
        clear: bool,
    },
    CommitBuffer,
    ExitBuffer {
        commit: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_row_rejects_mismatch() {
        let result = ColumnRow::new(
            vec!["a".to_string(), "b".to_string()],
            vec![1, 1, 1],
            vec![Align::Left, Align::Right],
        );
        assert!(matches!(result, Err(PrintError::InvalidArgument(_))));
    }

    #[test]
    fn test_column_row_rejects_empty_and_zero_width() {
        assert!(ColumnRow::new(vec![], vec![], vec![]).is_err());
        assert!(ColumnRow::new(vec!["a".to_string()], vec![0], vec![Align::Left]).is_err());
    }

    #[test]
    fn test_column_row_columns() {
        let row = ColumnRow::new(
            vec!["x".to_string(), "y".to_string()],
            vec![2, 1],
            vec![Align::Left, Align::Right],
        )
        .unwrap();
        let cols: Vec<_> = row.columns().collect();
        assert_eq!(cols, vec![("x", 2, Align::Left), ("y", 1, Align::Right)]);
    }

    #[test]
    fn test_command_json_shape() {
        let json = serde_json::to_value(Command::FontWeight { bold: true }).unwrap();
        assert_eq!(json, serde_json::json!({"cmd": "font_weight", "bold": true}));

        let json = serde_json::to_value(Command::CutPaper).unwrap();
        assert_eq!(json, serde_json::json!({"cmd": "cut_paper"}));
    }

    #[test]
    fn test_columns_deserialize_validates() {
        let bad = serde_json::json!({
            "cmd": "columns",
            "texts": ["a"],
            "widths": [1, 2],
            "aligns": ["left"]
        });
        assert!(serde_json::from_value::<Command>(bad).is_err());

        let good = serde_json::json!({
            "cmd": "columns",
            "texts": ["a", "b"],
            "widths": [1, 2],
            "aligns": ["left", "right"]
        });
        let cmd: Command = serde_json::from_value(good).unwrap();
        assert!(matches!(cmd, Command::Columns(row) if row.texts().len() == 2));
    }

    #[test]
    fn test_qr_data_limit() {
        assert!(check_qr_data(&"a".repeat(QR_MAX_DATA_LEN)).is_ok());
        let err = check_qr_data(&"a".repeat(QR_MAX_DATA_LEN + 1)).unwrap_err();
        assert!(matches!(err, PrintError::InvalidArgument(_)));
    }

    #[test]
    fn test_barcode_data_limit_counts_prefix() {
        let data = "1".repeat(254);
        assert!(check_barcode_data(&data, BarcodeSymbology::Code39).is_ok());
        // "{B" pushes the Code128 payload past 255
        assert!(matches!(
            check_barcode_data(&data, BarcodeSymbology::Code128),
            Err(PrintError::InvalidArgument(_))
        ));
        let selected = format!("{{A{}", "1".repeat(253));
        assert!(check_barcode_data(&selected, BarcodeSymbology::Code128).is_ok());
    }

    #[test]
    fn test_style_key_codes() {
        assert_eq!(PrinterStyleKey::EnableBold.code(), 1002);
        assert_eq!(
            PrinterStyleKey::from_code(2003),
            Some(PrinterStyleKey::SetLineSpacing)
        );
        assert_eq!(PrinterStyleKey::from_code(1500), None);
        assert!(PrinterStyleKey::EnableInvert.is_toggle());
        assert!(!PrinterStyleKey::SetLeftSpacing.is_toggle());
    }
}
