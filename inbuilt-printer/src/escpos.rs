//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS print data.

use crate::command::{
    Align, BarcodeSymbology, QrErrorLevel, TextPosition, check_barcode_data, check_qr_data,
};
use crate::encoding::encode_gbk;
use crate::error::PrintResult;

/// ESC/POS command builder
///
/// Builds ESC/POS byte sequences for thermal printers. Text is encoded
/// as it is written (GBK unless disabled), so binary payloads such as
/// raster images can be mixed in safely.
#[derive(Debug, Clone)]
pub struct EscPosBuilder {
    buf: Vec<u8>,
    gbk: bool,
}

impl EscPosBuilder {
    /// Create an empty builder with GBK text encoding
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4096),
            gbk: true,
        }
    }

    /// Send text as UTF-8 instead of GBK
    pub fn utf8(mut self) -> Self {
        self.gbk = false;
        self
    }

    pub fn is_gbk(&self) -> bool {
        self.gbk
    }

    // === Text Output ===

    /// Write text
    pub fn text(&mut self, s: &str) -> &mut Self {
        if self.gbk {
            self.buf.extend_from_slice(&encode_gbk(s));
        } else {
            self.buf.extend_from_slice(s.as_bytes());
        }
        self
    }

    /// Write text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Write multiple empty lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n - Print and feed n lines
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    // === Alignment ===

    pub fn align(&mut self, align: Align) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, align.code()]);
        self
    }

    // === Text Style ===

    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x45, on as u8]);
        self
    }

    /// Character magnification, 1..=8 in each direction
    pub fn char_size(&mut self, width: u8, height: u8) -> &mut Self {
        let w = width.clamp(1, 8) - 1;
        let h = height.clamp(1, 8) - 1;
        self.buf.extend_from_slice(&[0x1D, 0x21, (w << 4) | h]);
        self
    }

    /// Underline thickness: 0 off, 1 thin, 2 thick
    pub fn underline(&mut self, thickness: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x2D, thickness.min(2)]);
        self
    }

    /// White on black
    pub fn reverse(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x42, on as u8]);
        self
    }

    pub fn upside_down(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x7B, on as u8]);
        self
    }

    /// Right-side character spacing in dots
    pub fn char_spacing(&mut self, dots: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x20, dots]);
        self
    }

    pub fn line_spacing(&mut self, dots: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x33, dots]);
        self
    }

    pub fn left_margin(&mut self, dots: u16) -> &mut Self {
        let [l, h] = dots.to_le_bytes();
        self.buf.extend_from_slice(&[0x1D, 0x4C, l, h]);
        self
    }

    pub fn absolute_position(&mut self, dots: u16) -> &mut Self {
        let [l, h] = dots.to_le_bytes();
        self.buf.extend_from_slice(&[0x1B, 0x24, l, h]);
        self
    }

    pub fn relative_position(&mut self, dots: i16) -> &mut Self {
        let [l, h] = dots.to_le_bytes();
        self.buf.extend_from_slice(&[0x1B, 0x5C, l, h]);
        self
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0 - Full cut
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    /// Full cut with feed: feeds n lines then cuts
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        // GS V 66 n - Full cut after feeding n lines
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    // === Cash Drawer ===

    /// Open cash drawer (pin 2)
    pub fn open_drawer(&mut self) -> &mut Self {
        // ESC p m t1 t2 - Generate pulse on pin m
        self.buf.extend_from_slice(&[0x1B, 0x70, 0x00, 25, 250]);
        self
    }

    // === QR Code ===

    /// Print a QR code
    ///
    /// Size: 1-16 (module size in dots). Data longer than
    /// [`QR_MAX_DATA_LEN`](crate::command::QR_MAX_DATA_LEN) is rejected
    /// and nothing is written.
    pub fn qr_code(&mut self, data: &str, size: u8, level: QrErrorLevel) -> PrintResult<&mut Self> {
        check_qr_data(data)?;
        let size = size.clamp(1, 16);
        let level = match level {
            QrErrorLevel::Low => 0x30,
            QrErrorLevel::Medium => 0x31,
            QrErrorLevel::Quartile => 0x32,
            QrErrorLevel::High => 0x33,
        };

        // Function 165: Select model (Model 2)
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x04, 0x00, 0x31, 0x41, 0x32, 0x00]);

        // Function 167: Set module size
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, size]);

        // Function 169: Set error correction
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, level]);

        // Function 180: Store data
        let data_bytes = data.as_bytes();
        let [p_l, p_h] = ((data_bytes.len() + 3) as u16).to_le_bytes();
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, p_l, p_h, 0x31, 0x50, 0x30]);
        self.buf.extend_from_slice(data_bytes);

        // Function 181: Print
        self.buf
            .extend_from_slice(&[0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]);

        Ok(self)
    }

    // === Barcode ===

    /// Print a 1D barcode
    ///
    /// Height 1-255 dots, module width 2-6. Payloads longer than
    /// [`BARCODE_MAX_DATA_LEN`](crate::command::BARCODE_MAX_DATA_LEN) are
    /// rejected and nothing is written.
    pub fn barcode(
        &mut self,
        data: &str,
        symbology: BarcodeSymbology,
        height: u8,
        width: u8,
        text_position: TextPosition,
    ) -> PrintResult<&mut Self> {
        check_barcode_data(data, symbology)?;
        let hri = match text_position {
            TextPosition::None => 0,
            TextPosition::Above => 1,
            TextPosition::Below => 2,
            TextPosition::Both => 3,
        };
        // GS h n / GS w n / GS H n
        self.buf.extend_from_slice(&[0x1D, 0x68, height.max(1)]);
        self.buf.extend_from_slice(&[0x1D, 0x77, width.clamp(2, 6)]);
        self.buf.extend_from_slice(&[0x1D, 0x48, hri]);

        let m = match symbology {
            BarcodeSymbology::UpcA => 65,
            BarcodeSymbology::UpcE => 66,
            BarcodeSymbology::Ean13 => 67,
            BarcodeSymbology::Ean8 => 68,
            BarcodeSymbology::Code39 => 69,
            BarcodeSymbology::Itf => 70,
            BarcodeSymbology::Codabar => 71,
            BarcodeSymbology::Code93 => 72,
            BarcodeSymbology::Code128 => 73,
        };

        let prefix = symbology.code_set_prefix(data);
        let len = (prefix.len() + data.len()) as u8;

        // GS k m n d1...dn
        self.buf.extend_from_slice(&[0x1D, 0x6B, m, len]);
        self.buf.extend_from_slice(prefix);
        self.buf.extend_from_slice(data.as_bytes());
        Ok(self)
    }

    // === Raster Image ===

    /// Print a 1-bit raster image (GS v 0)
    ///
    /// `data` holds `width_bytes * height` bytes, MSB is the leftmost dot.
    pub fn raster(&mut self, width_bytes: u16, height: u16, data: &[u8]) -> &mut Self {
        let [xl, xh] = width_bytes.to_le_bytes();
        let [yl, yh] = height.to_le_bytes();
        self.buf
            .extend_from_slice(&[0x1D, 0x76, 0x30, 0x00, xl, xh, yl, yh]);
        self.buf.extend_from_slice(data);
        self.buf.push(b'\n');
        self
    }

    // === Raw Commands ===

    /// Write raw bytes directly
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Reset printer to default state
    ///
    /// In GBK mode Chinese character mode is re-enabled after the reset.
    pub fn init(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x40]);
        if self.gbk {
            // FS & - Enable Chinese mode, FS C 1 - Select GBK
            self.buf.extend_from_slice(&[0x1C, 0x26, 0x1C, 0x43, 0x01]);
        }
        self
    }

    // === Buffer Access ===

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Move all bytes from `other` into this builder
    pub fn append(&mut self, other: &mut EscPosBuilder) -> &mut Self {
        self.buf.append(&mut other.buf);
        self
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Take the accumulated bytes, leaving the builder empty
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}
