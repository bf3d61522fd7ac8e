//! ESC/POS printer sink
//!
//! Translates [`Command`]s into ESC/POS bytes, tracks the style state the
//! firmware would hold (font size, alignment, double width/height), and hands the
//! accumulated bytes to a [`Printer`] transport on [`EscPosSink::flush`].

use tracing::{debug, info, instrument, warn};

use crate::command::{Align, ColumnRow, Command, PrinterStyleKey, PrinterStyleValue};
use crate::config::{PaperWidth, PrinterConfig};
use crate::encoding::pad_gbk;
use crate::error::PrintResult;
use crate::escpos::EscPosBuilder;
use crate::printer::Printer;
use crate::sink::PrinterSink;

/// Font size (points) printed at 1x magnification
pub const BASE_FONT_SIZE: u32 = 24;

/// DLE EOT 1 - transmit printer status
const DRAWER_STATUS_REQUEST: [u8; 3] = [0x10, 0x04, 0x01];

/// Status bit reporting the drawer kick connector level
const DRAWER_OPEN_BIT: u8 = 0x04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StyleState {
    font_size: u32,
    align: Align,
    double_width: bool,
    double_height: bool,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            font_size: BASE_FONT_SIZE,
            align: Align::Left,
            double_width: false,
            double_height: false,
        }
    }
}

impl StyleState {
    fn magnification(&self) -> u8 {
        let rounded = self.font_size.saturating_add(BASE_FONT_SIZE / 2) / BASE_FONT_SIZE;
        rounded.clamp(1, 8) as u8
    }

    fn width_mag(&self) -> u8 {
        let m = self.magnification();
        if self.double_width { (m * 2).min(8) } else { m }
    }

    fn height_mag(&self) -> u8 {
        let m = self.magnification();
        if self.double_height { (m * 2).min(8) } else { m }
    }
}

/// Sink that renders commands to ESC/POS for a [`Printer`] transport
///
/// Drawing commands only append bytes. Between `enter_printer_buffer` and
/// `exit_printer_buffer` they are held in a transaction buffer and reach
/// the output only when committed.
#[derive(Debug)]
pub struct EscPosSink<P> {
    printer: P,
    paper: PaperWidth,
    gbk: bool,
    out: EscPosBuilder,
    transaction: Option<EscPosBuilder>,
    style: StyleState,
}

impl<P: Printer> EscPosSink<P> {
    /// Create a sink for the given paper width with GBK text
    pub fn new(printer: P, paper: PaperWidth) -> Self {
        Self {
            printer,
            paper,
            gbk: true,
            out: EscPosBuilder::new(),
            transaction: None,
            style: StyleState::default(),
        }
    }

    /// Create a sink using paper width and encoding from `config`
    pub fn from_config(printer: P, config: &PrinterConfig) -> Self {
        let mut sink = Self::new(printer, config.paper);
        sink.gbk = config.gbk;
        sink.out = sink.new_builder();
        sink
    }

    pub fn paper(&self) -> PaperWidth {
        self.paper
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    /// Characters per line at the current font size
    pub fn line_chars(&self) -> usize {
        (self.paper.chars() / self.style.width_mag() as usize).max(1)
    }

    /// Committed bytes not yet flushed
    pub fn pending(&self) -> &[u8] {
        self.out.as_bytes()
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Send committed bytes to the printer
    ///
    /// On failure the bytes stay queued so the flush can be retried.
    /// Returns the number of bytes sent.
    #[instrument(skip(self), fields(pending = self.out.len()))]
    pub async fn flush(&mut self) -> PrintResult<usize> {
        if self.out.is_empty() {
            debug!("Nothing to flush");
            return Ok(0);
        }

        let data = self.out.take();
        match self.printer.print(&data).await {
            Ok(()) => {
                info!(bytes = data.len(), "Flushed print data");
                Ok(data.len())
            }
            Err(e) => {
                warn!(error = %e, "Flush failed, keeping data queued");
                self.out.raw(&data);
                Err(e)
            }
        }
    }

    fn new_builder(&self) -> EscPosBuilder {
        if self.gbk {
            EscPosBuilder::new()
        } else {
            EscPosBuilder::new().utf8()
        }
    }

    fn buf(&mut self) -> &mut EscPosBuilder {
        match self.transaction {
            Some(ref mut tx) => tx,
            None => &mut self.out,
        }
    }

    fn apply_size(&mut self) {
        let (w, h) = (self.style.width_mag(), self.style.height_mag());
        self.buf().char_size(w, h);
    }

    fn apply_style(&mut self, key: PrinterStyleKey, value: i32) {
        let on = value == PrinterStyleValue::ENABLE;
        let byte = value.clamp(0, u8::MAX as i32) as u8;
        let dots = value.clamp(0, u16::MAX as i32) as u16;

        match key {
            PrinterStyleKey::EnableDoubleWidth => {
                self.style.double_width = on;
                self.apply_size();
            }
            PrinterStyleKey::EnableDoubleHeight => {
                self.style.double_height = on;
                self.apply_size();
            }
            PrinterStyleKey::EnableBold => {
                self.buf().bold(on);
            }
            PrinterStyleKey::EnableUnderline => {
                self.buf().underline(on as u8);
            }
            PrinterStyleKey::EnableAntiWhite => {
                self.buf().reverse(on);
            }
            PrinterStyleKey::EnableInvert => {
                self.buf().upside_down(on);
            }
            PrinterStyleKey::SetTextRightSpacing => {
                self.buf().char_spacing(byte);
            }
            PrinterStyleKey::SetRelativePosition => {
                let offset = value.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
                self.buf().relative_position(offset);
            }
            PrinterStyleKey::SetAbsolutePosition => {
                self.buf().absolute_position(dots);
            }
            PrinterStyleKey::SetLineSpacing => {
                self.buf().line_spacing(byte);
            }
            PrinterStyleKey::SetLeftSpacing => {
                self.buf().left_margin(dots);
            }
            PrinterStyleKey::EnableStrikethrough
            | PrinterStyleKey::EnableItalic
            | PrinterStyleKey::SetStrikethroughStyle => {
                debug!(?key, value, "Style has no ESC/POS equivalent, ignored");
            }
        }
    }

    fn columns(&mut self, row: &ColumnRow) {
        let line = self.line_chars();
        let total: u64 = row.widths().iter().map(|w| *w as u64).sum();
        let count = row.texts().len();

        let mut used = 0usize;
        let mut text = String::with_capacity(line);
        for (i, (col, weight, align)) in row.columns().enumerate() {
            let chars = if i + 1 == count {
                line.saturating_sub(used)
            } else {
                (weight as u64 * line as u64 / total) as usize
            };
            used += chars;
            text.push_str(&pad_gbk(col, chars, align));
        }

        // Column layout is absolute; restore the global alignment afterwards
        let align = self.style.align;
        self.buf().align(Align::Left).line(&text).align(align);
    }

    #[cfg(feature = "image")]
    fn bitmap(&mut self, data: &str, pixel_width: u32) -> PrintResult<()> {
        let max = match pixel_width {
            0 => self.paper.dots(),
            w => w.min(self.paper.dots()),
        };
        let raster = crate::bitmap::decode_bitmap(data, max)?;
        self.buf()
            .raster(raster.width_bytes, raster.height, &raster.data);
        Ok(())
    }

    #[cfg(not(feature = "image"))]
    fn bitmap(&mut self, _data: &str, _pixel_width: u32) -> PrintResult<()> {
        Err(crate::error::PrintError::InvalidConfig(
            "bitmap printing requires the `image` feature".to_string(),
        ))
    }
}

impl<P: Printer> PrinterSink for EscPosSink<P> {
    fn execute(&mut self, command: Command) -> PrintResult<()> {
        match command {
            Command::Init => {
                self.style = StyleState::default();
                self.buf().init();
            }
            Command::FontSize { points } => {
                self.style.font_size = points;
                self.apply_size();
            }
            Command::FontWeight { bold } => {
                self.buf().bold(bold);
            }
            Command::Alignment { align } => {
                self.style.align = align;
                self.buf().align(align);
            }
            Command::Style { key, value } => self.apply_style(key, value),
            Command::Text { text } => {
                self.buf().text(&text);
            }
            Command::Columns(row) => self.columns(&row),
            Command::LineWrap { lines } => {
                self.buf().feed(lines);
            }
            Command::QrCode {
                data,
                module_size,
                error_level,
            } => {
                self.buf().qr_code(&data, module_size, error_level)?;
            }
            Command::Barcode {
                data,
                symbology,
                height,
                width,
                text_position,
            } => {
                self.buf()
                    .barcode(&data, symbology, height, width, text_position)?;
            }
            Command::Bitmap { data, pixel_width } => self.bitmap(&data, pixel_width)?,
            Command::Raw { bytes } => {
                self.buf().raw(&bytes);
            }
            Command::CutPaper => {
                // Feed to the cutter position, then full cut
                self.buf().cut_feed(0);
            }
            Command::OpenDrawer => {
                self.buf().open_drawer();
            }
            Command::EnterBuffer { clear } => match self.transaction {
                Some(ref mut tx) if clear => {
                    debug!(discarded = tx.len(), "Transaction buffer cleared");
                    tx.clear();
                }
                Some(_) => {}
                None => {
                    debug!("Entered transaction mode");
                    self.transaction = Some(self.new_builder());
                }
            },
            Command::CommitBuffer => match self.transaction {
                Some(ref mut tx) => {
                    debug!(bytes = tx.len(), "Transaction committed");
                    self.out.append(tx);
                }
                None => debug!("Commit outside transaction mode, ignored"),
            },
            Command::ExitBuffer { commit } => match self.transaction.take() {
                Some(mut tx) if commit => {
                    debug!(bytes = tx.len(), "Transaction committed on exit");
                    self.out.append(&mut tx);
                }
                Some(tx) => {
                    debug!(discarded = tx.len(), "Transaction discarded on exit");
                }
                None => debug!("Exit outside transaction mode, ignored"),
            },
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn drawer_status(&self) -> PrintResult<bool> {
        let status = self.printer.query(&DRAWER_STATUS_REQUEST).await?;
        let open = status & DRAWER_OPEN_BIT != 0;
        info!(status, open, "Drawer status");
        Ok(open)
    }
}
