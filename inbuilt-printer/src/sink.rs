//! Printer command sink
//!
//! [`PrinterSink`] is the boundary between receipt composition and the
//! device. Drawing commands return as soon as they are accepted; only the
//! drawer status query is asynchronous.

use crate::command::{
    Align, BarcodeSymbology, ColumnRow, Command, PrinterStyleKey, QrErrorLevel, TextPosition,
    check_barcode_data, check_qr_data,
};
use crate::error::PrintResult;

/// Acceptor of printer commands
///
/// Implementors provide [`execute`](PrinterSink::execute) and
/// [`drawer_status`](PrinterSink::drawer_status); every named operation is a
/// thin wrapper that builds the matching [`Command`].
#[allow(async_fn_in_trait)]
pub trait PrinterSink {
    /// Accept a single command
    fn execute(&mut self, command: Command) -> PrintResult<()>;

    /// Whether the cash drawer is open
    async fn drawer_status(&self) -> PrintResult<bool>;

    /// Reset print state, preserving unfinished buffered jobs
    fn init(&mut self) -> PrintResult<()> {
        self.execute(Command::Init)
    }

    fn set_font_size(&mut self, points: u32) -> PrintResult<()> {
        self.execute(Command::FontSize { points })
    }

    fn set_font_weight(&mut self, bold: bool) -> PrintResult<()> {
        self.execute(Command::FontWeight { bold })
    }

    fn set_alignment(&mut self, align: Align) -> PrintResult<()> {
        self.execute(Command::Alignment { align })
    }

    fn set_printer_style(&mut self, key: PrinterStyleKey, value: i32) -> PrintResult<()> {
        self.execute(Command::Style { key, value })
    }

    /// Print text with the current style; the caller supplies `\n`
    fn print_text(&mut self, text: &str) -> PrintResult<()> {
        self.execute(Command::Text {
            text: text.to_string(),
        })
    }

    /// Print one table row
    ///
    /// `widths` are proportional weights. The three slices must have the
    /// same length.
    fn print_columns(
        &mut self,
        texts: &[&str],
        widths: &[u32],
        aligns: &[Align],
    ) -> PrintResult<()> {
        let row = ColumnRow::new(
            texts.iter().map(|t| t.to_string()).collect(),
            widths.to_vec(),
            aligns.to_vec(),
        )?;
        self.execute(Command::Columns(row))
    }

    fn print_qr_code(
        &mut self,
        data: &str,
        module_size: u8,
        error_level: QrErrorLevel,
    ) -> PrintResult<()> {
        check_qr_data(data)?;
        self.execute(Command::QrCode {
            data: data.to_string(),
            module_size,
            error_level,
        })
    }

    fn print_barcode(
        &mut self,
        data: &str,
        symbology: BarcodeSymbology,
        height: u8,
        width: u8,
        text_position: TextPosition,
    ) -> PrintResult<()> {
        check_barcode_data(data, symbology)?;
        self.execute(Command::Barcode {
            data: data.to_string(),
            symbology,
            height,
            width,
            text_position,
        })
    }

    /// Print a base64 encoded image scaled to `pixel_width` dots
    fn print_bitmap(&mut self, encoded: &str, pixel_width: u32) -> PrintResult<()> {
        self.execute(Command::Bitmap {
            data: encoded.to_string(),
            pixel_width,
        })
    }

    /// Pass raw ESC/POS bytes through
    fn send_raw_data(&mut self, bytes: &[u8]) -> PrintResult<()> {
        self.execute(Command::Raw {
            bytes: bytes.to_vec(),
        })
    }

    /// Feed `lines` blank lines
    fn line_wrap(&mut self, lines: u8) -> PrintResult<()> {
        self.execute(Command::LineWrap { lines })
    }

    fn cut_paper(&mut self) -> PrintResult<()> {
        self.execute(Command::CutPaper)
    }

    fn open_drawer(&mut self) -> PrintResult<()> {
        self.execute(Command::OpenDrawer)
    }

    /// Enter transaction mode; `clear` drops uncommitted content
    fn enter_printer_buffer(&mut self, clear: bool) -> PrintResult<()> {
        self.execute(Command::EnterBuffer { clear })
    }

    /// Print everything buffered so far and stay in transaction mode
    fn commit_printer_buffer(&mut self) -> PrintResult<()> {
        self.execute(Command::CommitBuffer)
    }

    /// Leave transaction mode, committing or discarding the buffer
    fn exit_printer_buffer(&mut self, commit: bool) -> PrintResult<()> {
        self.execute(Command::ExitBuffer { commit })
    }
}

/// Sink that records every command it receives
///
/// Useful for previews, tests, and for shipping a command sequence to a
/// device bridge as JSON.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Vec<Command>,
    drawer_open: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value reported by `drawer_status`
    pub fn with_drawer_open(mut self, open: bool) -> Self {
        self.drawer_open = open;
        self
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Take the recorded commands, leaving the log empty
    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All printed text, including column texts joined by `|`
    pub fn text(&self) -> String {
        let mut out = String::new();
        for cmd in &self.commands {
            match cmd {
                Command::Text { text } => out.push_str(text),
                Command::Columns(row) => {
                    out.push_str(&row.texts().join("|"));
                    out.push('\n');
                }
                _ => {}
            }
        }
        out
    }

    /// Serialize the log as a JSON array
    pub fn to_json(&self) -> PrintResult<String> {
        serde_json::to_string(&self.commands)
            .map_err(|e| crate::PrintError::InvalidArgument(format!("serialize commands: {}", e)))
    }
}

impl PrinterSink for RecordingSink {
    fn execute(&mut self, command: Command) -> PrintResult<()> {
        self.commands.push(command);
        Ok(())
    }

    async fn drawer_status(&self) -> PrintResult<bool> {
        Ok(self.drawer_open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrintError;

    #[test]
    fn test_recording_sink_records_in_order() {
        let mut sink = RecordingSink::new();
        sink.init().unwrap();
        sink.set_font_size(24).unwrap();
        sink.print_text("hello\n").unwrap();
        sink.cut_paper().unwrap();

        assert_eq!(
            sink.commands(),
            &[
                Command::Init,
                Command::FontSize { points: 24 },
                Command::Text {
                    text: "hello\n".to_string()
                },
                Command::CutPaper,
            ]
        );
    }

    #[test]
    fn test_print_columns_mismatch_is_rejected() {
        let mut sink = RecordingSink::new();
        let err = sink
            .print_columns(&["a", "b"], &[1], &[Align::Left, Align::Right])
            .unwrap_err();
        assert!(matches!(err, PrintError::InvalidArgument(_)));
        assert!(sink.commands().is_empty());
    }

    #[test]
    fn test_oversized_barcode_is_rejected() {
        let mut sink = RecordingSink::new();
        let data = "7".repeat(300);
        let err = sink
            .print_barcode(&data, BarcodeSymbology::Code128, 80, 2, TextPosition::Below)
            .unwrap_err();
        assert!(matches!(err, PrintError::InvalidArgument(_)));
        assert!(sink.commands().is_empty());

        sink.print_qr_code("https://example.com", 4, QrErrorLevel::Medium).unwrap();
        assert_eq!(sink.commands().len(), 1);
    }

    #[test]
    fn test_text_includes_columns() {
        let mut sink = RecordingSink::new();
        sink.print_text("Title\n").unwrap();
        sink.print_columns(&["a", "b"], &[1, 1], &[Align::Left, Align::Right])
            .unwrap();
        assert_eq!(sink.text(), "Title\na|b\n");
    }

    #[test]
    fn test_to_json() {
        let mut sink = RecordingSink::new();
        sink.line_wrap(2).unwrap();
        assert_eq!(sink.to_json().unwrap(), r#"[{"cmd":"line_wrap","lines":2}]"#);
    }

    #[tokio::test]
    async fn test_drawer_status() {
        let sink = RecordingSink::new().with_drawer_open(true);
        assert!(sink.drawer_status().await.unwrap());
        assert!(!RecordingSink::new().drawer_status().await.unwrap());
    }
}
