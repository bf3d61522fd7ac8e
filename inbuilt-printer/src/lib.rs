//! # inbuilt-printer
//!
//! Typed command bridge for built-in receipt printers.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - The printer command vocabulary ([`Command`]) and the [`PrinterSink`] trait
//! - ESC/POS rendering with GBK text ([`EscPosSink`], [`EscPosBuilder`])
//! - Transactional print buffering (enter / commit / exit)
//! - Network printing (TCP port 9100) and drawer status queries
//! - Bitmap processing (optional `image` feature)
//!
//! Receipt layouts (WHAT to print) live in `receipt-templates`.
//!
//! ## Example
//!
//! ```ignore
//! use inbuilt_printer::{Align, EscPosSink, NetworkPrinter, PrinterConfig, PrinterSink};
//!
//! let config = PrinterConfig::from_env();
//! let printer = NetworkPrinter::from_config(&config)?;
//! let mut sink = EscPosSink::from_config(printer, &config);
//!
//! sink.init()?;
//! sink.set_font_size(30)?;
//! sink.set_font_weight(true)?;
//! sink.set_alignment(Align::Center)?;
//! sink.print_text("WELCOME TEST\n")?;
//! sink.cut_paper()?;
//! sink.flush().await?;
//! ```

#[cfg(feature = "image")]
mod bitmap;
mod command;
mod config;
mod encoding;
mod error;
mod escpos;
mod escpos_sink;
mod printer;
mod sink;

// Re-exports
pub use command::{
    Align, BARCODE_MAX_DATA_LEN, BarcodeSymbology, ColumnRow, Command, PrinterStyleKey,
    PrinterStyleValue, QR_MAX_DATA_LEN, QrErrorLevel, TextPosition,
};
pub use config::{PaperWidth, PrinterConfig};
pub use encoding::{encode_gbk, gbk_width, pad_gbk, truncate_gbk};
pub use error::{PrintError, PrintResult};
pub use escpos::EscPosBuilder;
pub use escpos_sink::{BASE_FONT_SIZE, EscPosSink};
pub use printer::{MemoryPrinter, NetworkPrinter, Printer};
pub use sink::{PrinterSink, RecordingSink};

#[cfg(feature = "image")]
pub use bitmap::{Raster, decode_bitmap, rasterize};
