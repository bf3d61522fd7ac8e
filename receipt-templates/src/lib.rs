//! # receipt-templates
//!
//! Receipt layouts composed from [`PrinterSink`](inbuilt_printer::PrinterSink)
//! commands (WHAT to print).
//!
//! | Template | Layout |
//! |----------|--------|
//! | [`Template1`] | itemized customer copy with per-item tax |
//! | [`Template2`] | restaurant bill with CGST/SGST and service charge |
//! | [`Template3`] | self-service token receipt |
//! | [`CardTemplate1`] | card payment slip |
//!
//! Each template accumulates line items with `add_item` (re-adding a name
//! replaces that line) and emits a fixed command sequence with
//! `print_template`. Totals are computed on demand and never cached.
//!
//! ## Example
//!
//! ```ignore
//! use inbuilt_printer::{EscPosSink, NetworkPrinter, PrinterConfig, PrinterSink};
//! use receipt_templates::{CardPayment, CardTemplate1, Template1};
//!
//! let config = PrinterConfig::from_env();
//! let mut sink = EscPosSink::from_config(NetworkPrinter::from_config(&config)?, &config);
//!
//! let mut receipt = Template1::new("My Store", "Store address, no 123", "+1234567890");
//! receipt.add_item("Item 1", 1, 10.0, 0.0);
//! receipt.add_item("Item 2", 1, 10.0, 10.0);
//! receipt.print_template(&mut sink)?;
//!
//! CardTemplate1::new(CardPayment { amount: "22.00".into(), ..Default::default() })
//!     .print_template(&mut sink)?;
//!
//! sink.cut_paper()?;
//! sink.flush().await?;
//! ```

mod card;
mod items;
mod money;
mod template1;
mod template2;
mod template3;

pub use card::{CardPayment, CardTemplate1};
pub use items::LineItems;
pub use money::format_amount;
pub use template1::{TaxedItem, Template1};
pub use template2::{
    BillHeader, DEFAULT_CGST_RATE, DEFAULT_SERVICE_CHARGE_RATE, DEFAULT_SGST_RATE, RatedItem,
    Template2,
};
pub use template3::{Template3, TokenHeader};

/// Ruled separator line for 58mm paper at the base font size
pub(crate) const RULE: &str = "--------------------------------\n";
