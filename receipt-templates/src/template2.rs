//! Tax-inclusive restaurant bill with token and table numbers
//!
//! CGST, SGST and the service charge are percentages of the subtotal,
//! each configurable on the receipt (defaults 2.5 / 2.5 / 5).

use inbuilt_printer::{Align, PrintResult, PrinterSink};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::items::LineItems;
use crate::money::format_amount;
use crate::RULE;

pub const DEFAULT_CGST_RATE: f64 = 2.5;
pub const DEFAULT_SGST_RATE: f64 = 2.5;
pub const DEFAULT_SERVICE_CHARGE_RATE: f64 = 5.0;

const ITEM_WIDTHS: [u32; 5] = [110, 40, 60, 50, 60];
const ITEM_ALIGNS: [Align; 5] = [
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Right,
    Align::Right,
];
const PAIR_WIDTHS: [u32; 2] = [1, 1];
const PAIR_ALIGNS: [Align; 2] = [Align::Left, Align::Right];
const SUMMARY_WIDTHS: [u32; 2] = [180, 80];
const SUMMARY_ALIGNS: [Align; 2] = [Align::Left, Align::Right];

const REFERENCE_NOTE: &str = "Reference bill only. Not a tax invoice.\n";

/// Header fields of a Template2 bill; all values are printed verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillHeader {
    pub store_name: String,
    pub address_lines: Vec<String>,
    pub phone_number: String,
    pub invoice_number: String,
    pub token_number: String,
    pub date: String,
    pub time: String,
    pub cashier: String,
    pub table_number: String,
}

/// Quantity, rate, discount and value of one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatedItem {
    pub quantity: f64,
    pub rate: f64,
    pub discount: f64,
    pub value: f64,
}

/// Restaurant bill with CGST/SGST and service charge
#[derive(Debug, Clone, PartialEq)]
pub struct Template2 {
    pub header: BillHeader,
    pub cgst_rate: f64,
    pub sgst_rate: f64,
    pub service_charge_rate: f64,
    items: LineItems<RatedItem>,
}

impl Template2 {
    pub fn new(header: BillHeader) -> Self {
        Self {
            header,
            cgst_rate: DEFAULT_CGST_RATE,
            sgst_rate: DEFAULT_SGST_RATE,
            service_charge_rate: DEFAULT_SERVICE_CHARGE_RATE,
            items: LineItems::new(),
        }
    }

    /// Add or replace the line named `name`. Values are not validated.
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        quantity: f64,
        rate: f64,
        discount: f64,
        value: f64,
    ) {
        self.items.insert(
            name,
            RatedItem {
                quantity,
                rate,
                discount,
                value,
            },
        );
    }

    pub fn items(&self) -> &LineItems<RatedItem> {
        &self.items
    }

    /// Σ quantity × rate
    pub fn compute_subtotal(&self) -> f64 {
        self.items.values().map(|i| i.quantity * i.rate).sum()
    }

    pub fn compute_cgst(&self) -> f64 {
        self.compute_subtotal() * self.cgst_rate / 100.0
    }

    pub fn compute_sgst(&self) -> f64 {
        self.compute_subtotal() * self.sgst_rate / 100.0
    }

    pub fn compute_service_charge(&self) -> f64 {
        self.compute_subtotal() * self.service_charge_rate / 100.0
    }

    /// Subtotal plus CGST, SGST and service charge
    pub fn compute_total(&self) -> f64 {
        self.compute_subtotal()
            + self.compute_cgst()
            + self.compute_sgst()
            + self.compute_service_charge()
    }

    /// Emit the bill
    ///
    /// The Value column repeats each line's discount field, and the
    /// rounding, cash tendered and change rows always read 0.00.
    #[instrument(skip_all, fields(invoice = %self.header.invoice_number, items = self.items.len()))]
    pub fn print_template<S: PrinterSink>(&self, sink: &mut S) -> PrintResult<()> {
        let h = &self.header;
        sink.init()?;

        // Store header
        sink.set_font_size(32)?;
        sink.set_font_weight(true)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(&format!("{}\n", h.store_name))?;

        sink.set_font_size(22)?;
        sink.set_font_weight(false)?;
        sink.set_alignment(Align::Center)?;
        for line in &h.address_lines {
            sink.print_text(&format!("{}\n", line))?;
        }
        sink.print_text(&format!("Ph: {}\n", h.phone_number))?;
        sink.line_wrap(1)?;

        sink.set_font_size(24)?;
        sink.set_font_weight(true)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(&format!("Invoice No: {}\n", h.invoice_number))?;

        // Token / cashier / table block
        sink.set_font_size(22)?;
        sink.set_font_weight(false)?;
        sink.set_alignment(Align::Left)?;
        sink.print_columns(
            &[&format!("Token No: {}", h.token_number), &format!("Date: {}", h.date)],
            &PAIR_WIDTHS,
            &PAIR_ALIGNS,
        )?;
        sink.print_columns(
            &[&format!("Cashier: {}", h.cashier), &format!("Time: {}", h.time)],
            &PAIR_WIDTHS,
            &PAIR_ALIGNS,
        )?;
        sink.print_columns(
            &[&format!("Table No: {}", h.table_number), ""],
            &PAIR_WIDTHS,
            &PAIR_ALIGNS,
        )?;
        sink.print_text(RULE)?;

        // Item table
        sink.set_font_weight(true)?;
        sink.print_columns(
            &["Item", "Qty", "Rate", "Disc", "Value"],
            &ITEM_WIDTHS,
            &ITEM_ALIGNS,
        )?;
        sink.set_font_weight(false)?;
        sink.print_text(RULE)?;

        for (name, item) in self.items.iter() {
            let quantity = item.quantity.to_string();
            let rate = format_amount(item.rate);
            let discount = format_amount(item.discount);
            sink.print_columns(
                &[name, &quantity, &rate, &discount, &discount],
                &ITEM_WIDTHS,
                &ITEM_ALIGNS,
            )?;
        }
        sink.print_text(RULE)?;

        // Tax breakdown
        let subtotal = self.compute_subtotal();
        let cgst = self.compute_cgst();
        let sgst = self.compute_sgst();
        let service_charge = self.compute_service_charge();
        let total = self.compute_total();

        let summary = [
            ("Sub Total".to_string(), subtotal),
            (format!("CGST @ {}%", self.cgst_rate), cgst),
            (format!("SGST @ {}%", self.sgst_rate), sgst),
            (format!("Service Charge @ {}%", self.service_charge_rate), service_charge),
            ("Rounded Off".to_string(), 0.0),
        ];
        for (label, amount) in &summary {
            let amount = format_amount(*amount);
            sink.print_columns(&[label, &amount], &SUMMARY_WIDTHS, &SUMMARY_ALIGNS)?;
        }
        sink.print_text(RULE)?;

        // Grand total
        sink.set_font_size(28)?;
        sink.set_font_weight(true)?;
        sink.print_columns(
            &["Grand Total", &format_amount(total)],
            &SUMMARY_WIDTHS,
            &SUMMARY_ALIGNS,
        )?;

        sink.set_font_size(22)?;
        sink.set_font_weight(false)?;
        sink.print_columns(&["Cash Tendered", "0.00"], &SUMMARY_WIDTHS, &SUMMARY_ALIGNS)?;
        sink.print_columns(&["Change", "0.00"], &SUMMARY_WIDTHS, &SUMMARY_ALIGNS)?;
        sink.print_text(RULE)?;

        // Footer
        sink.set_font_size(20)?;
        sink.set_font_weight(false)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(REFERENCE_NOTE)?;

        sink.set_font_size(24)?;
        sink.set_font_weight(true)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text("Thank You! Visit Again\n")?;

        sink.set_font_size(20)?;
        sink.set_font_weight(false)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(&format!("{} {}\n", h.date, h.time))?;
        sink.line_wrap(3)?;

        debug!(subtotal, cgst, sgst, service_charge, total, "template2 printed");
        Ok(())
    }
}
