//! Self-service token receipt

use inbuilt_printer::{Align, PrintResult, PrinterSink};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::items::LineItems;
use crate::money::format_amount;
use crate::template1::TaxedItem;
use crate::RULE;

const ITEM_WIDTHS: [u32; 4] = [100, 40, 60, 70];
const ITEM_ALIGNS: [Align; 4] = [Align::Left, Align::Right, Align::Right, Align::Right];
const PAIR_WIDTHS: [u32; 2] = [1, 1];
const PAIR_ALIGNS: [Align; 2] = [Align::Left, Align::Right];

/// Header fields of a token receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenHeader {
    pub store_name: String,
    pub address: String,
    pub phone_number: String,
    pub date: String,
    pub cashier: String,
    pub token_number: String,
    /// Printed before the grand total
    pub currency: String,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            store_name: String::new(),
            address: String::new(),
            phone_number: String::new(),
            date: String::new(),
            cashier: String::new(),
            token_number: String::new(),
            currency: "$".to_string(),
        }
    }
}

/// Token receipt for self-service counters; no tax is applied
#[derive(Debug, Clone, PartialEq)]
pub struct Template3 {
    pub header: TokenHeader,
    items: LineItems<TaxedItem>,
}

impl Template3 {
    pub fn new(header: TokenHeader) -> Self {
        Self {
            header,
            items: LineItems::new(),
        }
    }

    /// Add or replace the line named `name`
    ///
    /// The tax percentage is kept with the item but does not enter any total.
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        quantity: i64,
        price: f64,
        tax_percent: f64,
    ) {
        self.items.insert(
            name,
            TaxedItem {
                quantity,
                price,
                tax_percent,
            },
        );
    }

    pub fn items(&self) -> &LineItems<TaxedItem> {
        &self.items
    }

    /// Σ quantity × price
    pub fn compute_subtotal(&self) -> f64 {
        self.items.values().map(TaxedItem::net).sum()
    }

    /// Σ quantity
    pub fn compute_total_quantity(&self) -> i64 {
        self.items.values().map(|i| i.quantity).sum()
    }

    /// Same as the subtotal
    pub fn compute_grand_total(&self) -> f64 {
        self.compute_subtotal()
    }

    #[instrument(skip_all, fields(token = %self.header.token_number, items = self.items.len()))]
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
        sink.print_text(&format!("{}\n", h.address))?;
        sink.print_text(&format!("{}\n", h.phone_number))?;
        sink.line_wrap(1)?;

        // Customer name is filled in by hand
        sink.set_font_size(24)?;
        sink.set_font_weight(false)?;
        sink.set_alignment(Align::Left)?;
        sink.print_text("Name:\n")?;
        sink.print_text(RULE)?;

        sink.set_font_size(22)?;
        sink.print_columns(
            &[&format!("Date: {}", h.date), &format!("Cashier: {}", h.cashier)],
            &PAIR_WIDTHS,
            &PAIR_ALIGNS,
        )?;

        sink.set_font_size(28)?;
        sink.set_font_weight(true)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(&format!("Token No: {}\n", h.token_number))?;

        // Item table
        sink.set_font_size(22)?;
        sink.set_font_weight(true)?;
        sink.set_alignment(Align::Left)?;
        sink.print_columns(&["Item", "Qty", "Price", "Amount"], &ITEM_WIDTHS, &ITEM_ALIGNS)?;
        sink.set_font_weight(false)?;
        for (name, item) in self.items.iter() {
            let quantity = item.quantity.to_string();
            let price = format_amount(item.price);
            let amount = format_amount(item.net());
            sink.print_columns(&[name, &quantity, &price, &amount], &ITEM_WIDTHS, &ITEM_ALIGNS)?;
        }
        sink.print_text(RULE)?;

        let subtotal = self.compute_subtotal();
        let total_quantity = self.compute_total_quantity();
        sink.set_font_weight(true)?;
        sink.print_columns(
            &["Total", &total_quantity.to_string(), "", &format_amount(subtotal)],
            &ITEM_WIDTHS,
            &ITEM_ALIGNS,
        )?;

        // Grand total
        sink.set_font_size(36)?;
        sink.set_font_weight(true)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(&format!(
            "Grand Total: {}{}\n",
            h.currency,
            format_amount(self.compute_grand_total())
        ))?;

        // Footer
        sink.set_font_size(24)?;
        sink.set_font_weight(false)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text("Thank you, visit again!\n")?;
        sink.line_wrap(3)?;

        debug!(subtotal, total_quantity, "template3 printed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbuilt_printer::RecordingSink;

    fn sample() -> Template3 {
        let mut t = Template3::new(TokenHeader {
            store_name: "Quick Bites".into(),
            address: "Food Court, Level 2".into(),
            phone_number: "555-0100".into(),
            date: "01/04/2023".into(),
            cashier: "Kiosk 3".into(),
            token_number: "A-23".into(),
            ..TokenHeader::default()
        });
        t.add_item("Burger", 2, 4.5, 5.0);
        t.add_item("Fries", 1, 2.25, 5.0);
        t.add_item("Soda", 3, 1.5, 0.0);
        t
    }

    #[test]
    fn test_totals() {
        let t = sample();
        assert!((t.compute_subtotal() - 15.75).abs() < 1e-9);
        assert_eq!(t.compute_total_quantity(), 6);
        // tax never applies here
        assert_eq!(t.compute_grand_total(), t.compute_subtotal());
    }

    #[test]
    fn test_overwrite_same_name() {
        let mut t = sample();
        t.add_item("Soda", 1, 1.5, 0.0);
        assert_eq!(t.compute_total_quantity(), 4);
        assert_eq!(t.items().len(), 3);
    }

    #[test]
    fn test_print_layout() {
        let mut sink = RecordingSink::new();
        sample().print_template(&mut sink).unwrap();
        let text = sink.text();

        assert!(text.starts_with("Quick Bites\nFood Court, Level 2\n555-0100\nName:\n"));
        assert!(text.contains("Date: 01/04/2023|Cashier: Kiosk 3\n"));
        assert!(text.contains("Token No: A-23\n"));
        assert!(text.contains("Item|Qty|Price|Amount\n"));
        // line amount is quantity × price
        assert!(text.contains("Burger|2|4.50|9.00\n"));
        assert!(text.contains("Soda|3|1.50|4.50\n"));
        assert!(text.contains("Total|6||15.75\n"));
        assert!(text.contains("Grand Total: $15.75\n"));
        assert!(text.ends_with("Thank you, visit again!\n"));
    }

    #[test]
    fn test_custom_currency() {
        let mut t = sample();
        t.header.currency = "Rs.".into();
        let mut sink = RecordingSink::new();
        t.print_template(&mut sink).unwrap();
        assert!(sink.text().contains("Grand Total: Rs.15.75\n"));
    }

    #[test]
    fn test_print_is_idempotent() {
        let t = sample();
        let mut first = RecordingSink::new();
        let mut second = RecordingSink::new();
        t.print_template(&mut first).unwrap();
        t.print_template(&mut second).unwrap();
        assert_eq!(first.commands(), second.commands());
    }
}
