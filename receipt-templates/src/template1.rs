//! Simple itemized receipt with per-item tax

use inbuilt_printer::{Align, PrintResult, PrinterSink};
use tracing::{debug, instrument};

use crate::items::LineItems;
use crate::money::format_amount;

const ITEM_WIDTHS: [u32; 3] = [120, 60, 60];
const TOTAL_WIDTHS: [u32; 3] = [60, 60, 60];
const ITEM_ALIGNS: [Align; 3] = [Align::Left, Align::Right, Align::Right];

/// Quantity, unit price and tax percentage of one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxedItem {
    pub quantity: i64,
    pub price: f64,
    pub tax_percent: f64,
}

impl TaxedItem {
    pub fn net(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    pub fn with_tax(&self) -> f64 {
        let net = self.net();
        net + net * self.tax_percent / 100.0
    }
}

/// Itemized customer copy: store header, item table, subtotal, tax, total
#[derive(Debug, Clone, PartialEq)]
pub struct Template1 {
    pub store_name: String,
    pub address: String,
    pub phone_number: String,
    items: LineItems<TaxedItem>,
}

impl Template1 {
    pub fn new(
        store_name: impl Into<String>,
        address: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            address: address.into(),
            phone_number: phone_number.into(),
            items: LineItems::new(),
        }
    }

    /// Add or replace the line named `name`. Values are not validated.
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

    /// Σ (quantity × price + quantity × price × tax / 100)
    pub fn compute_total(&self) -> f64 {
        self.items
            .iter()
            .map(|(name, item)| {
                let after_tax = item.with_tax();
                debug!(
                    item = name,
                    quantity = item.quantity,
                    price = item.price,
                    tax = item.tax_percent,
                    after_tax,
                    "item total"
                );
                after_tax
            })
            .sum()
    }

    /// Tax amount shown on the receipt
    pub fn compute_tax(&self) -> f64 {
        self.compute_total() - self.compute_subtotal()
    }

    /// Emit the receipt
    ///
    /// The Amount column shows the unit price of each line.
    #[instrument(skip_all, fields(store = %self.store_name, items = self.items.len()))]
    pub fn print_template<S: PrinterSink>(&self, sink: &mut S) -> PrintResult<()> {
        sink.init()?;

        // Store header
        sink.set_font_size(40)?;
        sink.set_font_weight(true)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(&format!("{}\n", self.store_name))?;

        sink.set_font_size(24)?;
        sink.set_font_weight(false)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(&format!("{}\n", self.address))?;

        sink.set_font_size(24)?;
        sink.set_font_weight(false)?;
        sink.set_alignment(Align::Center)?;
        sink.print_text(&format!("{}\n", self.phone_number))?;
        sink.line_wrap(1)?;

        // Receipt type
        sink.set_font_size(24)?;
        sink.set_font_weight(true)?;
        sink.set_alignment(Align::Left)?;
        sink.print_text("Customer copy\n")?;
        sink.line_wrap(1)?;

        // Item table
        sink.set_font_size(24)?;
        sink.set_font_weight(false)?;
        sink.print_columns(&["Description", "Quantity", "Amount"], &ITEM_WIDTHS, &ITEM_ALIGNS)?;
        sink.print_columns(&["-----------", "--------", "------"], &ITEM_WIDTHS, &ITEM_ALIGNS)?;

        for (name, item) in self.items.iter() {
            let quantity = item.quantity.to_string();
            let price = format_amount(item.price);
            sink.print_columns(&[name, &quantity, &price], &ITEM_WIDTHS, &ITEM_ALIGNS)?;
        }

        // Subtotal and tax
        let subtotal = self.compute_subtotal();
        let total = self.compute_total();
        sink.print_columns(&[" ", " ", "--------"], &ITEM_WIDTHS, &ITEM_ALIGNS)?;
        sink.print_columns(
            &[" ", "Subtotal", &format_amount(subtotal)],
            &ITEM_WIDTHS,
            &ITEM_ALIGNS,
        )?;
        sink.print_columns(
            &[" ", "Tax", &format_amount(total - subtotal)],
            &ITEM_WIDTHS,
            &ITEM_ALIGNS,
        )?;

        // Total
        sink.set_font_size(40)?;
        sink.set_font_weight(true)?;
        sink.print_columns(&[" ", "Total", &format_amount(total)], &TOTAL_WIDTHS, &ITEM_ALIGNS)?;

        // Cash
        sink.set_font_size(24)?;
        sink.set_font_weight(false)?;
        sink.print_columns(&[" ", "Cash $", &format_amount(total)], &ITEM_WIDTHS, &ITEM_ALIGNS)?;
        sink.line_wrap(1)?;

        debug!(subtotal, total, "template1 printed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbuilt_printer::{Command, RecordingSink};

    fn sample() -> Template1 {
        let mut t = Template1::new("My Store", "Store address, no 123", "+1234567890");
        t.add_item("Item 1", 1, 10.0, 0.0);
        t.add_item("Item 2", 1, 10.0, 10.0);
        t.add_item("Item 3", 1, 10.0, 12.0);
        t
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_example_totals() {
        let t = sample();
        assert!(close(t.compute_subtotal(), 30.0));
        assert!(close(t.compute_total(), 32.2));
        assert_eq!(format_amount(t.compute_tax()), "2.20");
    }

    #[test]
    fn test_empty_receipt() {
        let t = Template1::new("S", "A", "P");
        assert_eq!(t.compute_subtotal(), 0.0);
        assert_eq!(t.compute_total(), 0.0);
    }

    #[test]
    fn test_overwrite_same_name() {
        let mut t = Template1::new("S", "A", "P");
        t.add_item("Apple", 1, 1.0, 0.0);
        t.add_item("Apple", 2, 1.0, 0.0);
        assert!(close(t.compute_subtotal(), 2.0));
        assert_eq!(t.items().len(), 1);
    }

    #[test]
    fn test_tax_is_sum_of_item_taxes() {
        let mut t = Template1::new("S", "A", "P");
        t.add_item("a", 3, 2.5, 8.0);
        t.add_item("b", 2, 4.75, 18.0);
        t.add_item("c", 5, 1.2, 0.0);
        let expected = 3.0 * 2.5 * 0.08 + 2.0 * 4.75 * 0.18;
        assert!(close(t.compute_tax(), expected));
    }

    #[test]
    fn test_negative_input_accepted() {
        let mut t = Template1::new("S", "A", "P");
        t.add_item("refund", -1, 5.0, 10.0);
        assert!(close(t.compute_subtotal(), -5.0));
        assert!(close(t.compute_total(), -5.5));
    }

    #[test]
    fn test_print_layout() {
        let mut sink = RecordingSink::new();
        sample().print_template(&mut sink).unwrap();

        let commands = sink.commands();
        assert_eq!(commands[0], Command::Init);
        assert_eq!(commands[1], Command::FontSize { points: 40 });
        assert_eq!(
            commands.last(),
            Some(&Command::LineWrap { lines: 1 })
        );

        let text = sink.text();
        assert!(text.starts_with("My Store\nStore address, no 123\n+1234567890\nCustomer copy\n"));
        assert!(text.contains("Description|Quantity|Amount\n"));
        // unit price in the Amount column
        assert!(text.contains("Item 2|1|10.00\n"));
        assert!(text.contains(" |Subtotal|30.00\n"));
        assert!(text.contains(" |Tax|2.20\n"));
        assert!(text.contains(" |Total|32.20\n"));
        assert!(text.contains(" |Cash $|32.20\n"));
    }

    #[test]
    fn test_total_row_uses_large_bold_font() {
        let mut sink = RecordingSink::new();
        sample().print_template(&mut sink).unwrap();
        let commands = sink.commands();

        let idx = commands
            .iter()
            .position(|c| matches!(c, Command::Columns(row) if row.texts()[1] == "Total"))
            .unwrap();
        assert_eq!(commands[idx - 2], Command::FontSize { points: 40 });
        assert_eq!(commands[idx - 1], Command::FontWeight { bold: true });
        match &commands[idx] {
            Command::Columns(row) => assert_eq!(row.widths(), &[60, 60, 60]),
            other => panic!("unexpected {:?}", other),
        }
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
