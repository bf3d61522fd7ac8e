//! Card payment slip

use inbuilt_printer::{Align, PrintResult, PrinterSink};
use serde::{Deserialize, Serialize};
use tracing::instrument;

const PAIR_WIDTHS: [u32; 2] = [1, 1];
const PAIR_ALIGNS: [Align; 2] = [Align::Left, Align::Right];

/// Card payment details, printed verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardPayment {
    pub amount: String,
    pub transaction_id: String,
    /// Already masked, e.g. `************0119`
    pub card_number: String,
    pub holder_name: String,
    pub brand: String,
    pub payment_type: String,
    pub entry_mode: String,
}

/// Card payment slip, appended after a receipt
///
/// Does not initialize the printer, so it continues the current job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate1 {
    pub payment: CardPayment,
}

impl CardTemplate1 {
    pub fn new(payment: CardPayment) -> Self {
        Self { payment }
    }

    #[instrument(skip_all, fields(txn = %self.payment.transaction_id))]
    pub fn print_template<S: PrinterSink>(&self, sink: &mut S) -> PrintResult<()> {
        let p = &self.payment;
        sink.set_font_size(24)?;
        sink.set_alignment(Align::Left)?;

        let rows: [(&str, &str, &str, &str); 4] = [
            ("Amount", p.amount.as_str(), "Card Number", p.card_number.as_str()),
            ("Card Brand", p.brand.as_str(), "", ""),
            ("Entry Mode", p.entry_mode.as_str(), "Transaction ID", p.transaction_id.as_str()),
            ("Card Holder", p.holder_name.as_str(), "Payment Type", p.payment_type.as_str()),
        ];

        for (left_label, left_value, right_label, right_value) in rows {
            sink.set_font_weight(true)?;
            sink.print_columns(&[left_label, right_label], &PAIR_WIDTHS, &PAIR_ALIGNS)?;
            sink.set_font_weight(false)?;
            sink.print_columns(&[left_value, right_value], &PAIR_WIDTHS, &PAIR_ALIGNS)?;
        }
        Ok(())
    }
}

impl From<CardPayment> for CardTemplate1 {
    fn from(payment: CardPayment) -> Self {
        Self::new(payment)
    }
}
