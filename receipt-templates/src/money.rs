//! Amount formatting

/// Format an amount with exactly two fraction digits
///
/// Negative zero prints as `0.00`.
pub fn format_amount(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(10.0), "10.00");
        assert_eq!(format_amount(2.2000000000000028), "2.20");
        assert_eq!(format_amount(-0.0), "0.00");
        assert_eq!(format_amount(-3.5), "-3.50");
        assert_eq!(format_amount(f64::NAN), "NaN");
    }
}
