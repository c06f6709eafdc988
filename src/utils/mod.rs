/// Convert price from ticks to human-readable format
pub fn format_price(price_ticks: u64, tick_size: f64) -> String {
    format!("${:.2}", price_ticks as f64 * tick_size)
}

/// Convert human price to ticks.
///
/// Negative and NaN input maps to 0 ticks, which order validation rejects.
pub fn price_to_ticks(price: f64, tick_size: f64) -> u64 {
    if !(price > 0.0) {
        return 0;
    }
    (price / tick_size).round() as u64
}

/// Convert an external signed quantity. Anything below 1 maps to 0.
pub fn quantity_from_signed(quantity: i64) -> u64 {
    u64::try_from(quantity).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(10000, 0.01), "$100.00");
        assert_eq!(format_price(12550, 0.01), "$125.50");
        assert_eq!(format_price(55, 1.0), "$55.00");
    }

    #[test]
    fn test_price_to_ticks() {
        assert_eq!(price_to_ticks(100.0, 0.01), 10000);
        assert_eq!(price_to_ticks(125.50, 0.01), 12550);
        assert_eq!(price_to_ticks(-5.0, 0.01), 0);
        assert_eq!(price_to_ticks(f64::NAN, 0.01), 0);
    }

    #[test]
    fn test_quantity_from_signed() {
        assert_eq!(quantity_from_signed(150), 150);
        assert_eq!(quantity_from_signed(0), 0);
        assert_eq!(quantity_from_signed(-10), 0);
    }
}
