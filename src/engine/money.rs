//! Money is handed to the payment provider as an integer amount of minor
//! currency units (kopecks/cents). Prices and budgets are stored as decimal
//! major units, so the conversion rounds half-up and happens in exactly one
//! place.

/// Convert a major-unit price (e.g. 19.99) to minor units (1999).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_amounts() {
        assert_eq!(to_minor_units(500.0), 50_000);
        assert_eq!(to_minor_units(0.0), 0);
    }

    #[test]
    fn fractional_amounts_round_half_up() {
        assert_eq!(to_minor_units(19.99), 1_999);
        assert_eq!(to_minor_units(0.005), 1);
        assert_eq!(to_minor_units(10.994), 1_099);
        assert_eq!(to_minor_units(10.995), 1_100);
    }

    #[test]
    fn float_representation_does_not_drift() {
        // 29.99 * 100 is 2998.9999... in f64; rounding must absorb it.
        assert_eq!(to_minor_units(29.99), 2_999);
        assert_eq!(to_minor_units(1234.56), 123_456);
    }
}
