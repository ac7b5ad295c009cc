//! Small helpers.

use rust_decimal::{Decimal, RoundingStrategy};

pub fn sanitize_symbol(sym: &str) -> String {
    sym.trim().to_uppercase()
}

/// Round to the nearest multiple of `step`, halves away from zero.
pub fn round_to_step(value: Decimal, step: Decimal) -> Decimal {
    if step.is_zero() {
        return value;
    }
    (value / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn symbols_are_trimmed_and_uppercased() {
        assert_eq!(sanitize_symbol("  aapl "), "AAPL");
        assert_eq!(sanitize_symbol("Brk"), "BRK");
    }

    #[test]
    fn rounds_to_thousands_and_tens() {
        assert_eq!(round_to_step(dec!(251499.99), dec!(1000)), dec!(251000));
        assert_eq!(round_to_step(dec!(251500), dec!(1000)), dec!(252000));
        assert_eq!(round_to_step(dec!(1234.5), dec!(10)), dec!(1230));
        assert_eq!(round_to_step(dec!(1235), dec!(10)), dec!(1240));
    }

    #[test]
    fn zero_step_is_identity() {
        assert_eq!(round_to_step(dec!(12.34), Decimal::ZERO), dec!(12.34));
    }
}
