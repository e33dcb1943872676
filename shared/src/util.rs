//! Money helpers
//!
//! Sale totals are kept in `Decimal` so that `price × quantity` rounds the
//! same way every time it is recomputed.

use rust_decimal::{Decimal, RoundingStrategy};

/// Largest unit price accepted by the sale form
pub const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);

/// Round a monetary amount to two decimal places (half away from zero)
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Line total: `round(price × quantity, 2)`, `None` on overflow
pub fn line_total(price: Decimal, quantity: i32) -> Option<Decimal> {
    price.checked_mul(Decimal::from(quantity)).map(round_money)
}

/// Format a value as Brazilian currency text, e.g. `R$ 1.234,50`
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_money(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-R$ {},{}", grouped, frac_part)
    } else {
        format!("R$ {},{}", grouped, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_rounds_to_cents() {
        assert_eq!(line_total(Decimal::new(1999, 2), 3), Some(Decimal::new(5997, 2)));
        assert_eq!(line_total(Decimal::new(3333, 3), 3), Some(Decimal::new(1000, 2)));
        assert_eq!(line_total(Decimal::new(5, 3), 1), Some(Decimal::new(1, 2)));
    }

    #[test]
    fn test_line_total_overflow() {
        assert_eq!(line_total(Decimal::MAX, 2), None);
        assert_eq!(line_total(MAX_PRICE, 9999), Some(Decimal::new(999_899_990_001, 2)));
    }

    #[test]
    fn test_max_price() {
        assert_eq!(MAX_PRICE, Decimal::new(99_999_999, 2));
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::new(1234_50, 2)), "R$ 1.234,50");
        assert_eq!(format_brl(Decimal::new(5997, 2)), "R$ 59,97");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
        assert_eq!(format_brl(Decimal::new(100_000_000, 2)), "R$ 1.000.000,00");
        assert_eq!(format_brl(Decimal::new(-250, 2)), "-R$ 2,50");
    }
}
