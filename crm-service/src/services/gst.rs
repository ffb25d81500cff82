//! GST invoice arithmetic.
//!
//! `calculate_gst` is the single source of the invoice totals used by the
//! invoice form, the lead-to-invoice conversion and the REST handlers.

use crate::models::InvoiceTotals;
use rust_decimal::Decimal;

/// Compute the derived invoice amounts.
///
/// ```text
/// discounted        = amount - amount * discount% / 100
/// total_without_gst = discounted
/// total_with_gst    = discounted + discounted * gst% / 100
/// remaining_amount  = total_with_gst - paid_amount
/// ```
///
/// Percentages are applied as given, without clamping, and negative inputs
/// are accepted. The arithmetic saturates at the `Decimal` bounds, so the
/// function never panics.
pub fn calculate_gst(
    amount: Decimal,
    discount_percent: Decimal,
    gst_rate_percent: Decimal,
    paid_amount: Decimal,
) -> InvoiceTotals {
    let discount = amount.saturating_mul(discount_percent / Decimal::ONE_HUNDRED);
    let discounted = amount.saturating_sub(discount);
    let gst_amount = discounted.saturating_mul(gst_rate_percent / Decimal::ONE_HUNDRED);
    let total_with_gst = discounted.saturating_add(gst_amount);

    InvoiceTotals {
        total_without_gst: discounted,
        total_with_gst,
        remaining_amount: total_with_gst.saturating_sub(paid_amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn known_example() {
        let totals = calculate_gst(dec("1000"), dec("10"), dec("18"), dec("500"));
        assert_eq!(totals.total_without_gst, dec("900"));
        assert_eq!(totals.total_with_gst, dec("1062"));
        assert_eq!(totals.remaining_amount, dec("562"));
        assert_eq!(totals.gst_amount(), dec("162"));
    }

    #[test]
    fn zero_discount_and_zero_gst_is_identity() {
        let amount = dec("4321.75");
        let paid = dec("21.75");
        let totals = calculate_gst(amount, Decimal::ZERO, Decimal::ZERO, paid);
        assert_eq!(totals.total_without_gst, amount);
        assert_eq!(totals.total_with_gst, amount);
        assert_eq!(totals.remaining_amount, amount - paid);
    }

    #[test]
    fn paying_the_total_leaves_nothing() {
        for (amount, discount, gst) in [
            ("1000", "10", "18"),
            ("999.99", "3.5", "28"),
            ("150", "0", "5"),
            ("77", "100", "12"),
        ] {
            let first = calculate_gst(dec(amount), dec(discount), dec(gst), Decimal::ZERO);
            let settled = calculate_gst(dec(amount), dec(discount), dec(gst), first.total_with_gst);
            assert_eq!(settled.remaining_amount, Decimal::ZERO);
        }
    }

    #[test]
    fn repeated_calls_agree() {
        let a = calculate_gst(dec("1234.56"), dec("7.5"), dec("18"), dec("100"));
        let b = calculate_gst(dec("1234.56"), dec("7.5"), dec("18"), dec("100"));
        assert_eq!(a, b);
    }

    #[test]
    fn out_of_range_percentages_are_not_clamped() {
        let totals = calculate_gst(dec("100"), dec("150"), dec("-10"), Decimal::ZERO);
        assert_eq!(totals.total_without_gst, dec("-50"));
        assert_eq!(totals.total_with_gst, dec("-45"));
        assert_eq!(totals.remaining_amount, dec("-45"));
    }

    #[test]
    fn negative_amount_is_accepted() {
        let totals = calculate_gst(dec("-200"), dec("10"), dec("5"), dec("10"));
        assert_eq!(totals.total_without_gst, dec("-180"));
        assert_eq!(totals.total_with_gst, dec("-189"));
        assert_eq!(totals.remaining_amount, dec("-199"));
    }

    #[test]
    fn overpayment_goes_negative() {
        let totals = calculate_gst(dec("100"), Decimal::ZERO, dec("18"), dec("200"));
        assert_eq!(totals.remaining_amount, dec("-82"));
    }

    #[test]
    fn huge_inputs_saturate_instead_of_panicking() {
        let totals = calculate_gst(Decimal::MAX, Decimal::ZERO, dec("28"), Decimal::MIN);
        assert_eq!(totals.total_with_gst, Decimal::MAX);
        assert_eq!(totals.remaining_amount, Decimal::MAX);
    }
}
