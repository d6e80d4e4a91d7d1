use serde::{Deserialize, Serialize};

use super::assumptions::{
    ANNUAL_INTEREST_RATE, INSURANCE_RATE, LOAN_TERM_MONTHS, PAYMENT_BAND_HIGH, PAYMENT_BAND_LOW,
    PROPERTY_TAX_RATE,
};

/// Monthly PITI estimate expressed as a +/-5% band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRange {
    pub low: u32,
    pub high: u32,
}

impl PaymentRange {
    pub fn midpoint(&self) -> f64 {
        (f64::from(self.low) + f64::from(self.high)) / 2.0
    }
}

/// Level monthly principal and interest on a fixed-rate loan.
pub fn monthly_principal_interest(loan_amount: f64) -> f64 {
    if !loan_amount.is_finite() || loan_amount <= 0.0 {
        return 0.0;
    }

    let monthly_rate = ANNUAL_INTEREST_RATE / 12.0;
    let factor = (1.0 + monthly_rate).powi(LOAN_TERM_MONTHS);

    loan_amount * (monthly_rate * factor) / (factor - 1.0)
}

/// Unrounded monthly PITI for a purchase.
pub fn monthly_piti(home_price: f64, down_payment_pct: f64) -> f64 {
    if !home_price.is_finite() || home_price <= 0.0 {
        return 0.0;
    }

    let down_payment_pct = if down_payment_pct.is_finite() {
        down_payment_pct.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let loan_amount = home_price * (1.0 - down_payment_pct / 100.0);

    let principal_interest = monthly_principal_interest(loan_amount);
    let property_tax = home_price * PROPERTY_TAX_RATE / 12.0;
    let insurance = home_price * INSURANCE_RATE / 12.0;

    principal_interest + property_tax + insurance
}

/// Payment band for a purchase. The region code is carried for callers but
/// tax and insurance use statewide averages, so it does not change the result.
pub fn estimate_piti(home_price: f64, down_payment_pct: f64, _region: Option<&str>) -> PaymentRange {
    let base = monthly_piti(home_price, down_payment_pct);

    PaymentRange {
        low: round_currency(base * PAYMENT_BAND_LOW),
        high: round_currency(base * PAYMENT_BAND_HIGH),
    }
}

fn round_currency(amount: f64) -> u32 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    amount.round().min(f64::from(u32::MAX)) as u32
}

/// Whole dollars with thousands separators, e.g. `1526` -> `"$1,526"`.
pub fn format_dollars(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push('$');
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollars_are_grouped_by_thousands() {
        assert_eq!(format_dollars(0), "$0");
        assert_eq!(format_dollars(999), "$999");
        assert_eq!(format_dollars(1526), "$1,526");
        assert_eq!(format_dollars(195_000), "$195,000");
        assert_eq!(format_dollars(1_234_567), "$1,234,567");
    }

    #[test]
    fn principal_and_interest_matches_amortization_table() {
        let payment = monthly_principal_interest(189_150.0);
        assert!((payment - 1258.42).abs() < 0.01, "got {payment}");
    }

    #[test]
    fn band_for_demo_purchase() {
        let range = estimate_piti(195_000.0, 3.0, Some("27610"));
        assert_eq!(range, PaymentRange { low: 1381, high: 1526 });
        assert_eq!(range.midpoint(), 1453.5);
    }

    #[test]
    fn band_scales_with_price_and_down_payment() {
        assert_eq!(
            estimate_piti(300_000.0, 20.0, None),
            PaymentRange { low: 1802, high: 1992 }
        );
        assert_eq!(
            estimate_piti(100_000.0, 0.0, None),
            PaymentRange { low: 727, high: 804 }
        );
        assert_eq!(
            estimate_piti(250_000.0, 10.0, None),
            PaymentRange { low: 1660, high: 1834 }
        );
    }

    #[test]
    fn zero_price_yields_zero_band() {
        assert_eq!(estimate_piti(0.0, 3.0, None), PaymentRange { low: 0, high: 0 });
    }

    #[test]
    fn degenerate_inputs_stay_non_negative() {
        assert_eq!(estimate_piti(-50_000.0, 3.0, None), PaymentRange { low: 0, high: 0 });
        assert_eq!(estimate_piti(f64::NAN, 3.0, None), PaymentRange { low: 0, high: 0 });

        let full_cash = estimate_piti(200_000.0, 100.0, None);
        assert!(full_cash.low > 0, "taxes and insurance remain");
        assert!(full_cash.low <= full_cash.high);
    }

    #[test]
    fn region_does_not_change_estimate() {
        assert_eq!(
            estimate_piti(210_000.0, 3.0, Some("27610")),
            estimate_piti(210_000.0, 3.0, Some("90210"))
        );
    }

    #[test]
    fn low_never_exceeds_high() {
        for price in (0..=1_000_000).step_by(25_000) {
            for down in [0.0, 3.0, 3.5, 10.0, 20.0, 50.0, 100.0] {
                let range = estimate_piti(price as f64, down, None);
                assert!(range.low <= range.high, "price {price} down {down}");
            }
        }
    }
}
