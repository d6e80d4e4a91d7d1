use super::super::assumptions::{
    AFFORDABILITY_COMFORT_RATIO, AFFORDABILITY_LIMIT_RATIO, CREDIT_FLOOR_SCORE,
    CREDIT_READY_SCORE, RESERVE_TARGET_MONTHS, SCORE_CEILING,
};

/// Housing payment to net income. Zero income is the worst case: 0 points.
pub fn affordability_points(piti_mid: f64, net_monthly_income: f64) -> u8 {
    if !net_monthly_income.is_finite() || net_monthly_income <= 0.0 {
        return 0;
    }

    let ratio = piti_mid.max(0.0) / net_monthly_income;
    if !ratio.is_finite() {
        return 0;
    }

    if ratio < AFFORDABILITY_COMFORT_RATIO {
        return SCORE_CEILING;
    }
    if ratio > AFFORDABILITY_LIMIT_RATIO {
        return 0;
    }

    let band = AFFORDABILITY_LIMIT_RATIO - AFFORDABILITY_COMFORT_RATIO;
    let position = ratio - AFFORDABILITY_COMFORT_RATIO;
    to_points(100.0 * (1.0 - position / band))
}

pub fn credit_points(credit_score: Option<u16>) -> u8 {
    let Some(score) = credit_score else {
        return 0;
    };

    if score >= CREDIT_READY_SCORE {
        return SCORE_CEILING;
    }
    if score < CREDIT_FLOOR_SCORE {
        return 0;
    }

    let span = f64::from(CREDIT_READY_SCORE - CREDIT_FLOOR_SCORE);
    to_points(f64::from(score - CREDIT_FLOOR_SCORE) / span * 100.0)
}

/// Savings plus assistance measured in months of PITI.
pub fn reserves_points(savings: f64, dpa_amount: f64, piti_mid: f64) -> u8 {
    let reserves = finite_or_zero(savings) + finite_or_zero(dpa_amount);

    if !piti_mid.is_finite() || piti_mid <= 0.0 {
        // no payment to cover
        return if reserves > 0.0 { SCORE_CEILING } else { 0 };
    }

    let months = reserves / piti_mid;
    if months >= RESERVE_TARGET_MONTHS {
        return SCORE_CEILING;
    }
    if months <= 0.0 {
        return 0;
    }

    to_points(months / RESERVE_TARGET_MONTHS * 100.0)
}

pub fn packet_points(completeness_pct: f64) -> u8 {
    to_points(completeness_pct)
}

/// Months of PITI covered by savings alone.
pub fn reserves_months(savings: f64, piti_mid: f64) -> f64 {
    if !piti_mid.is_finite() || piti_mid <= 0.0 {
        return 0.0;
    }
    (finite_or_zero(savings) / piti_mid).max(0.0)
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn to_points(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, f64::from(SCORE_CEILING)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affordability_boundaries_are_exact() {
        assert_eq!(affordability_points(280.0, 1000.0), 100);
        assert_eq!(affordability_points(380.0, 1000.0), 0);
        assert_eq!(affordability_points(279.0, 1000.0), 100);
        assert_eq!(affordability_points(381.0, 1000.0), 0);
        assert_eq!(affordability_points(330.0, 1000.0), 50);
    }

    #[test]
    fn affordability_guards_zero_income() {
        assert_eq!(affordability_points(1450.0, 0.0), 0);
        assert_eq!(affordability_points(1450.0, -10.0), 0);
        assert_eq!(affordability_points(1450.0, f64::NAN), 0);
        assert_eq!(affordability_points(0.0, 3900.0), 100);
    }

    #[test]
    fn credit_boundaries_are_exact() {
        assert_eq!(credit_points(Some(640)), 100);
        assert_eq!(credit_points(Some(850)), 100);
        assert_eq!(credit_points(Some(580)), 0);
        assert_eq!(credit_points(Some(579)), 0);
        assert_eq!(credit_points(Some(630)), 83);
        assert_eq!(credit_points(Some(610)), 50);
        assert_eq!(credit_points(None), 0);
    }

    #[test]
    fn credit_points_are_monotonic() {
        let mut previous = 0;
        for score in 300..=850 {
            let points = credit_points(Some(score));
            assert!(points >= previous, "score {score} dropped points");
            previous = points;
        }
    }

    #[test]
    fn reserves_boundaries_are_exact() {
        assert_eq!(reserves_points(2000.0, 0.0, 1000.0), 100);
        assert_eq!(reserves_points(1000.0, 1000.0, 1000.0), 100);
        assert_eq!(reserves_points(0.0, 0.0, 1000.0), 0);
        assert_eq!(reserves_points(500.0, 0.0, 1000.0), 25);
        assert_eq!(reserves_points(500.0, 0.0, 1453.5), 17);
    }

    #[test]
    fn reserves_guard_zero_payment() {
        assert_eq!(reserves_points(100.0, 0.0, 0.0), 100);
        assert_eq!(reserves_points(0.0, 0.0, 0.0), 0);
        assert_eq!(reserves_points(-500.0, 0.0, 1000.0), 0);
        assert_eq!(reserves_months(6200.0, 0.0), 0.0);
    }

    #[test]
    fn reserves_points_are_monotonic_in_savings() {
        let mut previous = 0;
        for savings in (0..5_000).step_by(50) {
            let points = reserves_points(savings as f64, 0.0, 1453.5);
            assert!(points >= previous);
            previous = points;
        }
    }

    #[test]
    fn packet_points_round_and_clamp() {
        assert_eq!(packet_points(42.857), 43);
        assert_eq!(packet_points(0.0), 0);
        assert_eq!(packet_points(100.0), 100);
        assert_eq!(packet_points(130.0), 100);
        assert_eq!(packet_points(-4.0), 0);
        assert_eq!(packet_points(f64::NAN), 0);
    }
}
