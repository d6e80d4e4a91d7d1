mod eta;
mod rules;

pub use eta::{cash_gap_weeks, credit_repair_weeks, estimate_eta, packet_weeks};
pub use rules::{
    affordability_points, credit_points, packet_points, reserves_months, reserves_points,
};

use super::domain::{ReadinessScore, ScoreBreakdown, UserProfile};
use super::payment::estimate_piti;

/// Weighted composite of the four sub-scores, rounded half up.
pub fn aggregate(breakdown: &ScoreBreakdown) -> u8 {
    let weighted: u32 = breakdown
        .entries()
        .iter()
        .map(|(_, sub)| u32::from(sub.score) * u32::from(sub.weight))
        .sum();
    ((weighted + 50) / 100).min(100) as u8
}

/// Full readiness computation: payment band, sub-scores, composite, and ETA.
pub fn compute_readiness(
    profile: &UserProfile,
    dpa_amount: f64,
    packet_completeness: f64,
) -> ReadinessScore {
    let target_price = profile.target_price();
    let piti = estimate_piti(
        target_price,
        profile.effective_down_payment_pct(),
        profile.region.as_deref(),
    );
    let piti_mid = piti.midpoint();

    let breakdown = ScoreBreakdown::new(
        affordability_points(piti_mid, profile.net_monthly_income),
        credit_points(profile.credit_score),
        reserves_points(profile.savings, dpa_amount, piti_mid),
        packet_points(packet_completeness),
    );
    let eta = estimate_eta(profile, piti_mid, dpa_amount, packet_completeness);

    ReadinessScore {
        score: aggregate(&breakdown),
        piti_low: piti.low,
        piti_high: piti.high,
        eta_weeks: eta.weeks(),
        breakdown,
        eta,
        reserves_months: reserves_months(profile.savings, piti_mid),
        bonus: 0,
    }
}
