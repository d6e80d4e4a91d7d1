use super::super::assumptions::{
    CLOSING_COST_RATE, CREDIT_READY_SCORE, CREDIT_REPAIR_WEEKS, MIN_WEEKLY_SURPLUS,
    PACKET_PERCENT_PER_WEEK, RESERVE_TARGET_MONTHS, WEEKS_PER_MONTH,
};
use super::super::domain::{EtaBreakdown, UserProfile};
use super::rules::finite_or_zero;

/// Weeks of saving needed to cover down payment, closing costs, and reserves.
pub fn cash_gap_weeks(profile: &UserProfile, piti_mid: f64, dpa_amount: f64) -> u32 {
    let target_price = finite_or_zero(profile.target_price()).max(0.0);
    let down_payment = target_price * (profile.effective_down_payment_pct() / 100.0);
    let closing_costs = target_price * CLOSING_COST_RATE;
    let reserve_target = finite_or_zero(piti_mid).max(0.0) * RESERVE_TARGET_MONTHS;

    let total_cash_needed = down_payment + closing_costs + reserve_target;
    let gap = (total_cash_needed - finite_or_zero(profile.savings) - finite_or_zero(dpa_amount))
        .max(0.0);
    if gap <= 0.0 {
        return 0;
    }

    let monthly_surplus = finite_or_zero(profile.net_monthly_income)
        - finite_or_zero(profile.monthly_rent)
        - finite_or_zero(profile.monthly_debts);
    let weekly_surplus = (monthly_surplus / WEEKS_PER_MONTH).max(MIN_WEEKLY_SURPLUS);

    to_weeks(gap / weekly_surplus)
}

pub fn credit_repair_weeks(credit_score: Option<u16>) -> u32 {
    match credit_score {
        Some(score) if score >= CREDIT_READY_SCORE => 0,
        _ => CREDIT_REPAIR_WEEKS,
    }
}

/// Roughly one week for every 10% of the packet still missing.
pub fn packet_weeks(completeness_pct: f64) -> u32 {
    let completeness = if completeness_pct.is_nan() {
        0.0
    } else {
        completeness_pct.clamp(0.0, 100.0)
    };
    to_weeks((100.0 - completeness) / PACKET_PERCENT_PER_WEEK)
}

pub fn estimate_eta(
    profile: &UserProfile,
    piti_mid: f64,
    dpa_amount: f64,
    packet_completeness: f64,
) -> EtaBreakdown {
    EtaBreakdown {
        cash_weeks: cash_gap_weeks(profile, piti_mid, dpa_amount),
        credit_weeks: credit_repair_weeks(profile.credit_score),
        packet_weeks: packet_weeks(packet_completeness),
    }
}

fn to_weeks(raw: f64) -> u32 {
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    raw.ceil().min(f64::from(u32::MAX)) as u32
}
