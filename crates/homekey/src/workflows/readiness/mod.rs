//! Homebuyer readiness: payment estimation, weighted scoring, time-to-ready
//! estimation, milestone projection, and phase boosts.

pub mod assumptions;
mod boost;
pub mod domain;
mod payment;
mod scoring;
mod session;
mod timeline;

pub use boost::{apply_phase_boost, phase_boost, PhaseProgress};
pub use domain::{
    validate_dpa_amount, EtaBreakdown, MilestoneStatus, Phase, ReadinessError, ReadinessScore,
    ScoreBreakdown, SubScore, UserProfile,
};
pub use payment::{
    estimate_piti, format_dollars, monthly_piti, monthly_principal_interest, PaymentRange,
};
pub use scoring::{
    affordability_points, aggregate, cash_gap_weeks, compute_readiness, credit_points,
    credit_repair_weeks, estimate_eta, packet_points, packet_weeks, reserves_months,
    reserves_points,
};
pub use session::{project_readiness, ReadinessSession};
pub use timeline::{
    dated_timeline, overlay_phases, project_timeline, DatedMilestone, MilestoneId,
    MilestoneTemplate, TimelineMilestone, TimelineView, WeekOffset, MILESTONE_TEMPLATE,
};
