use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::boost::PhaseProgress;
use super::domain::{Phase, ReadinessError, ReadinessScore, UserProfile};
use super::scoring::compute_readiness;
use super::timeline::{dated_timeline, overlay_phases, project_timeline, TimelineView};
use crate::workflows::packet::{DocumentChecklist, PacketError};

/// Readiness inputs accumulated over a coaching session.
///
/// The score is always projected from these inputs, so updating the profile
/// or the DPA amount never discards boosts earned by completed phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSession {
    pub profile: Option<UserProfile>,
    pub dpa_amount: f64,
    pub documents: DocumentChecklist,
    pub progress: PhaseProgress,
}

impl ReadinessSession {
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: Some(profile),
            ..Self::default()
        }
    }

    /// Packet completeness fed into scoring.
    pub fn packet_completeness(&self) -> f64 {
        effective_packet_completeness(self.documents.completeness_pct(), &self.progress)
    }

    pub fn base_score(&self) -> Option<ReadinessScore> {
        self.profile
            .as_ref()
            .map(|profile| compute_readiness(profile, self.dpa_amount, self.packet_completeness()))
    }

    /// Base score with every completed phase boost applied in order.
    pub fn score(&self) -> Option<ReadinessScore> {
        self.profile
            .as_ref()
            .map(|profile| {
                project_readiness(
                    profile,
                    self.dpa_amount,
                    self.documents.completeness_pct(),
                    &self.progress,
                )
            })
    }

    pub fn timeline(&self, today: NaiveDate) -> Option<TimelineView> {
        let score = self.score()?;
        let milestones = overlay_phases(&project_timeline(score.eta_weeks), &self.progress);
        Some(dated_timeline(score.eta_weeks, &milestones, today))
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    /// Negative or non-finite amounts are stored as zero.
    pub fn set_dpa_amount(&mut self, amount: f64) {
        self.dpa_amount = if amount.is_finite() {
            amount.max(0.0)
        } else {
            0.0
        };
    }

    pub fn record_document(&mut self, key: &str, on: NaiveDate) -> Result<(), PacketError> {
        self.documents.record_upload(key, on)
    }

    /// Returns `Ok(false)` when the phase was already complete.
    pub fn complete_phase(&mut self, phase: Phase) -> Result<bool, ReadinessError> {
        self.progress.complete(phase)
    }
}

/// A finished packet phase counts as a full packet whatever the checklist says.
fn effective_packet_completeness(packet_completeness: f64, progress: &PhaseProgress) -> f64 {
    if progress.contains(Phase::Packet) {
        100.0
    } else {
        packet_completeness
    }
}

/// Score for a buyer's inputs plus the boosts of every completed phase. The
/// base is recomputed from scratch each time, so boosts never drift.
pub fn project_readiness(
    profile: &UserProfile,
    dpa_amount: f64,
    packet_completeness: f64,
    progress: &PhaseProgress,
) -> ReadinessScore {
    let packet = effective_packet_completeness(packet_completeness, progress);
    progress.apply_to(compute_readiness(profile, dpa_amount, packet))
}
