use serde::{Deserialize, Serialize};

use super::assumptions::{PHASE_BOOST, SCORE_CEILING};
use super::domain::{Phase, ReadinessError, ReadinessScore};

/// Points a completed phase adds to the composite and packet scores.
pub const fn phase_boost(phase: Phase) -> u8 {
    match phase {
        Phase::Documents
        | Phase::Credit
        | Phase::Packet
        | Phase::PreApproval
        | Phase::Appraisal => PHASE_BOOST,
    }
}

/// Apply one phase-completion boost. The composite and the packet sub-score
/// each gain the boost independently, capped at 100; nothing else changes.
pub fn apply_phase_boost(score: &ReadinessScore, phase: Phase) -> ReadinessScore {
    let boost = phase_boost(phase);
    let mut boosted = score.clone();

    boosted.score = capped_add(score.score, boost);
    boosted.breakdown.packet.score = capped_add(score.breakdown.packet.score, boost);
    boosted.bonus = score.bonus.saturating_add(boosted.score - score.score);

    boosted
}

fn capped_add(value: u8, boost: u8) -> u8 {
    value.saturating_add(boost).min(SCORE_CEILING)
}

/// Completed checklist phases in completion order. Append-only, and phases
/// must be finished in the fixed checklist order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseProgress {
    completed: Vec<Phase>,
}

impl PhaseProgress {
    /// Replay phases in the given order, rejecting any that skip ahead.
    pub fn from_phases<I>(phases: I) -> Result<Self, ReadinessError>
    where
        I: IntoIterator<Item = Phase>,
    {
        let mut progress = Self::default();
        for phase in phases {
            progress.complete(phase)?;
        }
        Ok(progress)
    }

    /// Mark a phase complete. Returns `Ok(false)` when it already was.
    pub fn complete(&mut self, phase: Phase) -> Result<bool, ReadinessError> {
        if self.contains(phase) {
            return Ok(false);
        }

        match self.next() {
            Some(expected) if expected == phase => {
                self.completed.push(phase);
                Ok(true)
            }
            Some(expected) => Err(ReadinessError::PhaseOutOfOrder { phase, expected }),
            None => Ok(false),
        }
    }

    pub fn contains(&self, phase: Phase) -> bool {
        self.completed.contains(&phase)
    }

    /// The next phase in checklist order, or `None` once all are done.
    pub fn next(&self) -> Option<Phase> {
        Phase::ordered()
            .into_iter()
            .find(|phase| !self.contains(*phase))
    }

    pub fn completed(&self) -> &[Phase] {
        &self.completed
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.next().is_none()
    }

    /// Re-apply every earned boost, in completion order, on top of a base score.
    pub fn apply_to(&self, base: ReadinessScore) -> ReadinessScore {
        self.completed
            .iter()
            .fold(base, |score, phase| apply_phase_boost(&score, *phase))
    }
}
