use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::boost::PhaseProgress;
use super::domain::{MilestoneStatus, Phase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneId {
    Budget,
    Dpa,
    Docs,
    Credit,
    Packet,
    #[serde(rename = "preapproval")]
    PreApproval,
    Appraisal,
}

impl MilestoneId {
    /// Checklist phase whose completion marks this milestone done.
    pub const fn phase(self) -> Option<Phase> {
        match self {
            Self::Budget | Self::Dpa => None,
            Self::Docs => Some(Phase::Documents),
            Self::Credit => Some(Phase::Credit),
            Self::Packet => Some(Phase::Packet),
            Self::PreApproval => Some(Phase::PreApproval),
            Self::Appraisal => Some(Phase::Appraisal),
        }
    }
}

/// How a milestone's week offset derives from the overall ETA.
#[derive(Debug, Clone, Copy)]
pub enum WeekOffset {
    Fixed(u32),
    /// `floor(eta * percent / 100)`, optionally capped.
    ShareOfEta { percent: u32, cap: Option<u32> },
    AfterEta(u32),
}

impl WeekOffset {
    pub(crate) fn resolve(&self, eta_weeks: u32) -> u32 {
        match *self {
            WeekOffset::Fixed(weeks) => weeks,
            WeekOffset::ShareOfEta { percent, cap } => {
                let share = (u64::from(eta_weeks) * u64::from(percent) / 100) as u32;
                cap.map_or(share, |cap| share.min(cap))
            }
            WeekOffset::AfterEta(weeks) => eta_weeks.saturating_add(weeks),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MilestoneTemplate {
    pub id: MilestoneId,
    pub title: &'static str,
    pub offset: WeekOffset,
}

pub const MILESTONE_TEMPLATE: [MilestoneTemplate; 7] = [
    MilestoneTemplate {
        id: MilestoneId::Budget,
        title: "Budget Set",
        offset: WeekOffset::Fixed(0),
    },
    MilestoneTemplate {
        id: MilestoneId::Dpa,
        title: "DPA Pre-Check",
        offset: WeekOffset::Fixed(1),
    },
    MilestoneTemplate {
        id: MilestoneId::Docs,
        title: "Docs 80%",
        offset: WeekOffset::ShareOfEta {
            percent: 30,
            cap: Some(3),
        },
    },
    MilestoneTemplate {
        id: MilestoneId::Credit,
        title: "Credit Tune-Up",
        offset: WeekOffset::ShareOfEta {
            percent: 50,
            cap: Some(6),
        },
    },
    MilestoneTemplate {
        id: MilestoneId::Packet,
        title: "Lender-Ready Packet",
        offset: WeekOffset::ShareOfEta {
            percent: 80,
            cap: None,
        },
    },
    MilestoneTemplate {
        id: MilestoneId::PreApproval,
        title: "Pre-Approval Window",
        offset: WeekOffset::AfterEta(0),
    },
    MilestoneTemplate {
        id: MilestoneId::Appraisal,
        title: "Appraisal Prep",
        offset: WeekOffset::AfterEta(2),
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineMilestone {
    pub id: MilestoneId,
    pub title: &'static str,
    pub weeks: u32,
    pub status: MilestoneStatus,
}

/// Expand the milestone template for an ETA. The first milestone starts
/// completed, the second current, the rest upcoming.
pub fn project_timeline(eta_weeks: u32) -> Vec<TimelineMilestone> {
    MILESTONE_TEMPLATE
        .iter()
        .enumerate()
        .map(|(index, template)| TimelineMilestone {
            id: template.id,
            title: template.title,
            weeks: template.offset.resolve(eta_weeks),
            status: match index {
                0 => MilestoneStatus::Completed,
                1 => MilestoneStatus::Current,
                _ => MilestoneStatus::Upcoming,
            },
        })
        .collect()
}

/// Display statuses given the phases a buyer has finished.
pub fn overlay_phases(
    milestones: &[TimelineMilestone],
    progress: &PhaseProgress,
) -> Vec<TimelineMilestone> {
    let next_phase = progress.next();

    milestones
        .iter()
        .map(|milestone| {
            let status = match (milestone.id, milestone.id.phase()) {
                (MilestoneId::Budget, _) => MilestoneStatus::Completed,
                (MilestoneId::Dpa, _) if progress.is_empty() => MilestoneStatus::Current,
                (MilestoneId::Dpa, _) => MilestoneStatus::Completed,
                (_, Some(phase)) if progress.contains(phase) => MilestoneStatus::Completed,
                (_, Some(phase)) if next_phase == Some(phase) => MilestoneStatus::Current,
                _ => MilestoneStatus::Upcoming,
            };
            TimelineMilestone {
                status,
                ..milestone.clone()
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedMilestone {
    pub id: MilestoneId,
    pub title: &'static str,
    pub weeks: u32,
    pub status: MilestoneStatus,
    pub status_label: &'static str,
    pub target_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineView {
    pub eta_weeks: u32,
    pub target_date: NaiveDate,
    pub milestones: Vec<DatedMilestone>,
}

pub fn dated_timeline(
    eta_weeks: u32,
    milestones: &[TimelineMilestone],
    today: NaiveDate,
) -> TimelineView {
    let milestones = milestones
        .iter()
        .map(|milestone| DatedMilestone {
            id: milestone.id,
            title: milestone.title,
            weeks: milestone.weeks,
            status: milestone.status,
            status_label: milestone.status.label(),
            target_date: weeks_from(today, milestone.weeks),
        })
        .collect();

    TimelineView {
        eta_weeks,
        target_date: weeks_from(today, eta_weeks),
        milestones,
    }
}

fn weeks_from(today: NaiveDate, weeks: u32) -> NaiveDate {
    today
        .checked_add_signed(Duration::weeks(i64::from(weeks)))
        .unwrap_or(NaiveDate::MAX)
}
