use chrono::NaiveDate;
use homekey::workflows::readiness::{
    dated_timeline, overlay_phases, project_timeline, MilestoneId, MilestoneStatus, Phase,
    PhaseProgress,
};

fn weeks_for(eta_weeks: u32) -> Vec<u32> {
    project_timeline(eta_weeks)
        .iter()
        .map(|milestone| milestone.weeks)
        .collect()
}

#[test]
fn ten_week_plan_matches_template() {
    let milestones = project_timeline(10);
    let ids: Vec<MilestoneId> = milestones.iter().map(|milestone| milestone.id).collect();

    assert_eq!(
        ids,
        vec![
            MilestoneId::Budget,
            MilestoneId::Dpa,
            MilestoneId::Docs,
            MilestoneId::Credit,
            MilestoneId::Packet,
            MilestoneId::PreApproval,
            MilestoneId::Appraisal,
        ]
    );
    assert_eq!(weeks_for(10), vec![0, 1, 3, 5, 8, 10, 12]);
    assert_eq!(milestones[0].status, MilestoneStatus::Completed);
    assert_eq!(milestones[1].status, MilestoneStatus::Current);
    assert!(milestones[2..]
        .iter()
        .all(|milestone| milestone.status == MilestoneStatus::Upcoming));
}

#[test]
fn caps_and_floors_apply_to_long_and_odd_plans() {
    assert_eq!(weeks_for(40), vec![0, 1, 3, 6, 32, 40, 42]);
    assert_eq!(weeks_for(7), vec![0, 1, 2, 3, 5, 7, 9]);
    assert_eq!(weeks_for(0), vec![0, 1, 0, 0, 0, 0, 2]);
}

#[test]
fn overlay_tracks_completed_phases() {
    let mut progress = PhaseProgress::default();
    progress.complete(Phase::Documents).expect("first phase");
    progress.complete(Phase::Credit).expect("second phase");

    let statuses: Vec<MilestoneStatus> = overlay_phases(&project_timeline(16), &progress)
        .iter()
        .map(|milestone| milestone.status)
        .collect();

    assert_eq!(
        statuses,
        vec![
            MilestoneStatus::Completed,
            MilestoneStatus::Completed,
            MilestoneStatus::Completed,
            MilestoneStatus::Completed,
            MilestoneStatus::Current,
            MilestoneStatus::Upcoming,
            MilestoneStatus::Upcoming,
        ]
    );
}

#[test]
fn dated_timeline_counts_weeks_from_today() {
    let today = NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date");
    let view = dated_timeline(10, &project_timeline(10), today);

    assert_eq!(
        view.target_date,
        NaiveDate::from_ymd_opt(2026, 3, 16).expect("valid date")
    );
    let appraisal = view.milestones.last().expect("appraisal milestone");
    assert_eq!(appraisal.id, MilestoneId::Appraisal);
    assert_eq!(
        appraisal.target_date,
        NaiveDate::from_ymd_opt(2026, 3, 30).expect("valid date")
    );
    assert_eq!(view.milestones[0].status_label, "Completed");
}
