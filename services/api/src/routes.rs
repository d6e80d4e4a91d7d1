use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{NaiveDate, Utc};
use homekey::error::AppError;
use homekey::workflows::coach::{coach_router, CoachSessionService, SessionRepository};
use homekey::workflows::readiness::{
    dated_timeline, overlay_phases, project_readiness, project_timeline, validate_dpa_amount,
    Phase, PhaseProgress, ReadinessScore, TimelineView, UserProfile,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) profile: UserProfile,
    #[serde(default)]
    pub(crate) dpa_amount: f64,
    #[serde(default)]
    pub(crate) packet_completeness: f64,
    #[serde(default)]
    pub(crate) completed_phases: Vec<Phase>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreResponse {
    pub(crate) profile: UserProfile,
    pub(crate) readiness: ReadinessScore,
    pub(crate) timeline: TimelineView,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimelineRequest {
    pub(crate) eta_weeks: u32,
    #[serde(default)]
    pub(crate) completed_phases: Vec<Phase>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn with_readiness_routes<R>(service: Arc<CoachSessionService<R>>) -> axum::Router
where
    R: SessionRepository + 'static,
{
    coach_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/readiness/score",
            axum::routing::post(score_endpoint),
        )
        .route(
            "/api/v1/readiness/timeline",
            axum::routing::post(timeline_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Stateless scoring for a posted profile, with boosts for any phases the
/// caller reports as done.
pub(crate) async fn score_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let ScoreRequest {
        profile,
        dpa_amount,
        packet_completeness,
        completed_phases,
        today,
    } = payload;

    let profile = state.coach.fill_profile_defaults(profile);
    profile.validate()?;
    let dpa_amount = validate_dpa_amount(dpa_amount)?;
    let progress = PhaseProgress::from_phases(completed_phases)?;

    let readiness = project_readiness(&profile, dpa_amount, packet_completeness, &progress);
    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let milestones = overlay_phases(&project_timeline(readiness.eta_weeks), &progress);
    let timeline = dated_timeline(readiness.eta_weeks, &milestones, today);

    Ok(Json(ScoreResponse {
        profile,
        readiness,
        timeline,
    }))
}

pub(crate) async fn timeline_endpoint(
    Json(payload): Json<TimelineRequest>,
) -> Result<Json<TimelineView>, AppError> {
    let progress = PhaseProgress::from_phases(payload.completed_phases)?;
    let today = payload.today.unwrap_or_else(|| Utc::now().date_naive());
    let milestones = overlay_phases(&project_timeline(payload.eta_weeks), &progress);

    Ok(Json(dated_timeline(payload.eta_weeks, &milestones, today)))
}
