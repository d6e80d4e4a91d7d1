use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::workflows::intake::{IntakeConversation, IntakeStep};
use crate::workflows::packet::DocumentView;
use crate::workflows::readiness::{
    Phase, ReadinessScore, ReadinessSession, TimelineView, UserProfile,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    Assistant,
    Buyer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Everything the coach remembers about one buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachSessionRecord {
    pub id: SessionId,
    pub started_on: NaiveDate,
    pub intake: IntakeConversation,
    pub readiness: ReadinessSession,
    pub transcript: Vec<ChatMessage>,
}

impl CoachSessionRecord {
    pub fn status_view(&self, today: NaiveDate) -> SessionView {
        let intake_step = self.intake.step();
        SessionView {
            session_id: self.id.clone(),
            started_on: self.started_on,
            intake_step,
            intake_step_label: intake_step.label(),
            profile: self.readiness.profile.clone(),
            dpa_amount: self.readiness.dpa_amount,
            packet_completeness: self.readiness.packet_completeness(),
            documents: self.readiness.documents.views(),
            completed_phases: self.readiness.progress.completed().to_vec(),
            next_phase: self.readiness.progress.next(),
            readiness: self.readiness.score(),
            timeline: self.readiness.timeline(today),
            transcript: self.transcript.clone(),
        }
    }
}

/// Storage abstraction so the service can be exercised without a backing store.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: CoachSessionRecord) -> Result<CoachSessionRecord, RepositoryError>;

    /// Read-modify-write of one stored session, atomic with respect to every
    /// other call on the same repository. The stored record is replaced only
    /// when `change` succeeds; unknown ids fail with `RepositoryError::NotFound`.
    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut CoachSessionRecord) -> Result<T, E>,
        E: From<RepositoryError>;

    fn fetch(&self, id: &SessionId) -> Result<Option<CoachSessionRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read model returned by the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub started_on: NaiveDate,
    pub intake_step: IntakeStep,
    pub intake_step_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    pub dpa_amount: f64,
    pub packet_completeness: f64,
    pub documents: Vec<DocumentView>,
    pub completed_phases: Vec<Phase>,
    pub next_phase: Option<Phase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness: Option<ReadinessScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<TimelineView>,
    pub transcript: Vec<ChatMessage>,
}
