use chrono::NaiveDate;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::repository::{
    ChatMessage, ChatRole, CoachSessionRecord, RepositoryError, SessionId, SessionRepository,
};
use crate::config::CoachConfig;
use crate::workflows::intake::{IntakeConversation, WELCOME_MESSAGE};
use crate::workflows::packet::PacketError;
use crate::workflows::readiness::{validate_dpa_amount, Phase, ReadinessError, ReadinessSession};

/// Coordinates the intake conversation, document checklist, DPA updates, and
/// phase progression for each buyer session.
pub struct CoachSessionService<R> {
    repository: Arc<R>,
    config: CoachConfig,
    sequence: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct MessageOutcome {
    pub reply: String,
    pub record: CoachSessionRecord,
}

#[derive(Debug, Clone)]
pub struct PhaseOutcome {
    pub phase: Phase,
    /// False when the phase had already been completed.
    pub newly_completed: bool,
    pub record: CoachSessionRecord,
}

impl<R> CoachSessionService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: CoachConfig) -> Self {
        Self {
            repository,
            config,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_session_id(&self) -> SessionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        SessionId(format!("session-{id:06}"))
    }

    /// Open a session with the welcome message already in the transcript.
    pub fn start_session(&self, today: NaiveDate) -> Result<CoachSessionRecord, CoachServiceError> {
        let record = CoachSessionRecord {
            id: self.next_session_id(),
            started_on: today,
            intake: IntakeConversation::new(),
            readiness: ReadinessSession::default(),
            transcript: vec![ChatMessage {
                role: ChatRole::Assistant,
                content: WELCOME_MESSAGE.to_string(),
            }],
        };

        let stored = self.repository.insert(record)?;
        tracing::info!(session = %stored.id, "coach session started");
        Ok(stored)
    }

    pub fn get(&self, id: &SessionId) -> Result<CoachSessionRecord, CoachServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Feed one buyer message through the intake. The turn that finishes the
    /// intake installs the assembled profile on the session.
    pub fn send_message(
        &self,
        id: &SessionId,
        content: &str,
    ) -> Result<MessageOutcome, CoachServiceError> {
        self.repository
            .modify(id, |record| -> Result<MessageOutcome, CoachServiceError> {
                let reply = record.intake.respond(content, &self.config);

                record.transcript.push(ChatMessage {
                    role: ChatRole::Buyer,
                    content: content.to_string(),
                });
                record.transcript.push(ChatMessage {
                    role: ChatRole::Assistant,
                    content: reply.message.clone(),
                });

                if let Some(completed) = reply.completed {
                    tracing::info!(
                        session = %record.id,
                        score = completed.readiness.score,
                        eta_weeks = completed.readiness.eta_weeks,
                        "intake completed"
                    );
                    record.readiness.set_profile(completed.profile);
                } else {
                    tracing::debug!(session = %record.id, step = reply.step.label(), "intake turn");
                }

                Ok(MessageOutcome {
                    reply: reply.message,
                    record: record.clone(),
                })
            })
    }

    pub fn record_document(
        &self,
        id: &SessionId,
        document_type: &str,
        today: NaiveDate,
    ) -> Result<CoachSessionRecord, CoachServiceError> {
        self.repository
            .modify(id, |record| -> Result<CoachSessionRecord, CoachServiceError> {
                record.readiness.record_document(document_type, today)?;
                tracing::info!(
                    session = %record.id,
                    document = document_type,
                    completeness = record.readiness.packet_completeness(),
                    "document recorded"
                );
                Ok(record.clone())
            })
    }

    pub fn set_dpa_amount(
        &self,
        id: &SessionId,
        amount: f64,
    ) -> Result<CoachSessionRecord, CoachServiceError> {
        let amount =
            validate_dpa_amount(amount).map_err(|_| CoachServiceError::InvalidDpaAmount(amount))?;

        self.repository
            .modify(id, |record| -> Result<CoachSessionRecord, CoachServiceError> {
                record.readiness.set_dpa_amount(amount);
                tracing::info!(session = %record.id, amount, "dpa amount updated");
                Ok(record.clone())
            })
    }

    /// Mark a checklist phase done. Phases must follow the fixed order and a
    /// repeated completion changes nothing.
    pub fn complete_phase(
        &self,
        id: &SessionId,
        phase: Phase,
    ) -> Result<PhaseOutcome, CoachServiceError> {
        self.repository
            .modify(id, |record| -> Result<PhaseOutcome, CoachServiceError> {
                if record.readiness.profile.is_none() {
                    return Err(CoachServiceError::ProfileIncomplete(record.id.clone()));
                }

                let newly_completed = record
                    .readiness
                    .complete_phase(phase)
                    .map_err(|error| match error {
                        ReadinessError::PhaseOutOfOrder { phase, expected } => {
                            CoachServiceError::PhaseOutOfOrder { phase, expected }
                        }
                        other => CoachServiceError::Readiness(other),
                    })?;

                if newly_completed {
                    let score = record.readiness.score().map(|score| score.score);
                    tracing::info!(
                        session = %record.id,
                        phase = phase.id(),
                        ?score,
                        "phase completed"
                    );
                } else {
                    tracing::debug!(
                        session = %record.id,
                        phase = phase.id(),
                        "phase already completed"
                    );
                }

                Ok(PhaseOutcome {
                    phase,
                    newly_completed,
                    record: record.clone(),
                })
            })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoachServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Packet(#[from] PacketError),
    #[error(transparent)]
    Readiness(ReadinessError),
    #[error("session {0} has no readiness profile yet; finish the intake first")]
    ProfileIncomplete(SessionId),
    #[error("phase {phase} cannot be completed before {expected}")]
    PhaseOutOfOrder { phase: Phase, expected: Phase },
    #[error("dpa amount must be a non-negative number (got {0})")]
    InvalidDpaAmount(f64),
}
