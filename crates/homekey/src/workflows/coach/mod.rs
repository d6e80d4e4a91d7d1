//! Coaching sessions: the intake chat, document uploads, DPA updates, and
//! phase progression behind one repository-backed service.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{
    ChatMessage, ChatRole, CoachSessionRecord, RepositoryError, SessionId, SessionRepository,
    SessionView,
};
pub use router::{coach_router, DocumentRequest, DpaRequest, MessageRequest};
pub use service::{CoachServiceError, CoachSessionService, MessageOutcome, PhaseOutcome};
