use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::CoachConfig;
use crate::workflows::coach::repository::{
    CoachSessionRecord, RepositoryError, SessionId, SessionRepository,
};
use crate::workflows::coach::CoachSessionService;

/// Buyer answers that walk the intake from welcome to completion.
pub(super) const INTAKE_ANSWERS: [&str; 7] = [
    "Hi, I'd like to buy a home",
    "Raleigh 27610",
    "3,900",
    "270",
    "630",
    "6,200",
    "195000",
];

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date")
}

pub(super) fn build_service() -> (CoachSessionService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = CoachSessionService::new(repository.clone(), CoachConfig::default());
    (service, repository)
}

/// Start a session and answer every intake question.
pub(super) fn scored_session(service: &CoachSessionService<MemoryRepository>) -> SessionId {
    let record = service.start_session(today()).expect("session starts");
    for answer in INTAKE_ANSWERS {
        service
            .send_message(&record.id, answer)
            .expect("intake turn succeeds");
    }
    record.id
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, CoachSessionRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: CoachSessionRecord) -> Result<CoachSessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn modify<T, E, F>(&self, id: &SessionId, change: F) -> Result<T, E>
    where
        F: FnOnce(&mut CoachSessionRecord) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let mut draft = stored.clone();
        let output = change(&mut draft)?;
        *stored = draft;
        Ok(output)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<CoachSessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: CoachSessionRecord) -> Result<CoachSessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn modify<T, E, F>(&self, _id: &SessionId, _change: F) -> Result<T, E>
    where
        F: FnOnce(&mut CoachSessionRecord) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        Err(RepositoryError::Unavailable("database offline".to_string()).into())
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<CoachSessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
