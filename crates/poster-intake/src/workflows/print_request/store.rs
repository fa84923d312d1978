use super::domain::{SessionId, SubmissionRecord};

/// Storage abstraction for in-flight sessions so the service can be
/// exercised in isolation. Submissions are never persisted beyond the
/// in-flight request, so implementations hold records in memory only.
pub trait SessionStore: Send + Sync {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, StoreError>;
    fn update(&self, record: SubmissionRecord) -> Result<(), StoreError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SubmissionRecord>, StoreError>;
}

/// Error enumeration for session store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session already exists")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
