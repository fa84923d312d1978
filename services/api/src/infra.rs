use metrics_exporter_prometheus::PrometheusHandle;
use poster_intake::workflows::print_request::{
    SessionId, SessionStore, StoreError, SubmissionRecord,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Session store for the running service. Submissions live only for the
/// duration of their wizard flow, so memory is the store of record.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    records: Arc<Mutex<HashMap<SessionId, SubmissionRecord>>>,
}

impl SessionStore for InMemorySessionStore {
    fn insert(&self, record: SubmissionRecord) -> Result<SubmissionRecord, StoreError> {
        let mut guard = self.records.lock().expect("session store mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SubmissionRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("session store mutex poisoned");
        if guard.contains_key(&record.session_id) {
            guard.insert(record.session_id.clone(), record);
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SubmissionRecord>, StoreError> {
        let guard = self.records.lock().expect("session store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}
