use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::dispatch::{DispatchError, DispatchGateway, DispatchPayload};
use super::domain::{
    IntakeSubmission, SessionId, SessionState, Stage, SubmissionRecord,
};
use super::intake::{self, ValidationError};
use super::preview::{self, PageRasterizer, PreviewArtifact, PreviewError};
use super::scaling::{compute_scaling_options, PrintOption};
use super::store::{SessionStore, StoreError};
use super::views::{PreviewView, SessionView};

/// Service composing the session store, the preview rasterizer, and the
/// webhook gateway into the three-stage submission state machine.
pub struct SubmissionService<S, D, P> {
    store: Arc<S>,
    dispatcher: Arc<D>,
    rasterizer: Arc<P>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("sess-{id:06}"))
}

impl<S, D, P> SubmissionService<S, D, P>
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    pub fn new(store: Arc<S>, dispatcher: Arc<D>, rasterizer: Arc<P>) -> Self {
        Self {
            store,
            dispatcher,
            rasterizer,
        }
    }

    /// Open a fresh wizard session in the intake stage.
    pub fn create_session(&self) -> Result<SessionView, SubmissionServiceError> {
        let record = SubmissionRecord {
            session_id: next_session_id(),
            state: SessionState::Intake,
        };
        let stored = self.store.insert(record)?;
        Ok(SessionView::from_record(&stored))
    }

    /// Current stage for any session.
    pub fn get(&self, session_id: &SessionId) -> Result<SessionView, SubmissionServiceError> {
        let record = self.fetch_record(session_id)?;
        Ok(SessionView::from_record(&record))
    }

    /// Accept the intake form and move the session to the preview stage.
    ///
    /// The upload is parsed and rendered before the transition commits, so a
    /// failed validation or an unreadable PDF leaves the session in intake
    /// with nothing captured.
    pub async fn submit_intake(
        &self,
        session_id: &SessionId,
        submission: IntakeSubmission,
    ) -> Result<PreviewView, SubmissionServiceError> {
        let record = self.fetch_record(session_id)?;
        Self::expect_stage(&record, Stage::Intake)?;

        let applicant = intake::applicant_from_form(&submission.form)?;
        let poster = intake::validate_poster(submission.poster)?;
        let artifact = self.render(poster.bytes.clone()).await?;

        let file_name = poster.file_name.clone();
        self.store.update(SubmissionRecord {
            session_id: session_id.clone(),
            state: SessionState::Preview {
                applicant,
                poster,
                chosen_option: None,
            },
        })?;

        info!(%session_id, file_name = %file_name, "intake accepted, session moved to preview");
        Ok(PreviewView::new(session_id.clone(), file_name, artifact))
    }

    /// Re-render the preview from the stored upload.
    pub async fn render_preview(
        &self,
        session_id: &SessionId,
    ) -> Result<PreviewView, SubmissionServiceError> {
        let record = self.fetch_record(session_id)?;
        let (file_name, bytes) = match &record.state {
            SessionState::Preview { poster, .. } => {
                (poster.file_name.clone(), poster.bytes.clone())
            }
            other => return Err(Self::stage_mismatch(Stage::Preview, other.stage())),
        };

        let artifact = self.render(bytes).await?;
        Ok(PreviewView::new(session_id.clone(), file_name, artifact))
    }

    /// Record the applicant's choice and dispatch the submission.
    ///
    /// Acceptance moves the session to success and drops the captured data.
    /// Any dispatch failure clears the choice and leaves the session in
    /// preview so the applicant can try again or go back.
    pub async fn choose(
        &self,
        session_id: &SessionId,
        option: PrintOption,
    ) -> Result<SessionView, SubmissionServiceError> {
        let record = self.fetch_record(session_id)?;
        let (applicant, poster) = match record.state {
            SessionState::Preview {
                applicant, poster, ..
            } => (applicant, poster),
            other => return Err(Self::stage_mismatch(Stage::Preview, other.stage())),
        };

        let geometry = preview::read_page_geometry(&poster.bytes)?;
        let options = compute_scaling_options(geometry.width_inches, geometry.height_inches)
            .map_err(PreviewError::from)?;
        let label = options.get(option).label();

        // The choice is visible in the store while the dispatch is in flight.
        self.store.update(SubmissionRecord {
            session_id: session_id.clone(),
            state: SessionState::Preview {
                applicant: applicant.clone(),
                poster: poster.clone(),
                chosen_option: Some(option),
            },
        })?;

        let payload = DispatchPayload::new(&applicant, &poster, label);
        match self.dispatcher.dispatch(payload).await {
            Ok(()) => {
                let success = SubmissionRecord {
                    session_id: session_id.clone(),
                    state: SessionState::Success,
                };
                self.store.update(success.clone())?;
                info!(%session_id, option = ?option, "submission dispatched to approval workflow");
                Ok(SessionView::from_record(&success))
            }
            Err(error) => {
                warn!(%session_id, error = %error, "webhook dispatch failed");
                self.store.update(SubmissionRecord {
                    session_id: session_id.clone(),
                    state: SessionState::Preview {
                        applicant,
                        poster,
                        chosen_option: None,
                    },
                })?;
                Err(SubmissionServiceError::Dispatch(error))
            }
        }
    }

    /// Abandon the preview and return to an empty intake form.
    pub fn go_back(&self, session_id: &SessionId) -> Result<SessionView, SubmissionServiceError> {
        let record = self.fetch_record(session_id)?;
        Self::expect_stage(&record, Stage::Preview)?;
        self.replace_with_intake(session_id)
    }

    /// Start a fresh submission after a successful hand-off.
    pub fn reset(&self, session_id: &SessionId) -> Result<SessionView, SubmissionServiceError> {
        let record = self.fetch_record(session_id)?;
        Self::expect_stage(&record, Stage::Success)?;
        self.replace_with_intake(session_id)
    }

    fn replace_with_intake(
        &self,
        session_id: &SessionId,
    ) -> Result<SessionView, SubmissionServiceError> {
        let fresh = SubmissionRecord {
            session_id: session_id.clone(),
            state: SessionState::Intake,
        };
        self.store.update(fresh.clone())?;
        Ok(SessionView::from_record(&fresh))
    }

    async fn render(&self, bytes: Vec<u8>) -> Result<PreviewArtifact, SubmissionServiceError> {
        let rasterizer = Arc::clone(&self.rasterizer);
        // pdfium is a blocking C library; keep it off the async workers
        tokio::task::spawn_blocking(move || preview::render_preview(rasterizer.as_ref(), &bytes))
            .await
            .map_err(|err| SubmissionServiceError::PreviewTask(err.to_string()))?
            .map_err(SubmissionServiceError::Preview)
    }

    fn fetch_record(
        &self,
        session_id: &SessionId,
    ) -> Result<SubmissionRecord, SubmissionServiceError> {
        let record = self
            .store
            .fetch(session_id)?
            .ok_or(StoreError::NotFound)?;
        Ok(record)
    }

    fn expect_stage(
        record: &SubmissionRecord,
        expected: Stage,
    ) -> Result<(), SubmissionServiceError> {
        let found = record.state.stage();
        if found == expected {
            Ok(())
        } else {
            Err(Self::stage_mismatch(expected, found))
        }
    }

    fn stage_mismatch(expected: Stage, found: Stage) -> SubmissionServiceError {
        SubmissionServiceError::StageMismatch {
            expected: expected.label(),
            found: found.label(),
        }
    }
}

/// Error raised by the submission service.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Preview(#[from] PreviewError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("session is in the {found} stage, expected {expected}")]
    StageMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("preview task failed: {0}")]
    PreviewTask(String),
}
