//! Poster print request intake workflow.
//!
//! The wizard runs a three-stage state machine per session: intake of the
//! applicant's details and PDF upload, a preview comparing the two 36-inch
//! scaling options, and a success stage once the chosen submission has been
//! accepted by the external approval webhook.

pub mod dispatch;
pub mod domain;
pub(crate) mod intake;
pub mod pdfium;
pub mod preview;
pub mod router;
pub mod scaling;
pub mod service;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use dispatch::{DispatchError, DispatchGateway, DispatchPayload, WebhookDispatcher};
pub use domain::{
    Applicant, College, IntakeForm, IntakeSubmission, PosterFile, Role, SessionId, SessionState,
    Stage, SubmissionRecord, UseCase,
};
pub use intake::ValidationError;
pub use pdfium::PdfiumRasterizer;
pub use preview::{PageGeometry, PageRasterizer, PreviewArtifact, PreviewError, RasterError};
pub use router::print_request_router;
pub use scaling::{
    compute_scaling_options, InvalidGeometry, PrintOption, ScalingOption, ScalingOptions,
};
pub use service::{SubmissionService, SubmissionServiceError};
pub use store::{SessionStore, StoreError};
pub use views::{PreviewView, ScalingOptionView, SessionView};
