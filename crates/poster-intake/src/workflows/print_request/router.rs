use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::dispatch::DispatchGateway;
use super::domain::{IntakeSubmission, PosterFile, SessionId};
use super::preview::PageRasterizer;
use super::scaling::PrintOption;
use super::service::{SubmissionService, SubmissionServiceError};
use super::store::{SessionStore, StoreError};

/// Posters are arbitrary-size uploads; the axum default 2 MB body cap is far
/// too small for print-resolution PDFs.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Router builder exposing the wizard's HTTP endpoints.
pub fn print_request_router<S, D, P>(service: Arc<SubmissionService<S, D, P>>) -> Router
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    Router::new()
        .route(
            "/api/v1/print-requests/sessions",
            post(create_session_handler::<S, D, P>),
        )
        .route(
            "/api/v1/print-requests/sessions/:session_id",
            get(session_status_handler::<S, D, P>),
        )
        .route(
            "/api/v1/print-requests/sessions/:session_id/intake",
            post(intake_handler::<S, D, P>),
        )
        .route(
            "/api/v1/print-requests/sessions/:session_id/preview",
            get(preview_handler::<S, D, P>),
        )
        .route(
            "/api/v1/print-requests/sessions/:session_id/choice",
            post(choice_handler::<S, D, P>),
        )
        .route(
            "/api/v1/print-requests/sessions/:session_id/back",
            post(go_back_handler::<S, D, P>),
        )
        .route(
            "/api/v1/print-requests/sessions/:session_id/reset",
            post(reset_handler::<S, D, P>),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct ChoiceRequest {
    option: PrintOption,
}

async fn create_session_handler<S, D, P>(
    State(service): State<Arc<SubmissionService<S, D, P>>>,
) -> Response
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    match service.create_session() {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn session_status_handler<S, D, P>(
    State(service): State<Arc<SubmissionService<S, D, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn intake_handler<S, D, P>(
    State(service): State<Arc<SubmissionService<S, D, P>>>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> Response
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    let submission = match read_intake_multipart(multipart).await {
        Ok(submission) => submission,
        Err(detail) => {
            let payload = json!({ "error": format!("malformed intake form: {detail}") });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.submit_intake(&SessionId(session_id), submission).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn preview_handler<S, D, P>(
    State(service): State<Arc<SubmissionService<S, D, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    match service.render_preview(&SessionId(session_id)).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn choice_handler<S, D, P>(
    State(service): State<Arc<SubmissionService<S, D, P>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<ChoiceRequest>,
) -> Response
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    match service.choose(&SessionId(session_id), request.option).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn go_back_handler<S, D, P>(
    State(service): State<Arc<SubmissionService<S, D, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    match service.go_back(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn reset_handler<S, D, P>(
    State(service): State<Arc<SubmissionService<S, D, P>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
    D: DispatchGateway + 'static,
    P: PageRasterizer + 'static,
{
    match service.reset(&SessionId(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Collect the intake form fields and the poster upload from one multipart
/// body. Unknown parts are ignored.
async fn read_intake_multipart(mut multipart: Multipart) -> Result<IntakeSubmission, String> {
    let mut submission = IntakeSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| err.to_string())?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "first_name" => {
                submission.form.first_name = field.text().await.map_err(|err| err.to_string())?
            }
            "last_name" => {
                submission.form.last_name = field.text().await.map_err(|err| err.to_string())?
            }
            "college" => {
                submission.form.college = field.text().await.map_err(|err| err.to_string())?
            }
            "role" => submission.form.role = field.text().await.map_err(|err| err.to_string())?,
            "use_case" => {
                submission.form.use_case = field.text().await.map_err(|err| err.to_string())?
            }
            "purpose" => {
                submission.form.purpose = field.text().await.map_err(|err| err.to_string())?
            }
            "email" => submission.form.email = field.text().await.map_err(|err| err.to_string())?,
            "poster" => {
                let file_name = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or("poster.pdf")
                    .to_string();
                let bytes = field.bytes().await.map_err(|err| err.to_string())?.to_vec();
                submission.poster = Some(PosterFile { file_name, bytes });
            }
            _ => {}
        }
    }

    Ok(submission)
}

fn error_response(error: SubmissionServiceError) -> Response {
    match error {
        SubmissionServiceError::Validation(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        SubmissionServiceError::Preview(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        // transport detail is logged by the service, never shown to the user
        SubmissionServiceError::Dispatch(_) => {
            let payload = json!({
                "error": "the submission could not be delivered; choose an option to try again",
            });
            (StatusCode::BAD_GATEWAY, axum::Json(payload)).into_response()
        }
        SubmissionServiceError::Store(StoreError::NotFound) => {
            let payload = json!({ "error": "session not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        SubmissionServiceError::StageMismatch { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
