//! API-facing projections of session state. The presentation layer renders
//! from these views; raw records never leave the service.

use serde::Serialize;

use super::domain::{SessionId, SubmissionRecord};
use super::preview::PreviewArtifact;
use super::scaling::{PrintOption, ScalingOption};

/// Stage snapshot returned by every transition endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub stage: &'static str,
}

impl SessionView {
    pub fn from_record(record: &SubmissionRecord) -> Self {
        Self {
            session_id: record.session_id.clone(),
            stage: record.state.stage().label(),
        }
    }
}

/// One scaling option with its physical size and display-scaled span.
#[derive(Debug, Clone, Serialize)]
pub struct ScalingOptionView {
    pub option: PrintOption,
    pub label: String,
    pub width_inches: f64,
    pub height_inches: f64,
    pub display_width_px: f64,
    pub display_height_px: f64,
}

impl ScalingOptionView {
    fn new(option: &ScalingOption, display_scale: f64) -> Self {
        Self {
            option: option.option,
            label: option.label(),
            width_inches: option.width_inches,
            height_inches: option.height_inches,
            display_width_px: option.width_inches * display_scale,
            display_height_px: option.height_inches * display_scale,
        }
    }
}

/// Everything the preview stage renders: page geometry, both options under a
/// shared display scale, and the inline first-page image.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewView {
    pub session_id: SessionId,
    pub stage: &'static str,
    pub file_name: String,
    pub page_width_inches: f64,
    pub page_height_inches: f64,
    pub display_scale: f64,
    pub fit_width: ScalingOptionView,
    pub fit_length: ScalingOptionView,
    pub preview_png_base64: String,
}

impl PreviewView {
    pub fn new(session_id: SessionId, file_name: String, artifact: PreviewArtifact) -> Self {
        let display_scale = artifact.options.display_scale();
        Self {
            session_id,
            stage: super::domain::Stage::Preview.label(),
            file_name,
            page_width_inches: artifact.geometry.width_inches,
            page_height_inches: artifact.geometry.height_inches,
            display_scale,
            fit_width: ScalingOptionView::new(&artifact.options.fit_width, display_scale),
            fit_length: ScalingOptionView::new(&artifact.options.fit_length, display_scale),
            preview_png_base64: artifact.image_png_base64,
        }
    }
}
