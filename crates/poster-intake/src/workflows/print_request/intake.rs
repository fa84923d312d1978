//! Intake validation: every field on the form is required, and the poster
//! upload must be present and non-empty before the wizard leaves intake.

use super::domain::{Applicant, College, IntakeForm, PosterFile, Role, UseCase};

/// Validation errors surfaced inline on the intake form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required field '{field}' is missing")]
    MissingField { field: &'static str },
    #[error("'{value}' is not one of the listed college affiliations")]
    UnknownCollege { value: String },
    #[error("'{value}' is not a recognized role")]
    UnknownRole { value: String },
    #[error("'{value}' is not a recognized use case")]
    UnknownUseCase { value: String },
    #[error("a PDF poster upload is required")]
    MissingPoster,
}

/// Build a validated [`Applicant`] from raw form fields. The first problem
/// found is reported.
pub fn applicant_from_form(form: &IntakeForm) -> Result<Applicant, ValidationError> {
    let first_name = required(&form.first_name, "first_name")?;
    let last_name = required(&form.last_name, "last_name")?;
    let college_label = required(&form.college, "college")?;
    let role_label = required(&form.role, "role")?;
    let use_case_label = required(&form.use_case, "use_case")?;
    let purpose = required(&form.purpose, "purpose")?;
    let email = required(&form.email, "email")?;

    let college =
        College::from_label(&college_label).ok_or_else(|| ValidationError::UnknownCollege {
            value: college_label.clone(),
        })?;
    let role = Role::from_label(&role_label).ok_or_else(|| ValidationError::UnknownRole {
        value: role_label.clone(),
    })?;
    let use_case =
        UseCase::from_label(&use_case_label).ok_or_else(|| ValidationError::UnknownUseCase {
            value: use_case_label.clone(),
        })?;

    Ok(Applicant {
        first_name,
        last_name,
        college,
        role,
        use_case,
        purpose,
        email,
    })
}

/// Require the poster part to exist and carry at least one byte.
pub fn validate_poster(poster: Option<PosterFile>) -> Result<PosterFile, ValidationError> {
    match poster {
        Some(poster) if !poster.bytes.is_empty() => Ok(poster),
        _ => Err(ValidationError::MissingPoster),
    }
}

fn required(raw: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(trimmed.to_string())
    }
}
