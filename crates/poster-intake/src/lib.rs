//! Core library for the poster print request intake service.
//!
//! The service walks an applicant through a three-stage wizard: intake of
//! identifying information plus a PDF poster, a visual preview of the two
//! 36-inch print scaling options, and hand-off of the chosen submission to an
//! external approval workflow over a webhook.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
