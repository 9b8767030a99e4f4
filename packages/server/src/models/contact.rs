use serde::{Deserialize, Serialize};

use crate::error::{AppError, FieldViolation};
use crate::models::shared::normalize_optional;
use crate::utils::text::is_valid_email;

/// Request body for a contact form submission.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ContactSubmissionRequest {
    /// Visitor's name.
    #[schema(example = "Ana Ferreira")]
    pub name: String,
    /// Reply-to email address.
    #[schema(example = "ana@example.com")]
    pub email: String,
    /// Company, if the visitor provided one.
    #[schema(example = "Acme Devices")]
    pub company: Option<String>,
    /// Phone number, free-form.
    #[schema(example = "+351 912 345 678")]
    pub phone: Option<String>,
    /// The enquiry itself.
    #[schema(example = "We need a quote for a 500-unit PCB assembly run.")]
    pub message: String,
    /// Where the form was submitted from (landing page, campaign tag).
    #[schema(example = "homepage")]
    pub source: Option<String>,
}

/// Acknowledgement returned once the submission is stored.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ContactSubmissionResponse {
    #[schema(example = true)]
    pub success: bool,
}

/// A submission that passed validation, trimmed and ready to persist.
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
    pub source: Option<String>,
}

/// Check and normalize a contact form payload.
///
/// All field violations are collected before returning, so the client
/// can annotate the whole form in one round trip.
pub fn validate_contact_submission(
    payload: ContactSubmissionRequest,
) -> Result<NewContactSubmission, AppError> {
    let mut violations = Vec::new();

    let name = payload.name.trim();
    if name.is_empty() {
        violations.push(FieldViolation::new("name", "Name is required"));
    } else if name.chars().count() > 256 {
        violations.push(FieldViolation::new("name", "Name must be at most 256 characters"));
    }

    let email = payload.email.trim();
    if email.is_empty() {
        violations.push(FieldViolation::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        violations.push(FieldViolation::new("email", "Invalid email address"));
    }

    let message = payload.message.trim();
    if message.is_empty() {
        violations.push(FieldViolation::new("message", "Message is required"));
    } else if message.len() > 10_000 {
        violations.push(FieldViolation::new(
            "message",
            "Message must be at most 10000 bytes",
        ));
    }

    if !violations.is_empty() {
        return Err(AppError::InvalidFields(violations));
    }

    Ok(NewContactSubmission {
        name: name.to_string(),
        email: email.to_string(),
        company: normalize_optional(payload.company),
        phone: normalize_optional(payload.phone),
        message: message.to_string(),
        source: normalize_optional(payload.source),
    })
}
