use axum::Json;
use axum::extract::State;
use common::mail::OutboundEmail;
use sea_orm::*;
use tracing::instrument;

use crate::entity::contact_submission;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::contact::{
    ContactSubmissionRequest, ContactSubmissionResponse, NewContactSubmission,
    validate_contact_submission,
};
use crate::state::AppState;
use crate::utils::text::escape_html;

#[utoipa::path(
    post,
    path = "/",
    tag = "Contact",
    operation_id = "submitContactForm",
    summary = "Submit the contact form",
    description = "Stores a contact form submission and emails a notification to the site team. The submission is kept even when the notification cannot be sent.",
    request_body = ContactSubmissionRequest,
    responses(
        (status = 200, description = "Submission stored", body = ContactSubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn submit_contact(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ContactSubmissionRequest>,
) -> Result<Json<ContactSubmissionResponse>, AppError> {
    let submission = validate_contact_submission(payload)?;

    let now = chrono::Utc::now();
    let new_submission = contact_submission::ActiveModel {
        name: Set(submission.name.clone()),
        email: Set(submission.email.clone()),
        company: Set(submission.company.clone()),
        phone: Set(submission.phone.clone()),
        message: Set(submission.message.clone()),
        source: Set(submission.source.clone()),
        status: Set(contact_submission::STATUS_NEW.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_submission.insert(&state.db).await?;

    // The submission is already stored; a failed notification must not
    // turn into a client-facing error.
    let email = notification_email(&state.config.mail.notify_address, &submission);
    if let Err(e) = state.mailer.send(&email).await {
        tracing::error!(
            submission_id = model.id,
            error = %e,
            "Failed to send contact notification"
        );
    }

    Ok(Json(ContactSubmissionResponse { success: true }))
}

/// Render the notification email for a stored submission.
fn notification_email(notify_address: &str, submission: &NewContactSubmission) -> OutboundEmail {
    let optional = |v: &Option<String>| match v {
        Some(v) => escape_html(v),
        None => "N/A".to_string(),
    };

    let html_body = format!(
        "<h2>New Contact Form Submission</h2>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Company:</strong> {}</p>\
         <p><strong>Phone:</strong> {}</p>\
         <p><strong>Source:</strong> {}</p>\
         <h3>Message</h3>\
         <p>{}</p>",
        escape_html(&submission.name),
        escape_html(&submission.email),
        optional(&submission.company),
        optional(&submission.phone),
        optional(&submission.source),
        escape_html(&submission.message).replace('\n', "<br>"),
    );

    OutboundEmail {
        to: notify_address.to_string(),
        subject: format!("New Contact Form Submission from {}", submission.name),
        html_body,
    }
}
