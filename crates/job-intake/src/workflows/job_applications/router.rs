use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;

use super::domain::{ApplicationSubmission, JobCategory};
use super::repository::ApplicationStore;
use super::service::{IntakeError, IntakeService, SubmissionOutcome};
use super::views::{ApplyPage, FormErrors, TechnologyField};
use crate::mail::Mailer;
use crate::web::{generic_failure, render_page, Notice};

pub const SENT_MESSAGE: &str = "E-mail sent successfully.";
pub const UNABLE_TO_SEND_MESSAGE: &str =
    "Unable to send email. Contact the site administrator if the problem persists.";

/// Public intake form routes.
pub fn intake_router<R, M>(service: Arc<IntakeService<R, M>>) -> Router
where
    R: ApplicationStore + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route("/apply", get(form_handler).post(submit_handler::<R, M>))
        .route("/apply/technology", get(technology_handler))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct TechnologyQuery {
    #[serde(rename = "type", default)]
    pub category: String,
}

pub(crate) async fn form_handler() -> Response {
    page_response(StatusCode::OK, ApplyPage::blank(Vec::new()))
}

/// Only the sub-category container; unknown categories fall back to the default.
pub(crate) async fn technology_handler(Query(query): Query<TechnologyQuery>) -> Response {
    let category = JobCategory::parse(&query.category).unwrap_or_default();
    match TechnologyField::for_category(category, None, None).render() {
        Ok(fragment) => Html(fragment).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "technology field rendering failed");
            generic_failure()
        }
    }
}

pub(crate) async fn submit_handler<R, M>(
    State(service): State<Arc<IntakeService<R, M>>>,
    Form(submission): Form<ApplicationSubmission>,
) -> Response
where
    R: ApplicationStore + 'static,
    M: Mailer + 'static,
{
    match service.submit(submission.clone()).await {
        Ok(SubmissionOutcome::Recorded { .. }) => page_response(
            StatusCode::OK,
            ApplyPage::blank(vec![Notice::status(SENT_MESSAGE)]),
        ),
        Ok(SubmissionOutcome::DeliveryFailed { provider_message }) => {
            let mut notices = vec![Notice::error(UNABLE_TO_SEND_MESSAGE)];
            if let Some(detail) = provider_message {
                notices.push(Notice::error(detail));
            }
            page_response(
                StatusCode::OK,
                ApplyPage::with_values(&submission, FormErrors::default(), notices),
            )
        }
        Ok(SubmissionOutcome::FallbackFailed) => page_response(
            StatusCode::OK,
            ApplyPage::with_values(&submission, FormErrors::default(), Vec::new()),
        ),
        Err(IntakeError::Validation(errors)) => page_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApplyPage::with_values(&submission, FormErrors::from(&errors), Vec::new()),
        ),
        Err(IntakeError::Repository(err)) => {
            tracing::error!(error = %err, "job application could not be stored after mailing");
            generic_failure()
        }
    }
}

fn page_response(status: StatusCode, page: Result<ApplyPage, askama::Error>) -> Response {
    match page {
        Ok(page) => render_page(status, &page),
        Err(err) => {
            tracing::error!(error = %err, "intake form rendering failed");
            generic_failure()
        }
    }
}
