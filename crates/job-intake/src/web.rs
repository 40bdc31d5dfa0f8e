//! Shared HTML plumbing: user-facing notices and template rendering.

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

pub const GENERIC_FAILURE_MESSAGE: &str =
    "The website encountered an unexpected error. Contact the site administrator if the problem persists.";

/// One-shot message shown above page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: &'static str,
    pub text: String,
}

impl Notice {
    pub fn status(text: impl Into<String>) -> Self {
        Self {
            level: "status",
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: "error",
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == "error"
    }
}

/// Renders a template into a response, hiding template failures behind the generic notice.
pub fn render_page<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "template rendering failed");
            generic_failure()
        }
    }
}

pub fn generic_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!("<p>{GENERIC_FAILURE_MESSAGE}</p>")),
    )
        .into_response()
}
