//! Error type shared by every auth operation.
//!
//! ERROR HANDLING
//! ==============
//! Only CSRF acquisition failure is loud: it propagates to the caller with a
//! 400 status. Session fetch failures are swallowed by `get_session` and show
//! up as an unauthenticated state instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors produced by auth actions and their collaborators.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The CSRF cookie is still absent after one token fetch.
    #[error("failed to acquire CSRF token: cookie `{cookie}` not set")]
    CsrfAcquisition { cookie: String },

    /// An endpoint needed by the operation is not configured.
    #[error("endpoint `{0}` is not configured")]
    MissingEndpoint(&'static str),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("http request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{url} responded with status {status}")]
    Status { status: u16, url: String, body: String },

    /// The response body was not the JSON we expected.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A redirect could not be carried out.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl AuthError {
    /// HTTP-equivalent status used when the error is surfaced to a client.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::CsrfAcquisition { .. } => StatusCode::BAD_REQUEST,
            Self::Status { status, .. } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Transport(_) | Self::Parse(_) => StatusCode::BAD_GATEWAY,
            Self::MissingEndpoint(_) | Self::Navigation(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
