use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cyberstack_core::CoreError;
use genai_flows::GenAiError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Wraps an `anyhow::Error` and maps
/// known domain errors to status codes on the way out; everything else is a
/// 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<CoreError>() {
            match e {
                CoreError::Unauthorized | CoreError::InvalidCredential => StatusCode::UNAUTHORIZED,
                CoreError::Forbidden => StatusCode::FORBIDDEN,
                CoreError::TaskNotFound(_)
                | CoreError::TeamNotFound(_)
                | CoreError::UserNotFound(_)
                | CoreError::CertificationNotFound(_)
                | CoreError::ChannelNotFound(_) => StatusCode::NOT_FOUND,
                CoreError::EmailExists
                | CoreError::DuplicateTeamMember(_)
                | CoreError::PrimaryAdmin => StatusCode::CONFLICT,
                CoreError::InvalidKey(_)
                | CoreError::InvalidColumn(_)
                | CoreError::InvalidPriority(_)
                | CoreError::InvalidTeam(_)
                | CoreError::InvalidCertStatus(_)
                | CoreError::InvalidRole(_)
                | CoreError::InvalidCapacity(_)
                | CoreError::InvalidEfficiency(_)
                | CoreError::CertificationNameRequired
                | CoreError::CertificationDateRequired(_)
                | CoreError::EmptyMessage
                | CoreError::EmptyTaskText
                | CoreError::WeakPassword
                | CoreError::IndexOutOfBounds { .. } => StatusCode::BAD_REQUEST,
                CoreError::Io(_) | CoreError::Yaml(_) | CoreError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else if let Some(e) = self.0.downcast_ref::<GenAiError>() {
            match e {
                GenAiError::MissingApiKey(_) => StatusCode::SERVICE_UNAVAILABLE,
                GenAiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
                GenAiError::Http(_)
                | GenAiError::Api { .. }
                | GenAiError::SafetyBlocked(_)
                | GenAiError::EmptyResponse
                | GenAiError::InvalidJson(_)
                | GenAiError::SchemaMismatch { .. } => StatusCode::BAD_GATEWAY,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
