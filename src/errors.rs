use axum::http::StatusCode;
use tracing::error;

/// Failures talking to the hosted backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend rejected the session")]
    Unauthorized,
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected backend payload: {0}")]
    Payload(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "sign in required".to_string(),
        }
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized => Self::unauthorized(),
            other => {
                error!("backend call failed: {other}");
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    message: other.to_string(),
                }
            }
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_backend_error_maps_to_401() {
        let err = AppError::from(BackendError::Unauthorized);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn other_backend_errors_map_to_bad_gateway() {
        let err = AppError::from(BackendError::Status {
            status: 500,
            body: "boom".to_string(),
        });
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert!(err.message.contains("boom"));
    }
}
