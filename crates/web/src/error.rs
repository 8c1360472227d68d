use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use meet::MeetError;
use meet::protocol::RpcError;
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Meet(MeetError),
    Validation(ValidationErrors),
    BadRequest(String),
    /// The authority task has stopped.
    Unavailable,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meet(e) => write!(f, "{}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unavailable => write!(f, "Meet authority is not running"),
        }
    }
}

impl WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Meet(MeetError::EntryNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Meet(MeetError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Meet(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// The same failure, as seen by a WebSocket caller.
    pub fn to_rpc_error(&self) -> RpcError {
        match self {
            Self::Meet(e) => RpcError::from(e),
            Self::Validation(_) | Self::BadRequest(_) => {
                RpcError::new(RpcError::INVALID_PARAMS, self.to_string())
            }
            Self::Unavailable => RpcError::new(RpcError::INTERNAL_ERROR, self.to_string()),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Meet(MeetError::Io(e)) => {
                tracing::error!("I/O error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Meet(MeetError::Validation(errors)) | Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::Meet(e) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::Unavailable => {
                tracing::error!("Request failed: meet authority is not running");
                json!({
                    "error": "Meet authority is not running"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<MeetError> for WebError {
    fn from(error: MeetError) -> Self {
        match error {
            MeetError::Validation(errors) => Self::Validation(errors),
            other => Self::Meet(other),
        }
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebError::from(MeetError::EntryNotFound(1)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::from(MeetError::MissingSnapshotKey("meet")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::Unavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_rpc_mapping() {
        let err = WebError::from(MeetError::UnknownMethod("X".to_string()));
        assert_eq!(err.to_rpc_error().code, RpcError::METHOD_NOT_FOUND);

        let err = WebError::from(MeetError::AttemptOutOfRange { attempt: 4, max: 3 });
        assert_eq!(err.to_rpc_error().code, RpcError::ACTION_REJECTED);

        let err = WebError::BadRequest("weight_kg is required".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_rpc_error().code, RpcError::INVALID_PARAMS);
    }
}
