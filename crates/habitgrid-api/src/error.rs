use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use habitgrid_types::api::ErrorBody;
use habitgrid_types::calendar::CalendarError;

/// Failures of the habit service.
#[derive(Debug, Error)]
pub enum HabitError {
    #[error("habit {0} not found")]
    NotFound(i64),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<CalendarError> for HabitError {
    fn from(err: CalendarError) -> Self {
        HabitError::InvalidArgument(err.to_string())
    }
}

/// Everything a handler can fail with. Always rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Habit(#[from] HabitError),
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("invalid path: {0}")]
    Path(#[from] PathRejection),
    #[error("invalid query: {0}")]
    Query(#[from] QueryRejection),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl From<CalendarError> for ApiError {
    fn from(err: CalendarError) -> Self {
        ApiError::Habit(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Habit(HabitError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Habit(HabitError::InvalidArgument(_))
            | ApiError::Body(_)
            | ApiError::Path(_)
            | ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Habit(HabitError::Storage(_)) | ApiError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Failed to access habit storage".to_string()
        } else {
            warn!("Rejected request: {}", self);
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_service_errors_to_statuses() {
        assert_eq!(ApiError::from(HabitError::NotFound(3)).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(HabitError::InvalidArgument("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(HabitError::Storage(anyhow::anyhow!("disk full"))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn calendar_errors_are_invalid_arguments() {
        let err = ApiError::from(CalendarError::InvalidDate("soon".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("soon"));
    }
}
