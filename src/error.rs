use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::booking::BookingError;
use crate::catalog::CatalogError;
use crate::models::seat::InvalidSeatLabel;

/// Error returned by HTTP handlers.
///
/// Rendered as `{"success": false, "error": "<message>"}`, the same envelope
/// the listing endpoints use for their successful payloads.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Catalog(CatalogError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Catalog(CatalogError::LoadFailure(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Booking(BookingError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Booking(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}

impl From<InvalidSeatLabel> for ApiError {
    fn from(error: InvalidSeatLabel) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected ({}): {}", status, self);
        }
        (
            status,
            Json(json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::BookingStep;

    #[test]
    fn maps_errors_to_status_codes() {
        let not_found = ApiError::from(CatalogError::NotFound {
            entity: "movie",
            id: "42".to_string(),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "movie 42 not found");

        let load = ApiError::from(CatalogError::LoadFailure("catalog offline".into()));
        assert_eq!(load.status(), StatusCode::BAD_GATEWAY);

        let transition = ApiError::from(BookingError::InvalidTransition {
            from: BookingStep::Movie,
            to: BookingStep::Confirmation,
        });
        assert_eq!(transition.status(), StatusCode::CONFLICT);

        assert_eq!(ApiError::BadRequest("nope".into()).status(), StatusCode::BAD_REQUEST);
    }
}
