use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    /// Precondition failure on specific orders; the offending ids are listed
    /// so the caller can retry with a corrected batch.
    #[error("invalid orders: {reason}")]
    InvalidOrders { reason: String, order_ids: Vec<Uuid> },

    /// A racing commit already claimed one or more of the orders.
    #[error("conflict: {reason}")]
    Conflict { reason: String, order_ids: Vec<Uuid> },

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, order_ids) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::InvalidOrders { reason, order_ids } => (
                StatusCode::BAD_REQUEST,
                reason.clone(),
                Some(order_ids.clone()),
            ),
            AppError::Conflict { reason, order_ids } => (
                StatusCode::CONFLICT,
                reason.clone(),
                Some(order_ids.clone()),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None),
        };

        let body = match order_ids {
            Some(ids) => Json(json!({
                "error": message,
                "order_ids": ids,
            })),
            None => Json(json!({
                "error": message
            })),
        };

        (status, body).into_response()
    }
}
