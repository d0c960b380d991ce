use crate::shared::RiskError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

/// Result type returned by every handler
pub type ApiResult = Result<Response, ApiError>;

/// `{"status":"success","data": ...}` with the given status code.
pub fn success<T: Serialize>(status: StatusCode, data: T) -> ApiResult {
    Ok((status, Json(json!({"status": "success", "data": data}))).into_response())
}

pub fn ok<T: Serialize>(data: T) -> ApiResult {
    success(StatusCode::OK, data)
}

/// 201 for a newly created record, 200 when an existing one was returned.
pub fn created_or_existing<T: Serialize>(data: T, created: bool) -> ApiResult {
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    success(status, data)
}

#[must_use]
pub fn error_status(error: &RiskError) -> StatusCode {
    match error {
        RiskError::Validation { .. } => StatusCode::BAD_REQUEST,
        RiskError::NotFound { .. } => StatusCode::NOT_FOUND,
        RiskError::Conflict { .. } => StatusCode::CONFLICT,
        RiskError::Upstream { .. } => StatusCode::BAD_GATEWAY,
        RiskError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = json!({
        "status": "error",
        "error": {"code": code, "message": message},
    });
    (status, Json(body)).into_response()
}

/// Any failure surfaced by a handler
///
/// Domain errors keep their code and message. Anything else is logged with
/// its full chain and answered with a generic 500.
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn invalid_body(details: impl Into<String>) -> Self {
        Self(RiskError::validation("body", details).into())
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Unwraps a JSON body, turning a malformed one into a 400.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_body(rejection.body_text()))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0.downcast_ref::<RiskError>() {
            Some(risk) => {
                let status = error_status(risk);
                if status.is_server_error() {
                    tracing::error!(error = %format!("{:#}", self.0), code = risk.code(), "Request failed");
                } else {
                    tracing::debug!(error = %risk, code = risk.code(), "Request rejected");
                }
                error_response(status, risk.code(), &risk.to_string())
            }
            None => {
                tracing::error!(error = %format!("{:#}", self.0), "Unhandled error");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "internal server error",
                )
            }
        }
    }
}

/// Fallback for paths no route matches.
pub async fn route_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found")
}
