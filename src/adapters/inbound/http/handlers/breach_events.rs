use crate::adapters::inbound::http::envelope::{json_body, ok, success, ApiError, ApiResult};
use crate::adapters::inbound::http::state::AppState;
use crate::application::dto::{
    BreachEventView, Deleted, ManualBreachRequest, ReportBreachRequest, ResolveBreachRequest,
};
use crate::risk_assessment::domain::BreachEvent;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

fn views(events: Vec<BreachEvent>) -> Vec<BreachEventView> {
    events.into_iter().map(BreachEventView::from).collect()
}

pub async fn list(State(state): State<AppState>) -> ApiResult {
    ok(views(state.breach_events.list().await?))
}

pub async fn unresolved(State(state): State<AppState>) -> ApiResult {
    ok(views(state.breach_events.unresolved().await?))
}

pub async fn report(
    State(state): State<AppState>,
    payload: Result<Json<ReportBreachRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload)?;
    let event = state.breach_events.report(request).await?;
    success(StatusCode::CREATED, BreachEventView::from(event))
}

pub async fn report_manual(
    State(state): State<AppState>,
    payload: Result<Json<ManualBreachRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload)?;
    let event = state.breach_events.report_manual(request).await?;
    success(StatusCode::CREATED, BreachEventView::from(event))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    ok(BreachEventView::from(state.breach_events.get(&id).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state.breach_events.delete(&id).await?;
    ok(Deleted { deleted: true })
}

pub async fn by_user(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult {
    ok(views(state.breach_events.by_user(&user_id).await?))
}

pub async fn by_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> ApiResult {
    ok(views(state.breach_events.by_company(&company_id).await?))
}

/// The body is optional: an empty request resolves without notes.
pub async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ResolveBreachRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::invalid_body(format!("Failed to parse the request body as JSON: {}", e)))?
    };
    ok(BreachEventView::from(
        state.breach_events.resolve(&id, request).await?,
    ))
}
