use crate::adapters::inbound::http::envelope::{created_or_existing, json_body, ok, ApiResult};
use crate::adapters::inbound::http::state::AppState;
use crate::application::dto::CreateCompanyRequest;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

pub async fn list(State(state): State<AppState>) -> ApiResult {
    ok(state.companies.list().await?)
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload)?;
    let (company, created) = state.companies.create(request).await?;
    created_or_existing(company, created)
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    ok(state.companies.get(&id).await?)
}
