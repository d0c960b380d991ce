use crate::adapters::inbound::http::envelope::{created_or_existing, json_body, ok, ApiResult};
use crate::adapters::inbound::http::state::AppState;
use crate::application::dto::{BreachPolicyRequest, Deleted};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

pub async fn get(State(state): State<AppState>, Path(company_id): Path<String>) -> ApiResult {
    ok(state.companies.policy(&company_id).await?)
}

pub async fn create(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    payload: Result<Json<BreachPolicyRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload)?;
    let (policy, created) = state.companies.create_policy(&company_id, request).await?;
    created_or_existing(policy, created)
}

pub async fn update(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    payload: Result<Json<BreachPolicyRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload)?;
    ok(state.companies.update_policy(&company_id, request).await?)
}

pub async fn delete(State(state): State<AppState>, Path(company_id): Path<String>) -> ApiResult {
    state.companies.delete_policy(&company_id).await?;
    ok(Deleted { deleted: true })
}

pub async fn high_impact(
    State(state): State<AppState>,
    Path(threshold): Path<String>,
) -> ApiResult {
    ok(state.companies.high_impact(&threshold).await?)
}

pub async fn by_type(State(state): State<AppState>, Path(breach_type): Path<String>) -> ApiResult {
    ok(state.companies.companies_with_breach_type(&breach_type).await?)
}
