use crate::adapters::inbound::http::client_ip::forwarded_client_ip;
use crate::adapters::inbound::http::envelope::{created_or_existing, json_body, ok, ApiResult};
use crate::adapters::inbound::http::state::AppState;
use crate::application::dto::{CreateUserRequest, Deleted, UpdateUserRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

pub async fn list(State(state): State<AppState>) -> ApiResult {
    ok(state.users.list().await?)
}

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload)?;
    let (user, created) = state
        .users
        .register(request, forwarded_client_ip(&headers))
        .await?;
    created_or_existing(user, created)
}

pub async fn get(
    State(state): State<AppState>,
    Path(passport): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    ok(state
        .users
        .get(&passport, forwarded_client_ip(&headers))
        .await?)
}

pub async fn update(
    State(state): State<AppState>,
    Path(passport): Path<String>,
    headers: HeaderMap,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload)?;
    ok(state
        .users
        .rename(&passport, request, forwarded_client_ip(&headers))
        .await?)
}

pub async fn delete(State(state): State<AppState>, Path(passport): Path<String>) -> ApiResult {
    state.users.delete(&passport).await?;
    ok(Deleted { deleted: true })
}

pub async fn score(State(state): State<AppState>, Path(passport): Path<String>) -> ApiResult {
    ok(state.users.score(&passport).await?)
}

pub async fn risk(
    State(state): State<AppState>,
    Path(passport): Path<String>,
    headers: HeaderMap,
) -> ApiResult {
    ok(state
        .users
        .risk(&passport, forwarded_client_ip(&headers))
        .await?)
}
