use crate::adapters::inbound::http::envelope::{json_body, ok, ApiResult};
use crate::adapters::inbound::http::state::AppState;
use crate::application::dto::{AddDeviceRequest, Deleted};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

pub async fn suspicious(State(state): State<AppState>) -> ApiResult {
    ok(state.devices.suspicious().await?)
}

pub async fn shared(State(state): State<AppState>) -> ApiResult {
    ok(state.devices.shared().await?)
}

pub async fn add(
    State(state): State<AppState>,
    payload: Result<Json<AddDeviceRequest>, JsonRejection>,
) -> ApiResult {
    let request = json_body(payload)?;
    ok(state.devices.add_device(request).await?)
}

pub async fn of_user(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult {
    ok(state.devices.devices_of(&user_id).await?)
}

pub async fn refresh(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult {
    ok(state.devices.refresh_devices_of(&user_id).await?)
}

pub async fn delete_of_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult {
    let deleted = state.devices.delete_devices_of(&user_id).await?;
    ok(Deleted { deleted })
}

pub async fn by_id(State(state): State<AppState>, Path(device_id): Path<String>) -> ApiResult {
    ok(state.devices.device(&device_id).await?)
}

pub async fn risk_score(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult {
    ok(state.devices.risk_score(&user_id).await?)
}
