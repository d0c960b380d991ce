use crate::adapters::inbound::http::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "riskwatch risk and breach API",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": &*state.storage,
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "storage": &*state.storage,
    }))
}
