use super::envelope::route_not_found;
use super::handlers::{breach_events, breaches, companies, devices, health, users};
use super::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Routes of the REST surface, relative to the base path.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/score/:passport", get(users::score))
        .route("/users/risk/:passport", get(users::risk))
        .route(
            "/users/:passport",
            get(users::get).put(users::update).delete(users::delete),
        )
        .route(
            "/breach-events",
            get(breach_events::list).post(breach_events::report),
        )
        .route("/breach-events/unresolved", get(breach_events::unresolved))
        .route("/breach-events/manual", post(breach_events::report_manual))
        .route("/breach-events/user/:user_id", get(breach_events::by_user))
        .route(
            "/breach-events/company/:company_id",
            get(breach_events::by_company),
        )
        .route(
            "/breach-events/:id",
            get(breach_events::get).delete(breach_events::delete),
        )
        .route("/breach-events/:id/resolve", post(breach_events::resolve))
        .route("/companies", get(companies::list).post(companies::create))
        .route("/companies/:id", get(companies::get))
        .route("/breaches/high-impact/:threshold", get(breaches::high_impact))
        .route("/breaches/by-type/:breach_type", get(breaches::by_type))
        .route(
            "/breaches/:company_id",
            get(breaches::get)
                .post(breaches::create)
                .put(breaches::update)
                .delete(breaches::delete),
        )
        .route("/user-info/devices", post(devices::add))
        .route("/user-info/devices/suspicious", get(devices::suspicious))
        .route("/user-info/devices/shared", get(devices::shared))
        .route("/user-info/devices/id/:device_id", get(devices::by_id))
        .route(
            "/user-info/devices/:user_id",
            get(devices::of_user).delete(devices::delete_of_user),
        )
        .route("/user-info/devices/:user_id/refresh", post(devices::refresh))
        .route("/user-info/risk-score/:user_id", get(devices::risk_score))
}

/// Builds the full application router
///
/// The REST surface is mounted under `base_path` (e.g. `/api/v1`); the root
/// and health endpoints stay at the top level. An empty base path mounts the
/// surface at the root.
pub fn build_router(state: AppState, base_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let top_level = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health));

    let base_path = base_path.trim_end_matches('/');
    let app = if base_path.is_empty() {
        top_level.merge(api_routes())
    } else {
        top_level.nest(base_path, api_routes())
    };

    app.fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
