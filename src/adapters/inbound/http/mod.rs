//! Inbound HTTP adapter: the axum router serving the REST surface

mod client_ip;
mod envelope;
pub mod handlers;
mod router;
mod state;

pub use client_ip::forwarded_client_ip;
pub use envelope::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
