//! riskwatch - risk and breach ledger service
//!
//! Tracks users (keyed by passport string), companies with their breach
//! policies, reported breach events and the devices users are seen on, and
//! derives a reference risk score per user. Everything is served as a JSON
//! REST API; state lives in memory with an optional JSON snapshot on disk.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`risk_assessment`): Domain models, scoring policies and services
//! - **Application Layer** (`application`): Use cases and request/response DTOs
//! - **Ports** (`ports`): Interface definitions for storage and IP reputation lookups
//! - **Adapters** (`adapters`): The axum HTTP surface, in-memory store, snapshot file and IPQualityScore client
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use riskwatch::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn serve() -> Result<()> {
//! let store = Arc::new(InMemoryStore::new());
//! let state = AppState::new(
//!     store,
//!     Arc::new(OfflineIpReputationProvider),
//!     UserRiskWeights::default(),
//!     DeviceRiskPolicy::default(),
//!     "in-memory",
//! );
//! let app = build_router(state, "/api/v1");
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod risk_assessment;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::inbound::http::{build_router, AppState};
    pub use crate::adapters::outbound::filesystem::SnapshotStore;
    pub use crate::adapters::outbound::memory::{InMemoryStore, StoreSnapshot};
    pub use crate::adapters::outbound::network::{
        CachingIpReputationProvider, IpQualityScoreClient, OfflineIpReputationProvider,
    };
    pub use crate::application::use_cases::{
        BreachEventService, CompanyCatalog, DeviceTracker, RiskAssessment, UserRegistry,
    };
    pub use crate::ports::outbound::{
        BreachEventRepository, CompanyRepository, DeviceRepository, IpReputationProvider,
        UserRepository,
    };
    pub use crate::risk_assessment::domain::{
        BreachEvent, BreachPolicy, BreachStatus, BreachType, Company, Device, IpReputation,
        PassportString, Score, Severity, User,
    };
    pub use crate::risk_assessment::policies::{DeviceRiskPolicy, SeverityPolicy, UserRiskWeights};
    pub use crate::risk_assessment::services::{DeviceCorrelator, RiskScorer};
    pub use crate::shared::{Result, RiskError};
}
