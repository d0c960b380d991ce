use crate::risk_assessment::domain::{BreachEvent, PassportString};
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// BreachEventRepository port for persisting breach events
///
/// Every listing is ordered newest first.
#[async_trait]
pub trait BreachEventRepository: Send + Sync {
    async fn insert(&self, event: BreachEvent) -> Result<()>;

    async fn find(&self, id: Uuid) -> Result<Option<BreachEvent>>;

    async fn list(&self) -> Result<Vec<BreachEvent>>;

    async fn list_by_user(&self, user_id: &PassportString) -> Result<Vec<BreachEvent>>;

    async fn list_by_company(&self, company_id: &str) -> Result<Vec<BreachEvent>>;

    /// Moves an open event to RESOLVED while holding it.
    ///
    /// # Errors
    /// `NotFound` if no event has that id, `Conflict` if it is already
    /// resolved. The stored event is unchanged on error.
    async fn resolve(
        &self,
        id: Uuid,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<BreachEvent>;

    /// Removes and returns the event, if present.
    async fn delete(&self, id: Uuid) -> Result<Option<BreachEvent>>;
}
