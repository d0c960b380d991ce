use crate::risk_assessment::domain::{BreachPolicy, Company};
use crate::shared::Result;
use async_trait::async_trait;

/// CompanyRepository port for companies and their breach policies
///
/// A company has at most one breach policy, keyed by company id.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Stores `company` unless one with the same id exists. Returns the stored
    /// record and whether it was inserted.
    async fn insert_company_if_absent(&self, company: Company) -> Result<(Company, bool)>;

    async fn find_company(&self, id: &str) -> Result<Option<Company>>;

    /// All companies in creation order.
    async fn list_companies(&self) -> Result<Vec<Company>>;

    async fn find_policy(&self, company_id: &str) -> Result<Option<BreachPolicy>>;

    /// Stores `policy` unless the company already has one. Returns the stored
    /// policy and whether it was inserted.
    async fn insert_policy_if_absent(&self, policy: BreachPolicy) -> Result<(BreachPolicy, bool)>;

    /// Replaces the company's policy.
    ///
    /// # Errors
    /// Returns `NotFound` if the company has no policy yet.
    async fn update_policy(&self, policy: BreachPolicy) -> Result<()>;

    async fn delete_policy(&self, company_id: &str) -> Result<bool>;

    async fn list_policies(&self) -> Result<Vec<BreachPolicy>>;
}
