use super::input;
use crate::application::dto::{BreachPolicyRequest, CompanyView, CreateCompanyRequest};
use crate::ports::outbound::CompanyRepository;
use crate::risk_assessment::domain::{
    validate_company_id, validate_text, BreachPolicy, BreachType, Company, Score,
};
use crate::shared::{Result, RiskError};
use chrono::Utc;
use std::sync::Arc;

/// CompanyCatalog - companies and the breach policy each one watches for
#[derive(Clone)]
pub struct CompanyCatalog {
    companies: Arc<dyn CompanyRepository>,
}

impl CompanyCatalog {
    pub fn new(companies: Arc<dyn CompanyRepository>) -> Self {
        Self { companies }
    }

    /// Creates a company, or returns the existing one when the client-supplied
    /// id is already taken. Returns whether it was created.
    pub async fn create(&self, request: CreateCompanyRequest) -> Result<(CompanyView, bool)> {
        let company = Company::new(request.id, &request.name, &request.industry, Utc::now())?;
        let (company, created) = self.companies.insert_company_if_absent(company).await?;
        if created {
            tracing::info!(company_id = %company.id, name = %company.name, "Company created");
        }
        Ok((self.view(company).await?, created))
    }

    pub async fn list(&self) -> Result<Vec<CompanyView>> {
        let mut views = Vec::new();
        for company in self.companies.list_companies().await? {
            views.push(self.view(company).await?);
        }
        Ok(views)
    }

    pub async fn get(&self, id: &str) -> Result<CompanyView> {
        let company = self.company(id).await?;
        self.view(company).await
    }

    pub async fn policy(&self, company_id: &str) -> Result<BreachPolicy> {
        let company_id = validate_company_id(company_id)?;
        self.companies
            .find_policy(&company_id)
            .await?
            .ok_or_else(|| RiskError::not_found("Breach policy", company_id).into())
    }

    /// Creates the company's breach policy. If it already has one, the
    /// existing policy is returned unchanged.
    pub async fn create_policy(
        &self,
        company_id: &str,
        request: BreachPolicyRequest,
    ) -> Result<(BreachPolicy, bool)> {
        let company = self.company(company_id).await?;
        let policy = build_policy(company.id, request)?;
        let (policy, created) = self.companies.insert_policy_if_absent(policy).await?;
        if created {
            tracing::info!(
                company_id = %policy.company_id,
                breach_type = %policy.breach_type,
                effect_score = %policy.effect_score,
                "Breach policy created"
            );
        } else {
            tracing::warn!(company_id = %policy.company_id, "Breach policy already exists");
        }
        Ok((policy, created))
    }

    pub async fn update_policy(
        &self,
        company_id: &str,
        request: BreachPolicyRequest,
    ) -> Result<BreachPolicy> {
        let company = self.company(company_id).await?;
        let policy = build_policy(company.id, request)?;
        self.companies.update_policy(policy.clone()).await?;
        tracing::info!(company_id = %policy.company_id, "Breach policy updated");
        Ok(policy)
    }

    pub async fn delete_policy(&self, company_id: &str) -> Result<()> {
        let company_id = validate_company_id(company_id)?;
        if !self.companies.delete_policy(&company_id).await? {
            return Err(RiskError::not_found("Breach policy", company_id).into());
        }
        tracing::info!(company_id = %company_id, "Breach policy deleted");
        Ok(())
    }

    /// Policies whose effect score is at least `threshold`.
    pub async fn high_impact(&self, threshold: &str) -> Result<Vec<BreachPolicy>> {
        let threshold = input::score_text("threshold", threshold)?;
        let policies = self.companies.list_policies().await?;
        Ok(policies
            .into_iter()
            .filter(|p| p.is_high_impact(threshold))
            .collect())
    }

    /// Ids of the companies whose policy watches for `breach_type`.
    pub async fn companies_with_breach_type(&self, breach_type: &str) -> Result<Vec<String>> {
        let breach_type: BreachType = breach_type.parse()?;
        let policies = self.companies.list_policies().await?;
        Ok(policies
            .into_iter()
            .filter(|p| p.breach_type == breach_type)
            .map(|p| p.company_id)
            .collect())
    }

    async fn company(&self, id: &str) -> Result<Company> {
        let id = validate_company_id(id)?;
        self.companies
            .find_company(&id)
            .await?
            .ok_or_else(|| RiskError::not_found("Company", id).into())
    }

    async fn view(&self, company: Company) -> Result<CompanyView> {
        let breach = self.companies.find_policy(&company.id).await?;
        Ok(CompanyView { company, breach })
    }
}

fn build_policy(company_id: String, request: BreachPolicyRequest) -> Result<BreachPolicy> {
    let breach_type: BreachType = request.breach_type.parse()?;
    let effect_score = Score::parse("effect_score", request.effect_score)?;
    let description = match request.description {
        Some(text) => Some(validate_text("description", &text, false)?),
        None => None,
    };
    Ok(BreachPolicy::new(
        company_id,
        breach_type,
        effect_score,
        description,
        Utc::now(),
    ))
}
