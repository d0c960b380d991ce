use serde::Deserialize;

/// Body of `POST /users`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub passport_string: String,
    #[serde(default)]
    pub ip_address: Option<String>,
}

/// Body of `PUT /users/:passport`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
}

/// Body of `POST /breach-events`
///
/// Enumerations arrive as text and are parsed by the use case, so an unknown
/// breach type is reported against its field instead of as a malformed body.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportBreachRequest {
    /// Passport string of the offending user
    pub user_id: String,
    pub breach_type: String,
    pub effect_score: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_id: Option<String>,
}

/// Body of `POST /breach-events/manual`
#[derive(Debug, Clone, Deserialize)]
pub struct ManualBreachRequest {
    #[serde(flatten)]
    pub report: ReportBreachRequest,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `POST /breach-events/:id/resolve`. The body itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveBreachRequest {
    #[serde(default, alias = "notes")]
    pub resolution_notes: Option<String>,
}

/// Body of `POST /companies`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompanyRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub industry: String,
}

/// Body of `POST` and `PUT /breaches/:companyId`
#[derive(Debug, Clone, Deserialize)]
pub struct BreachPolicyRequest {
    pub breach_type: String,
    pub effect_score: i64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /user-info/devices`
#[derive(Debug, Clone, Deserialize)]
pub struct AddDeviceRequest {
    pub user_id: String,
    pub ip_address: String,
}
