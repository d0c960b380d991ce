/// Data Transfer Objects for application layer
///
/// Requests are the loosely typed bodies clients send; the use cases turn
/// them into validated domain values. Responses are the `data` payloads.
mod requests;
mod responses;

pub use requests::{
    AddDeviceRequest, BreachPolicyRequest, CreateCompanyRequest, CreateUserRequest,
    ManualBreachRequest, ReportBreachRequest, ResolveBreachRequest, UpdateUserRequest,
};
pub use responses::{
    BreachEventView, CompanyView, Deleted, DeviceRiskResponse, UserRiskResponse,
    UserScoreResponse,
};
