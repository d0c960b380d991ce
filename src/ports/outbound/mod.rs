/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach storage and external reputation services.
pub mod breach_event_repository;
pub mod company_repository;
pub mod device_repository;
pub mod ip_reputation_provider;
pub mod user_repository;

pub use breach_event_repository::BreachEventRepository;
pub use company_repository::CompanyRepository;
pub use device_repository::DeviceRepository;
pub use ip_reputation_provider::IpReputationProvider;
pub use user_repository::UserRepository;
