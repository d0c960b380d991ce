pub mod breach;
pub mod company;
pub mod device;
pub mod score;
pub mod user;

pub use breach::{validate_text, BreachDraft, BreachEvent, BreachStatus, BreachType, Severity};
pub use company::{validate_company_id, BreachPolicy, Company};
pub use device::{is_local_address, Device, IpReputation};
pub use score::Score;
pub use user::{PassportString, User, UserName};
