pub mod error;
pub mod result;
pub mod security;

pub use error::RiskError;
pub use result::Result;
