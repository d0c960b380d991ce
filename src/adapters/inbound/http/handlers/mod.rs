//! Request handlers, one module per resource

pub mod breach_events;
pub mod breaches;
pub mod companies;
pub mod devices;
pub mod health;
pub mod users;
