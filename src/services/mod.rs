pub use errors::{ServiceError, ServiceResult};

pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod errors;
pub mod orders;
pub mod products;
pub mod tags;
