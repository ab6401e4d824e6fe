pub mod config;
pub mod db;
pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

/// Role required for the dashboard and every management page.
pub const ADMIN_ROLE: &str = "admin";
/// Role given to self-registered users.
pub const CUSTOMER_ROLE: &str = "customer";
