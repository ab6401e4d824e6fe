pub mod access;
pub mod auth;
pub mod customer;
pub mod order;
pub mod product;
pub mod tag;
pub mod user;
