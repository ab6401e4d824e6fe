pub mod customer;
pub mod order;
pub mod product;
pub mod product_tag;
pub mod tag;
pub mod user;
