use crate::db::{DbConnection, DbPool};
use crate::domain::{
    customer::{Customer, NewCustomer},
    order::{NewOrder, Order, OrderListQuery, UpdateOrder},
    product::{NewProduct, Product, ProductListQuery},
    tag::{NewTag, Tag},
    user::{NewUser, User},
};

pub mod customer;
pub mod errors;
pub mod order;
pub mod product;
pub mod tag;
pub mod user;

#[cfg(test)]
pub mod mock;

use errors::RepositoryResult;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over customer records.
pub trait CustomerReader {
    fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<Customer>>;
    fn get_customer_by_user_id(&self, user_id: i32) -> RepositoryResult<Option<Customer>>;
    fn list_customers(&self) -> RepositoryResult<Vec<Customer>>;
    fn count_customers(&self) -> RepositoryResult<usize>;
}

/// Write operations over customer records.
pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    /// Delete the customer; its orders stay with a `NULL` customer reference.
    fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<Vec<Product>>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Insert every product or none of them.
    fn create_products(&self, new_products: &[NewProduct]) -> RepositoryResult<usize>;
    /// Delete the product; its orders stay with a `NULL` product reference.
    fn delete_product(&self, product_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over tag records.
pub trait TagReader {
    fn list_tags(&self) -> RepositoryResult<Vec<Tag>>;
}

/// Write operations over tag records.
pub trait TagWriter {
    fn create_tag(&self, new_tag: &NewTag) -> RepositoryResult<Tag>;
    fn delete_tag(&self, tag_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over order records.
pub trait OrderReader {
    fn get_order_by_id(&self, id: i32) -> RepositoryResult<Option<Order>>;
    fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<Vec<Order>>;
    /// Count matching orders; `limit` is ignored.
    fn count_orders(&self, query: OrderListQuery) -> RepositoryResult<usize>;
}

/// Write operations over order records.
pub trait OrderWriter {
    /// Insert every order in one transaction and return the number inserted.
    fn create_orders(&self, new_orders: &[NewOrder]) -> RepositoryResult<usize>;
    fn update_order(&self, order_id: i32, updates: &UpdateOrder) -> RepositoryResult<Order>;
    fn delete_order(&self, order_id: i32) -> RepositoryResult<()>;
}

/// Read-only operations over user accounts.
pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    /// Load a user together with the stored password hash for verification.
    fn get_user_credentials(&self, username: &str) -> RepositoryResult<Option<(User, String)>>;
}

/// Write operations over user accounts.
pub trait UserWriter {
    /// Insert the user and its roles in one transaction.
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    /// Insert the user, its roles and a customer linked to it in one transaction.
    /// The customer's `user_id` is set to the new user's id.
    fn create_user_with_customer(
        &self,
        new_user: &NewUser,
        new_customer: &NewCustomer,
    ) -> RepositoryResult<(User, Customer)>;
    fn delete_user(&self, user_id: i32) -> RepositoryResult<()>;
}
