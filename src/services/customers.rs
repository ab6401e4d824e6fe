use serde::{Deserialize, Serialize};

use crate::domain::access::{ADMIN_ONLY, authorize};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::customer::Customer;
use crate::domain::order::{Order, OrderListQuery, OrderStatus};
use crate::forms::customers::AddCustomerForm;
use crate::repository::{CustomerReader, CustomerWriter, OrderReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the customer page.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerOrdersQuery {
    /// Optional status label; blank means no filter.
    pub status: Option<String>,
}

impl CustomerOrdersQuery {
    /// Parse the status filter. `Ok(None)` when absent or blank.
    pub fn parse_status(&self) -> ServiceResult<Option<OrderStatus>> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ServiceError::Form(format!("Unknown order status \"{value}\"."))),
        }
    }
}

/// Data required to render the customer detail template.
#[derive(Debug, Serialize)]
pub struct CustomerPageData {
    pub customer: Customer,
    /// Orders matching the active filter, newest first.
    pub orders: Vec<Order>,
    /// Number of orders matching the active filter.
    pub order_count: usize,
    /// Number of orders regardless of the filter.
    pub total_orders: usize,
    pub status: Option<OrderStatus>,
    pub statuses: Vec<&'static str>,
}

/// Loads one customer with their orders, optionally narrowed by status.
pub fn load_customer_page<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    customer_id: i32,
    query: &CustomerOrdersQuery,
) -> ServiceResult<CustomerPageData>
where
    R: CustomerReader + OrderReader + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let customer = repo
        .get_customer_by_id(customer_id)?
        .ok_or(ServiceError::NotFound)?;

    let status = query.parse_status()?;

    let mut list_query = OrderListQuery::new().customer_id(customer.id);
    let total_orders = repo.count_orders(list_query.clone())?;
    if let Some(status) = status {
        list_query = list_query.status(status);
    }

    let orders = repo.list_orders(list_query)?;

    Ok(CustomerPageData {
        order_count: orders.len(),
        customer,
        orders,
        total_orders,
        status,
        statuses: OrderStatus::ALL.iter().map(|s| s.as_str()).collect(),
    })
}

/// Creates a customer that is not linked to any login account.
pub fn create_customer<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    form: AddCustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let new_customer = form
        .into_new_customer()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_customer(&new_customer).map_err(ServiceError::from)
}

/// Deletes a customer. Their orders remain with a `NULL` customer.
pub fn remove_customer<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    customer_id: i32,
) -> ServiceResult<()>
where
    R: CustomerWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    repo.delete_customer(customer_id)
        .map_err(ServiceError::from)
}
