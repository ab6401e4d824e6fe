use std::collections::HashSet;

use serde::Serialize;

use crate::domain::access::{ADMIN_ONLY, authorize};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::customer::Customer;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::orders::{ORDER_BATCH_ROWS, OrderBatch, OrderBatchForm, OrderForm, OrderRowInput};
use crate::repository::{CustomerReader, OrderReader, OrderWriter, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Product entry offered in the order form selects.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductOption {
    pub id: i32,
    pub name: String,
}

impl From<Product> for ProductOption {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
        }
    }
}

/// Data required to render the batch order template.
#[derive(Debug, Serialize)]
pub struct OrderBatchPageData {
    pub customer: Customer,
    pub rows: Vec<OrderRowInput>,
    pub products: Vec<ProductOption>,
    pub statuses: Vec<&'static str>,
}

/// Result of submitting the batch order form.
#[derive(Debug)]
pub enum OrderBatchOutcome {
    /// All filled rows were stored. Zero when every row was blank.
    Created(usize),
    /// Nothing was stored; the page is re-rendered with row errors.
    Rejected(OrderBatchPageData),
}

/// Data required to render the order update template.
#[derive(Debug, Serialize)]
pub struct OrderEditPageData {
    pub order: Order,
    pub form: OrderForm,
    pub error: Option<String>,
    pub products: Vec<ProductOption>,
    pub statuses: Vec<&'static str>,
}

/// Result of submitting the order update form.
#[derive(Debug)]
pub enum OrderUpdateOutcome {
    Updated(Order),
    Rejected(OrderEditPageData),
}

fn status_labels() -> Vec<&'static str> {
    OrderStatus::ALL.iter().map(|status| status.as_str()).collect()
}

fn product_options<R>(repo: &R) -> ServiceResult<Vec<ProductOption>>
where
    R: ProductReader + ?Sized,
{
    Ok(repo
        .list_products(ProductListQuery::new())?
        .into_iter()
        .map(ProductOption::from)
        .collect())
}

fn product_ids(products: &[ProductOption]) -> HashSet<i32> {
    products.iter().map(|product| product.id).collect()
}

fn find_customer<R>(repo: &R, customer_id: i32) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    repo.get_customer_by_id(customer_id)?
        .ok_or(ServiceError::NotFound)
}

fn find_order<R>(repo: &R, order_id: i32) -> ServiceResult<Order>
where
    R: OrderReader + ?Sized,
{
    repo.get_order_by_id(order_id)?.ok_or(ServiceError::NotFound)
}

/// Loads the blank batch form for a customer.
pub fn load_order_batch_page<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    customer_id: i32,
) -> ServiceResult<OrderBatchPageData>
where
    R: CustomerReader + ProductReader + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let customer = find_customer(repo, customer_id)?;

    Ok(OrderBatchPageData {
        customer,
        rows: vec![OrderRowInput::blank(); ORDER_BATCH_ROWS],
        products: product_options(repo)?,
        statuses: status_labels(),
    })
}

/// Validates every row and stores the batch in one transaction, or nothing.
pub fn create_orders<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    customer_id: i32,
    form: OrderBatchForm,
) -> ServiceResult<OrderBatchOutcome>
where
    R: CustomerReader + ProductReader + OrderWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let customer = find_customer(repo, customer_id)?;
    let products = product_options(repo)?;

    match form.into_batch(customer.id, &product_ids(&products)) {
        OrderBatch::Valid(new_orders) if new_orders.is_empty() => Ok(OrderBatchOutcome::Created(0)),
        OrderBatch::Valid(new_orders) => {
            let created = repo.create_orders(&new_orders)?;
            log::info!("Created {created} orders for customer {}", customer.id);
            Ok(OrderBatchOutcome::Created(created))
        }
        OrderBatch::Invalid(rows) => Ok(OrderBatchOutcome::Rejected(OrderBatchPageData {
            customer,
            rows,
            products,
            statuses: status_labels(),
        })),
    }
}

/// Loads an order into the update form.
pub fn load_order_edit_page<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    order_id: i32,
) -> ServiceResult<OrderEditPageData>
where
    R: OrderReader + ProductReader + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let order = find_order(repo, order_id)?;
    let form = OrderForm {
        product: order
            .product_id
            .map(|id| id.to_string())
            .unwrap_or_default(),
        status: order.status.as_str().to_string(),
    };

    Ok(OrderEditPageData {
        order,
        form,
        error: None,
        products: product_options(repo)?,
        statuses: status_labels(),
    })
}

/// Overwrites the product and status of an order.
pub fn update_order<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    order_id: i32,
    form: OrderForm,
) -> ServiceResult<OrderUpdateOutcome>
where
    R: OrderReader + OrderWriter + ProductReader + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let order = find_order(repo, order_id)?;
    let products = product_options(repo)?;

    match form.into_update_order(&product_ids(&products)) {
        Ok(update) => {
            let updated = repo.update_order(order.id, &update)?;
            Ok(OrderUpdateOutcome::Updated(updated))
        }
        Err(err) => Ok(OrderUpdateOutcome::Rejected(OrderEditPageData {
            order,
            form,
            error: Some(err.to_string()),
            products,
            statuses: status_labels(),
        })),
    }
}

/// Loads the order shown on the delete confirmation page.
pub fn load_order_for_delete<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    order_id: i32,
) -> ServiceResult<Order>
where
    R: OrderReader + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    find_order(repo, order_id)
}

/// Deletes an order.
pub fn remove_order<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    order_id: i32,
) -> ServiceResult<()>
where
    R: OrderWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    repo.delete_order(order_id).map_err(ServiceError::from)
}
