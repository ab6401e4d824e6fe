use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::domain::order::{NewOrder, OrderStatus, UpdateOrder};

/// Number of order rows rendered by the batch form.
pub const ORDER_BATCH_ROWS: usize = 6;
const ORDER_BATCH_ROWS_VALIDATOR: u64 = ORDER_BATCH_ROWS as u64;

const MISSING_PRODUCT: &str = "Select a product.";
const INVALID_PRODUCT: &str = "Select a valid product.";
const MISSING_STATUS: &str = "Select a status.";
const INVALID_STATUS: &str = "Select a valid status.";

/// Result type returned by the order form helpers.
pub type OrderFormResult<T> = Result<T, OrderFormError>;

/// Errors that can occur while processing the single-order form.
#[derive(Debug, Error)]
pub enum OrderFormError {
    /// A field failed; the message is shown next to the form.
    #[error("{0}")]
    Field(&'static str),
}

/// Batch payload. Each row submits one `product` and one `status` key, in document order.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct OrderBatchForm {
    #[serde(default)]
    #[validate(length(max = ORDER_BATCH_ROWS_VALIDATOR))]
    pub product: Vec<String>,
    #[serde(default)]
    #[validate(length(max = ORDER_BATCH_ROWS_VALIDATOR))]
    pub status: Vec<String>,
}

/// One row of the batch form as submitted, together with its field errors.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct OrderRowInput {
    pub product: String,
    pub status: String,
    pub errors: Vec<String>,
}

impl OrderRowInput {
    /// Row preset to a status, used when rendering the blank form.
    pub fn blank() -> Self {
        Self {
            status: OrderStatus::Pending.as_str().to_string(),
            ..Self::default()
        }
    }

    /// No product chosen and the status left empty or at its preset value.
    fn is_blank(&self) -> bool {
        let status = self.status.trim();
        self.product.trim().is_empty()
            && (status.is_empty() || status == OrderStatus::Pending.as_str())
    }
}

/// Outcome of validating a batch submission.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderBatch {
    /// Every filled row is valid. Blank rows were dropped, so this may be empty.
    Valid(Vec<NewOrder>),
    /// At least one row is invalid; every submitted row is echoed back.
    Invalid(Vec<OrderRowInput>),
}

impl OrderBatchForm {
    /// Pair the submitted keys into rows, padding to [`ORDER_BATCH_ROWS`].
    pub fn rows(&self) -> Vec<OrderRowInput> {
        let len = self
            .product
            .len()
            .max(self.status.len())
            .max(ORDER_BATCH_ROWS);

        (0..len)
            .map(|index| OrderRowInput {
                product: self.product.get(index).cloned().unwrap_or_default(),
                status: self.status.get(index).cloned().unwrap_or_default(),
                errors: Vec::new(),
            })
            .collect()
    }

    /// Validate every row against the known product identifiers.
    pub fn into_batch(self, customer_id: i32, product_ids: &HashSet<i32>) -> OrderBatch {
        let mut rows = self.rows();

        if let Err(errors) = self.validate() {
            log::warn!("Rejected oversized order batch: {errors}");
            rows.truncate(ORDER_BATCH_ROWS);
            if let Some(first) = rows.first_mut() {
                first
                    .errors
                    .push(format!("Submit at most {ORDER_BATCH_ROWS} orders at once."));
            }
            return OrderBatch::Invalid(rows);
        }

        let mut orders = Vec::with_capacity(rows.len());
        let mut valid = true;

        for row in rows.iter_mut() {
            if row.is_blank() {
                continue;
            }

            match parse_row(&row.product, &row.status, product_ids) {
                Ok((product_id, status)) => {
                    orders.push(NewOrder::new(customer_id, product_id, status));
                }
                Err(errors) => {
                    valid = false;
                    row.errors = errors;
                }
            }
        }

        if valid {
            OrderBatch::Valid(orders)
        } else {
            OrderBatch::Invalid(rows)
        }
    }
}

fn parse_product(value: &str, product_ids: &HashSet<i32>) -> Result<i32, &'static str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MISSING_PRODUCT);
    }

    match value.parse::<i32>() {
        Ok(id) if product_ids.contains(&id) => Ok(id),
        _ => Err(INVALID_PRODUCT),
    }
}

fn parse_status(value: &str) -> Result<OrderStatus, &'static str> {
    if value.trim().is_empty() {
        return Err(MISSING_STATUS);
    }

    value.parse().map_err(|_| INVALID_STATUS)
}

fn parse_row(
    product: &str,
    status: &str,
    product_ids: &HashSet<i32>,
) -> Result<(i32, OrderStatus), Vec<String>> {
    match (parse_product(product, product_ids), parse_status(status)) {
        (Ok(product_id), Ok(status)) => Ok((product_id, status)),
        (product, status) => Err([product.err(), status.err()]
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect()),
    }
}

/// Form payload emitted when editing a single order.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrderForm {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub status: String,
}

impl OrderForm {
    /// Convert into an [`UpdateOrder`], checking the product against the known identifiers.
    pub fn into_update_order(&self, product_ids: &HashSet<i32>) -> OrderFormResult<UpdateOrder> {
        let product_id = parse_product(&self.product, product_ids).map_err(OrderFormError::Field)?;
        let status = parse_status(&self.status).map_err(OrderFormError::Field)?;

        Ok(UpdateOrder { product_id, status })
    }
}
