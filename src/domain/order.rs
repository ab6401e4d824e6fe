use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery states an order moves through.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Order has been placed and awaits dispatch.
    #[serde(rename = "Pending")]
    Pending,
    /// Order has left the warehouse.
    #[serde(rename = "Out for delivery")]
    OutForDelivery,
    /// Order reached the customer.
    #[serde(rename = "Delivered")]
    Delivered,
}

/// Returned when a string does not name a known [`OrderStatus`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status `{0}`")]
pub struct UnknownOrderStatus(pub String);

impl OrderStatus {
    /// Every status in the order presented to users.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Stored and displayed label of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
        }
    }
}

impl From<OrderStatus> for &'static str {
    fn from(value: OrderStatus) -> Self {
        value.as_str()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownOrderStatus(s.to_string()))
    }
}

/// Domain representation of an order together with the names of the records it points to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Order {
    /// Unique identifier of the order.
    pub id: i32,
    /// Customer who placed the order; cleared when the customer is deleted.
    pub customer_id: Option<i32>,
    /// Display name of the customer, if still present.
    pub customer_name: Option<String>,
    /// Ordered product; cleared when the product is deleted.
    pub product_id: Option<i32>,
    /// Display name of the product, if still present.
    pub product_name: Option<String>,
    /// Current delivery status.
    pub status: OrderStatus,
    /// Timestamp for when the order record was created.
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Customer placing the order.
    pub customer_id: Option<i32>,
    /// Ordered product.
    pub product_id: Option<i32>,
    /// Initial delivery status.
    pub status: OrderStatus,
}

impl NewOrder {
    /// Build an order for `customer_id` of `product_id` in the given status.
    pub fn new(customer_id: i32, product_id: i32, status: OrderStatus) -> Self {
        Self {
            customer_id: Some(customer_id),
            product_id: Some(product_id),
            status,
        }
    }
}

/// Full replacement of the editable order fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOrder {
    /// Product the order now refers to.
    pub product_id: i32,
    /// New delivery status.
    pub status: OrderStatus,
}

/// Query definition used to list or count orders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderListQuery {
    /// Optional status equality filter.
    pub status: Option<OrderStatus>,
    /// Optional customer identifier filter.
    pub customer_id: Option<i32>,
    /// Maximum number of rows to return, newest first.
    pub limit: Option<i64>,
}

impl OrderListQuery {
    /// Construct a query that targets every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by the provided status.
    pub fn status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter the results by customer identifier.
    pub fn customer_id(mut self, customer_id: i32) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Only return the newest `limit` orders.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}
