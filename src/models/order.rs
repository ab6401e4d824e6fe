use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::order::{
    NewOrder as DomainNewOrder, Order as DomainOrder, UpdateOrder as DomainUpdateOrder,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::orders,
    belongs_to(super::customer::Customer, foreign_key = customer_id),
    belongs_to(super::product::Product, foreign_key = product_id)
)]
pub struct Order {
    pub id: i32,
    pub customer_id: Option<i32>,
    pub product_id: Option<i32>,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::orders)]
pub struct NewOrder<'a> {
    pub customer_id: Option<i32>,
    pub product_id: Option<i32>,
    pub status: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::orders)]
pub struct UpdateOrder<'a> {
    pub product_id: Option<i32>,
    pub status: &'a str,
}

/// Order row joined with the names of its customer and product.
pub type OrderRow = (Order, Option<String>, Option<String>);

impl Order {
    pub fn into_domain(
        self,
        customer_name: Option<String>,
        product_name: Option<String>,
    ) -> Result<DomainOrder, RepositoryError> {
        let status = self
            .status
            .parse()
            .map_err(|err| RepositoryError::InvalidData(format!("order {}: {err}", self.id)))?;

        Ok(DomainOrder {
            id: self.id,
            customer_id: self.customer_id,
            customer_name,
            product_id: self.product_id,
            product_name,
            status,
            created_at: self.created_at,
        })
    }
}

impl TryFrom<OrderRow> for DomainOrder {
    type Error = RepositoryError;

    fn try_from(value: OrderRow) -> Result<Self, Self::Error> {
        let (order, customer_name, product_name) = value;
        order.into_domain(customer_name, product_name)
    }
}

impl<'a> From<&'a DomainNewOrder> for NewOrder<'a> {
    fn from(value: &'a DomainNewOrder) -> Self {
        Self {
            customer_id: value.customer_id,
            product_id: value.product_id,
            status: value.status.into(),
        }
    }
}

impl<'a> From<&'a DomainUpdateOrder> for UpdateOrder<'a> {
    fn from(value: &'a DomainUpdateOrder) -> Self {
        Self {
            product_id: Some(value.product_id),
            status: value.status.into(),
        }
    }
}
