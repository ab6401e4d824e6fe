use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::customer::{Customer as DomainCustomer, NewCustomer as DomainNewCustomer};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(
    table_name = crate::schema::customers,
    belongs_to(super::user::User, foreign_key = user_id)
)]
pub struct Customer {
    pub id: i32,
    pub user_id: Option<i32>,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer<'a> {
    pub user_id: Option<i32>,
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
}

impl From<Customer> for DomainCustomer {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            name: value.name,
            phone: value.phone,
            email: value.email,
            created_at: value.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(value: &'a DomainNewCustomer) -> Self {
        Self {
            user_id: value.user_id,
            name: value.name.as_str(),
            phone: value.phone.as_str(),
            email: value.email.as_str(),
        }
    }
}
