use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{NewProduct as DomainNewProduct, Product as DomainProduct};
use crate::domain::tag::Tag as DomainTag;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price_cents: i64,
    pub category: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub price_cents: i64,
    pub category: &'a str,
    pub description: &'a str,
}

impl Product {
    pub fn into_domain(self, tags: Vec<DomainTag>) -> Result<DomainProduct, RepositoryError> {
        let category = self
            .category
            .parse()
            .map_err(|err| RepositoryError::InvalidData(format!("product {}: {err}", self.id)))?;

        Ok(DomainProduct {
            id: self.id,
            name: self.name,
            price_cents: self.price_cents,
            category,
            description: self.description,
            tags,
            created_at: self.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewProduct> for NewProduct<'a> {
    fn from(value: &'a DomainNewProduct) -> Self {
        Self {
            name: value.name.as_str(),
            price_cents: value.price_cents,
            category: value.category.into(),
            description: value.description.as_str(),
        }
    }
}
