use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::tag::Tag;

/// Where a product is meant to be used.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    #[serde(rename = "Indoor")]
    Indoor,
    #[serde(rename = "Out Door")]
    Outdoor,
}

/// Returned when a string does not name a known [`ProductCategory`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown product category `{0}`")]
pub struct UnknownProductCategory(pub String);

impl ProductCategory {
    /// Every category in the order presented to users.
    pub const ALL: [ProductCategory; 2] = [ProductCategory::Indoor, ProductCategory::Outdoor];

    /// Stored and displayed label of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            ProductCategory::Indoor => "Indoor",
            ProductCategory::Outdoor => "Out Door",
        }
    }
}

impl From<ProductCategory> for &'static str {
    fn from(value: ProductCategory) -> Self {
        value.as_str()
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = UnknownProductCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|ch| !ch.is_whitespace()).collect();
        if compact.eq_ignore_ascii_case("indoor") {
            Ok(ProductCategory::Indoor)
        } else if compact.eq_ignore_ascii_case("outdoor") {
            Ok(ProductCategory::Outdoor)
        } else {
            Err(UnknownProductCategory(s.to_string()))
        }
    }
}

/// Domain representation of a product in the catalogue.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Price represented in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// Indoor or outdoor usage.
    pub category: ProductCategory,
    /// Longer description shown to users.
    pub description: String,
    /// Tags attached to the product, ordered by name.
    pub tags: Vec<Tag>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// Human-readable name of the product.
    pub name: String,
    /// Price represented in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// Indoor or outdoor usage.
    pub category: ProductCategory,
    /// Longer description shown to users.
    pub description: String,
    /// Identifiers of existing tags to attach.
    pub tag_ids: Vec<i32>,
}

impl NewProduct {
    /// Build a new product payload with no description or tags.
    pub fn new(name: impl Into<String>, price_cents: i64, category: ProductCategory) -> Self {
        Self {
            name: name.into(),
            price_cents,
            category,
            description: String::new(),
            tag_ids: Vec::new(),
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach existing tags to the product payload.
    pub fn with_tag_ids(mut self, tag_ids: Vec<i32>) -> Self {
        self.tag_ids = tag_ids;
        self
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListQuery {
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Optional category filter.
    pub category: Option<ProductCategory>,
}

impl ProductListQuery {
    /// Construct a query that targets every product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results by category.
    pub fn category(mut self, category: ProductCategory) -> Self {
        self.category = Some(category);
        self
    }
}

/// Render an amount in the smallest currency unit as a decimal string, e.g. `1250` as `12.50`.
pub fn format_price(price_cents: i64) -> String {
    let sign = if price_cents < 0 { "-" } else { "" };
    let abs = price_cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
