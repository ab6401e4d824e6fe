use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::access::{ADMIN_ONLY, authorize};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductCategory, ProductListQuery, format_price};
use crate::domain::tag::Tag;
use crate::forms::products::{AddProductForm, UploadProductsForm};
use crate::repository::{ProductReader, ProductWriter, TagReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the products index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    /// Optional case-insensitive search applied to names and descriptions.
    pub search: Option<String>,
    /// Optional category label.
    pub category: Option<String>,
}

/// Product prepared for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    /// Price formatted with two decimals.
    pub price: String,
    pub category: ProductCategory,
    pub description: String,
    pub tags: Vec<Tag>,
    pub created_at: NaiveDateTime,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: format_price(product.price_cents),
            category: product.category,
            description: product.description,
            tags: product.tags,
            created_at: product.created_at,
        }
    }
}

/// Data required to render the products index template.
#[derive(Debug, Serialize)]
pub struct ProductsPageData {
    pub products: Vec<ProductView>,
    /// Every tag, offered in the "Add product" form.
    pub tags: Vec<Tag>,
    pub categories: Vec<&'static str>,
    pub search: Option<String>,
    pub category: Option<ProductCategory>,
}

/// Fetches the catalogue, optionally narrowed by search term and category.
pub fn load_products<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    query: ProductQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + TagReader + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let search = query
        .search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty());

    let category = match query.category.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(value.parse::<ProductCategory>().map_err(|_| {
            ServiceError::Form(format!("Unknown product category \"{value}\"."))
        })?),
    };

    let mut list_query = ProductListQuery::new();
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }
    if let Some(category) = category {
        list_query = list_query.category(category);
    }

    let products = repo
        .list_products(list_query)?
        .into_iter()
        .map(ProductView::from)
        .collect();
    let tags = repo.list_tags()?;

    Ok(ProductsPageData {
        products,
        tags,
        categories: ProductCategory::ALL.iter().map(|c| c.as_str()).collect(),
        search,
        category,
    })
}

/// Creates a product and attaches the selected tags.
pub fn create_product<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_product(&new_product)
        .map_err(|err| match ServiceError::from(err) {
            ServiceError::NotFound => {
                ServiceError::Form("One of the selected tags no longer exists.".to_string())
            }
            other => other,
        })
}

/// Imports every product from an uploaded CSV file, or none of them.
pub fn import_products<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    form: &mut UploadProductsForm,
) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    let new_products = form
        .parse()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo.create_products(&new_products)?;
    log::info!("Imported {created} products from CSV upload");

    Ok(created)
}

/// Deletes a product. Orders that referenced it keep a `NULL` product.
pub fn remove_product<R>(
    repo: &R,
    user: Option<&AuthenticatedUser>,
    product_id: i32,
) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    authorize(user, ADMIN_ONLY).into_result()?;

    repo.delete_product(product_id).map_err(ServiceError::from)
}
