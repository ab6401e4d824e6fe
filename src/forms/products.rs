use std::io::{Read, Seek};

use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use csv::{StringRecord, Trim};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, ProductCategory};
use crate::forms::{parse_price_cents, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: u64 = 200;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
    #[error("invalid category `{value}`")]
    InvalidCategory { value: String },
    /// The uploaded CSV is missing required columns.
    #[error("upload is missing the required `name`, `price` or `category` headers")]
    MissingRequiredHeaders,
    /// A CSV row did not include a product name.
    #[error("row {row} is missing a product name")]
    UploadMissingName { row: usize },
    #[error("row {row} has invalid price `{value}`")]
    UploadInvalidPrice { row: usize, value: String },
    #[error("row {row} has invalid category `{value}`")]
    UploadInvalidCategory { row: usize, value: String },
    /// The uploaded CSV did not contain any usable products.
    #[error("upload contains no products")]
    EmptyUpload,
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
    /// CSV parsing failures.
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Form payload emitted when submitting the "Add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    /// Decimal price such as `12.50`.
    pub price: String,
    /// `Indoor` or `Out Door`.
    pub category: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Tags to attach; submitted as repeated `tag_ids` keys.
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents =
            parse_price_cents(&self.price).ok_or_else(|| ProductFormError::InvalidPrice {
                value: self.price.trim().to_string(),
            })?;

        let category: ProductCategory =
            self.category
                .parse()
                .map_err(|_| ProductFormError::InvalidCategory {
                    value: self.category.trim().to_string(),
                })?;

        let mut tag_ids = self.tag_ids;
        tag_ids.sort_unstable();
        tag_ids.dedup();

        let mut new_product =
            NewProduct::new(sanitized_name, price_cents, category).with_tag_ids(tag_ids);

        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            new_product = new_product.with_description(description);
        }

        Ok(new_product)
    }
}

#[derive(MultipartForm)]
/// Multipart form for uploading a CSV file with new products.
pub struct UploadProductsForm {
    #[multipart(limit = "10MB")]
    /// Uploaded CSV file containing product data.
    pub csv: TempFile,
}

impl UploadProductsForm {
    /// Parse the uploaded CSV file into a list of [`NewProduct`] records.
    pub fn parse(&mut self) -> ProductFormResult<Vec<NewProduct>> {
        self.csv.file.rewind()?;
        parse_products(self.csv.file.by_ref())
    }
}

struct ProductHeaderIndexes {
    name: usize,
    price: usize,
    category: usize,
    description: Option<usize>,
}

fn locate_product_headers(headers: &StringRecord) -> ProductFormResult<ProductHeaderIndexes> {
    let (Some(name), Some(price), Some(category)) = (
        locate_header(headers, "name"),
        locate_header(headers, "price"),
        locate_header(headers, "category"),
    ) else {
        return Err(ProductFormError::MissingRequiredHeaders);
    };

    Ok(ProductHeaderIndexes {
        name,
        price,
        category,
        description: locate_header(headers, "description"),
    })
}

fn locate_header(headers: &StringRecord, expected: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(expected))
}

fn parse_products<R: Read>(reader: R) -> ProductFormResult<Vec<NewProduct>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let indexes = locate_product_headers(&headers)?;

    let mut products = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row_number = index + 2; // account for header row
        let record = row?;

        let name = sanitize_inline_text(record.get(indexes.name).unwrap_or(""));
        if name.is_empty() {
            return Err(ProductFormError::UploadMissingName { row: row_number });
        }

        let price_raw = record.get(indexes.price).unwrap_or("");
        let price_cents =
            parse_price_cents(price_raw).ok_or_else(|| ProductFormError::UploadInvalidPrice {
                row: row_number,
                value: price_raw.to_string(),
            })?;

        let category_raw = record.get(indexes.category).unwrap_or("");
        let category: ProductCategory =
            category_raw
                .parse()
                .map_err(|_| ProductFormError::UploadInvalidCategory {
                    row: row_number,
                    value: category_raw.to_string(),
                })?;

        let mut product = NewProduct::new(name, price_cents, category);

        if let Some(description) = indexes
            .description
            .and_then(|idx| record.get(idx))
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            product = product.with_description(description);
        }

        products.push(product);
    }

    if products.is_empty() {
        return Err(ProductFormError::EmptyUpload);
    }

    Ok(products)
}
