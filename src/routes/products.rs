use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::products::{AddProductForm, UploadProductsForm};
use crate::repository::DieselRepository;
use crate::routes::{HtmlForm, base_context, deny, redirect, render_template};
use crate::services::ServiceError;
use crate::services::products::{
    ProductQuery, create_product, import_products, load_products, remove_product,
};

#[get("/products/")]
pub async fn show_products(
    params: web::Query<ProductQuery>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_products(repo.get_ref(), user.as_ref(), params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "products");
            context.insert("products", &data.products);
            context.insert("tags", &data.tags);
            context.insert("categories", &data.categories);
            context.insert("search", &data.search);
            context.insert("category", &data.category);
            render_template(&tera, "products/index.html", &context)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products/")
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    form: HtmlForm<AddProductForm>,
) -> impl Responder {
    match create_product(repo.get_ref(), user.as_ref(), form.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Product \"{}\" added.", product.name)).send();
            redirect("/products/")
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products/")
        }
        Err(err) => {
            log::error!("Failed to add a product: {err}");
            FlashMessage::error("Failed to add the product.").send();
            redirect("/products/")
        }
    }
}

#[post("/products/upload")]
pub async fn upload_products(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    MultipartForm(mut form): MultipartForm<UploadProductsForm>,
) -> impl Responder {
    match import_products(repo.get_ref(), user.as_ref(), &mut form) {
        Ok(count) => {
            FlashMessage::success(format!("{count} product(s) imported.")).send();
            redirect("/products/")
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products/")
        }
        Err(err) => {
            log::error!("Failed to import products: {err}");
            FlashMessage::error("Failed to import the products.").send();
            redirect("/products/")
        }
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    product_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = product_id.into_inner();

    match remove_product(repo.get_ref(), user.as_ref(), product_id) {
        Ok(()) => {
            FlashMessage::success("Product deleted. Orders that used it were kept.").send();
            redirect("/products/")
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/products/")
        }
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            FlashMessage::error("Failed to delete the product.").send();
            redirect("/products/")
        }
    }
}
