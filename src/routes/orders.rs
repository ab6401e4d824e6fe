use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::orders::{OrderBatchForm, OrderForm};
use crate::repository::DieselRepository;
use crate::routes::{HtmlForm, base_context, deny, redirect, render_template};
use crate::services::ServiceError;
use crate::services::orders::{
    OrderBatchOutcome, OrderBatchPageData, OrderEditPageData, OrderUpdateOutcome, create_orders,
    load_order_batch_page, load_order_edit_page, load_order_for_delete, remove_order,
    update_order,
};

fn render_batch(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    page: &OrderBatchPageData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, user, "orders");
    context.insert("customer", &page.customer);
    context.insert("rows", &page.rows);
    context.insert("products", &page.products);
    context.insert("statuses", &page.statuses);
    render_template(tera, "orders/create.html", &context)
}

fn render_edit(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    page: &OrderEditPageData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, user, "orders");
    context.insert("order", &page.order);
    context.insert("form", &page.form);
    context.insert("error", &page.error);
    context.insert("products", &page.products);
    context.insert("statuses", &page.statuses);
    render_template(tera, "orders/update.html", &context)
}

fn not_found(what: &str) -> HttpResponse {
    FlashMessage::error(format!("{what} not found.")).send();
    redirect("/")
}

#[get("/create_order/{customer_id}/")]
pub async fn show_create_order(
    customer_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();

    match load_order_batch_page(repo.get_ref(), user.as_ref(), customer_id) {
        Ok(page) => render_batch(&tera, &flash_messages, user.as_ref(), &page),
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => not_found("Customer"),
        Err(err) => {
            log::error!("Failed to load order form for customer {customer_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/create_order/{customer_id}/")]
pub async fn create_order(
    customer_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    form: HtmlForm<OrderBatchForm>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();

    match create_orders(repo.get_ref(), user.as_ref(), customer_id, form.into_inner()) {
        Ok(OrderBatchOutcome::Created(0)) => {
            FlashMessage::info("No orders were entered.").send();
            redirect("/")
        }
        Ok(OrderBatchOutcome::Created(count)) => {
            FlashMessage::success(format!("{count} order(s) created.")).send();
            redirect("/")
        }
        Ok(OrderBatchOutcome::Rejected(page)) => {
            render_batch(&tera, &flash_messages, user.as_ref(), &page)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => not_found("Customer"),
        Err(err) => {
            log::error!("Failed to create orders for customer {customer_id}: {err}");
            FlashMessage::error("Failed to create the orders.").send();
            redirect("/")
        }
    }
}

#[get("/update_order/{order_id}/")]
pub async fn show_update_order(
    order_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let order_id = order_id.into_inner();

    match load_order_edit_page(repo.get_ref(), user.as_ref(), order_id) {
        Ok(page) => render_edit(&tera, &flash_messages, user.as_ref(), &page),
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => not_found("Order"),
        Err(err) => {
            log::error!("Failed to load order {order_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/update_order/{order_id}/")]
pub async fn submit_update_order(
    order_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    form: web::Form<OrderForm>,
) -> impl Responder {
    let order_id = order_id.into_inner();

    match update_order(repo.get_ref(), user.as_ref(), order_id, form.into_inner()) {
        Ok(OrderUpdateOutcome::Updated(order)) => {
            FlashMessage::success(format!("Order #{} updated.", order.id)).send();
            redirect("/")
        }
        Ok(OrderUpdateOutcome::Rejected(page)) => {
            render_edit(&tera, &flash_messages, user.as_ref(), &page)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => not_found("Order"),
        Err(err) => {
            log::error!("Failed to update order {order_id}: {err}");
            FlashMessage::error("Failed to update the order.").send();
            redirect("/")
        }
    }
}

#[get("/delete_order/{order_id}/")]
pub async fn show_delete_order(
    order_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let order_id = order_id.into_inner();

    match load_order_for_delete(repo.get_ref(), user.as_ref(), order_id) {
        Ok(order) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "orders");
            context.insert("order", &order);
            render_template(&tera, "orders/delete.html", &context)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => not_found("Order"),
        Err(err) => {
            log::error!("Failed to load order {order_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/delete_order/{order_id}/")]
pub async fn delete_order(
    order_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let order_id = order_id.into_inner();

    match remove_order(repo.get_ref(), user.as_ref(), order_id) {
        Ok(()) => {
            FlashMessage::success(format!("Order #{order_id} deleted.")).send();
            redirect("/")
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => not_found("Order"),
        Err(err) => {
            log::error!("Failed to delete order {order_id}: {err}");
            FlashMessage::error("Failed to delete the order.").send();
            redirect("/")
        }
    }
}
