use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::forms::customers::AddCustomerForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, deny, redirect, render_template};
use crate::services::ServiceError;
use crate::services::customers::{
    CustomerOrdersQuery, create_customer, load_customer_page, remove_customer,
};

#[get("/customer/{customer_id}/")]
pub async fn show_customer(
    customer_id: web::Path<i32>,
    params: web::Query<CustomerOrdersQuery>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();

    match load_customer_page(repo.get_ref(), user.as_ref(), customer_id, &params) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "customer");
            context.insert("customer", &data.customer);
            context.insert("orders", &data.orders);
            context.insert("order_count", &data.order_count);
            context.insert("total_orders", &data.total_orders);
            context.insert("status", &data.status);
            context.insert("statuses", &data.statuses);
            render_template(&tera, "customers/show.html", &context)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Customer not found.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/customer/{customer_id}/"))
        }
        Err(err) => {
            log::error!("Failed to load customer {customer_id}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/customers/add")]
pub async fn add_customer(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddCustomerForm>,
) -> impl Responder {
    match create_customer(repo.get_ref(), user.as_ref(), form.into_inner()) {
        Ok(customer) => {
            FlashMessage::success(format!("Customer \"{}\" added.", customer.name)).send();
            redirect(&format!("/customer/{}/", customer.id))
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to add a customer: {err}");
            FlashMessage::error("Failed to add the customer.").send();
            redirect("/")
        }
    }
}

#[post("/customer/{customer_id}/delete")]
pub async fn delete_customer(
    customer_id: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let customer_id = customer_id.into_inner();

    match remove_customer(repo.get_ref(), user.as_ref(), customer_id) {
        Ok(()) => {
            FlashMessage::success("Customer deleted. Their orders were kept.").send();
            redirect("/")
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Customer not found.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to delete customer {customer_id}: {err}");
            FlashMessage::error("Failed to delete the customer.").send();
            redirect("/")
        }
    }
}
