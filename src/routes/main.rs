use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, deny, render_template};
use crate::services::ServiceError;
use crate::services::dashboard::load_dashboard;

#[get("/")]
pub async fn show_dashboard(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_dashboard(repo.get_ref(), user.as_ref()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "dashboard");
            context.insert("stats", &data.stats);
            context.insert("customers", &data.customers);
            context.insert("orders", &data.recent_orders);
            render_template(&tera, "main/index.html", &context)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(err) => {
            log::error!("Failed to load dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
