use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, deny, render_template};
use crate::services::ServiceError;
use crate::services::auth::load_user_page;

#[get("/user/")]
pub async fn show_user(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_user_page(repo.get_ref(), user.as_ref()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "user");
            context.insert("customer", &data.customer);
            context.insert("orders", &data.orders);
            context.insert("stats", &data.stats);
            render_template(&tera, "user/index.html", &context)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(err) => {
            log::error!("Failed to load user page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
