//! HTTP handlers and the helpers they share.

use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tera::{Context, Tera};

use crate::ADMIN_ROLE;
use crate::domain::access::DenyReason;
use crate::domain::auth::AuthenticatedUser;

pub mod auth;
pub mod customers;
pub mod main;
pub mod orders;
pub mod products;
pub mod tags;
pub mod user;

/// Register every page handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(main::show_dashboard)
        .service(auth::show_register)
        .service(auth::register)
        .service(auth::show_login)
        .service(auth::login_user)
        .service(auth::logout_get)
        .service(auth::logout_post)
        .service(user::show_user)
        .service(customers::show_customer)
        .service(customers::add_customer)
        .service(customers::delete_customer)
        .service(orders::show_create_order)
        .service(orders::create_order)
        .service(orders::show_update_order)
        .service(orders::submit_update_order)
        .service(orders::show_delete_order)
        .service(orders::delete_order)
        .service(products::show_products)
        .service(products::add_product)
        .service(products::upload_products)
        .service(products::delete_product)
        .service(tags::show_tags)
        .service(tags::add_tag)
        .service(tags::delete_tag);
}

/// Flash message as exposed to templates.
#[derive(Debug, Serialize)]
struct Alert<'a> {
    level: &'static str,
    content: &'a str,
}

fn alert_level(level: Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

/// `302 Found` pointing at `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Render `template` or answer `500` when rendering fails.
pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Context shared by every page: flash messages, the current user and the active menu entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    current_page: &str,
) -> Context {
    let alerts: Vec<Alert<'_>> = flash_messages
        .iter()
        .map(|message| Alert {
            level: alert_level(message.level()),
            content: message.content(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", &user);
    context.insert(
        "is_admin",
        &user.is_some_and(|user| user.has_role(ADMIN_ROLE)),
    );
    context.insert("current_page", current_page);
    context
}

/// Redirect a request the access policy turned away.
pub fn deny(reason: DenyReason) -> HttpResponse {
    if let Some(message) = reason.message() {
        FlashMessage::warning(message).send();
    }
    redirect(reason.redirect_to())
}

/// URL-encoded form extractor that understands repeated keys (`a=1&a=2`).
pub struct HtmlForm<T>(pub T);

impl<T> HtmlForm<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for HtmlForm<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Bytes::from_request(req, payload);

        Box::pin(async move {
            let body = body.await?;
            serde_html_form::from_bytes::<T>(&body)
                .map(HtmlForm)
                .map_err(|err| {
                    log::warn!("Rejected malformed form payload: {err}");
                    actix_web::error::ErrorBadRequest(err)
                })
        })
    }
}
