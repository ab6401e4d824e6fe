use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::ADMIN_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::forms::auth::{LoginForm, PASSWORD_MIN_LEN, RegisterForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, deny, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{
    RegisterOutcome, RegisterPageData, ensure_anonymous, login, register_user,
};

fn render_register(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    page: &RegisterPageData,
) -> HttpResponse {
    let mut context = base_context(flash_messages, None, "register");
    context.insert("form", &page.form);
    context.insert("error", &page.error);
    context.insert("password_min_len", &PASSWORD_MIN_LEN);
    render_template(tera, "auth/register.html", &context)
}

#[get("/register/")]
pub async fn show_register(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match ensure_anonymous(user.as_ref()) {
        Ok(()) => render_register(&tera, &flash_messages, &RegisterPageData::default()),
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(err) => {
            log::error!("Failed to show registration page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/register/")]
pub async fn register(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    form: web::Form<RegisterForm>,
) -> impl Responder {
    match register_user(repo.get_ref(), user.as_ref(), form.into_inner()) {
        Ok(RegisterOutcome::Registered(user)) => {
            FlashMessage::success(format!(
                "Account created for {}. You can now log in.",
                user.username
            ))
            .send();
            redirect("/login/")
        }
        Ok(RegisterOutcome::Rejected(page)) => render_register(&tera, &flash_messages, &page),
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(err) => {
            log::error!("Failed to register user: {err}");
            FlashMessage::error("Registration failed. Please try again.").send();
            redirect("/register/")
        }
    }
}

#[get("/login/")]
pub async fn show_login(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match ensure_anonymous(user.as_ref()) {
        Ok(()) => {
            let context = base_context(&flash_messages, None, "login");
            render_template(&tera, "auth/login.html", &context)
        }
        Err(ServiceError::AccessDenied(reason)) => deny(reason),
        Err(err) => {
            log::error!("Failed to show login page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/login/")]
pub async fn login_user(
    request: HttpRequest,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    form: web::Form<LoginForm>,
) -> impl Responder {
    let authenticated = match login(repo.get_ref(), user.as_ref(), form.into_inner()) {
        Ok(authenticated) => authenticated,
        Err(ServiceError::AccessDenied(reason)) => return deny(reason),
        Err(ServiceError::InvalidCredentials) => {
            FlashMessage::info("Username or password is incorrect.").send();
            return redirect("/login/");
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            FlashMessage::error("Login failed. Please try again.").send();
            return redirect("/login/");
        }
    };

    let identity = match authenticated.to_identity() {
        Ok(identity) => identity,
        Err(err) => {
            log::error!("Failed to encode identity for {}: {err}", authenticated.username);
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(err) = Identity::login(&request.extensions(), identity) {
        log::error!("Failed to attach identity for {}: {err}", authenticated.username);
        return HttpResponse::InternalServerError().finish();
    }

    log::info!("User {} logged in", authenticated.username);
    redirect(landing_page(&authenticated))
}

/// Admins start on the dashboard, everyone else on their own orders.
fn landing_page(user: &AuthenticatedUser) -> &'static str {
    if user.has_role(ADMIN_ROLE) {
        "/"
    } else {
        "/user/"
    }
}

#[get("/logout/")]
pub async fn logout_get(identity: Option<Identity>) -> impl Responder {
    logout(identity)
}

#[post("/logout/")]
pub async fn logout_post(identity: Option<Identity>) -> impl Responder {
    logout(identity)
}

fn logout(identity: Option<Identity>) -> HttpResponse {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/login/")
}
