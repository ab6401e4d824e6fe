use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crm_dashboard::config::AdminBootstrap;
use crm_dashboard::repository::{CustomerReader, DieselRepository};
use crm_dashboard::routes;
use crm_dashboard::services::auth::ensure_admin;

mod common;

async fn init_app(
    repo: DieselRepository,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let key = Key::generate();
    let message_store = CookieMessageStore::builder(key.clone()).build();
    let tera = Tera::new("templates/**/*").expect("templates parse");

    test::init_service(
        App::new()
            .wrap(FlashMessagesFramework::builder(message_store).build())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key)
                    .cookie_secure(false)
                    .build(),
            )
            .configure(routes::configure)
            .app_data(web::Data::new(tera))
            .app_data(web::Data::new(repo)),
    )
    .await
}

fn location(response: &ServiceResponse) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Cookies a browser would keep: removal cookies (empty, `Max-Age=0`) are dropped.
fn cookies(response: &ServiceResponse) -> Vec<Cookie<'static>> {
    response
        .response()
        .cookies()
        .filter(|cookie| !cookie.value().is_empty())
        .filter(|cookie| cookie.max_age() != Some(Duration::ZERO))
        .map(|cookie| cookie.into_owned())
        .collect()
}

fn with_cookies(mut request: test::TestRequest, cookies: &[Cookie<'static>]) -> test::TestRequest {
    for cookie in cookies {
        request = request.cookie(cookie.clone());
    }
    request
}

async fn log_in<S>(
    app: &S,
    username: &str,
    password: &str,
    landing_page: &str,
) -> Vec<Cookie<'static>>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/login/")
        .set_form([("username", username), ("password", password)])
        .to_request();
    let response = test::call_service(app, request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some(landing_page));
    cookies(&response)
}

#[actix_web::test]
async fn anonymous_dashboard_redirects_to_login() {
    let test_db = common::TestDb::new("routes_anonymous_dashboard.db");
    let app = init_app(DieselRepository::new(test_db.pool())).await;

    let response = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/login/"));
}

#[actix_web::test]
async fn login_page_renders() {
    let test_db = common::TestDb::new("routes_login_page.db");
    let app = init_app(DieselRepository::new(test_db.pool())).await;

    let response =
        test::call_service(&app, test::TestRequest::get().uri("/login/").to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = test::read_body(response).await;
    assert!(String::from_utf8_lossy(&body).contains("name=\"password\""));
}

#[actix_web::test]
async fn registered_customer_lands_on_user_page() {
    let test_db = common::TestDb::new("routes_registered_customer.db");
    let repo = DieselRepository::new(test_db.pool());
    let app = init_app(repo.clone()).await;

    let request = test::TestRequest::post()
        .uri("/register/")
        .set_form([
            ("username", "jane"),
            ("email", "jane@example.com"),
            ("password1", "s3cret-pass"),
            ("password2", "s3cret-pass"),
        ])
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/login/"));
    assert_eq!(repo.count_customers().unwrap(), 1);

    let session = log_in(&app, "jane", "s3cret-pass", "/user/").await;

    let dashboard = with_cookies(test::TestRequest::get().uri("/"), &session).to_request();
    let response = test::call_service(&app, dashboard).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/user/"));

    let user_page = with_cookies(test::TestRequest::get().uri("/user/"), &session).to_request();
    let response = test::call_service(&app, user_page).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = test::read_body(response).await;
    assert!(String::from_utf8_lossy(&body).contains("jane"));
}

#[actix_web::test]
async fn register_with_mismatched_passwords_rerenders_form() {
    let test_db = common::TestDb::new("routes_register_mismatch.db");
    let repo = DieselRepository::new(test_db.pool());
    let app = init_app(repo.clone()).await;

    let request = test::TestRequest::post()
        .uri("/register/")
        .set_form([
            ("username", "jane"),
            ("email", "jane@example.com"),
            ("password1", "s3cret-pass"),
            ("password2", "other-pass"),
        ])
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = test::read_body(response).await;
    assert!(String::from_utf8_lossy(&body).contains("didn&#x27;t match"));
    assert_eq!(repo.count_customers().unwrap(), 0);
}

#[actix_web::test]
async fn admin_sees_dashboard_and_adds_customer() {
    let test_db = common::TestDb::new("routes_admin_dashboard.db");
    let repo = DieselRepository::new(test_db.pool());
    ensure_admin(
        &repo,
        &AdminBootstrap {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: "admin-pass".into(),
        },
    )
    .unwrap();
    let app = init_app(repo.clone()).await;

    let session = log_in(&app, "admin", "admin-pass", "/").await;

    let dashboard = with_cookies(test::TestRequest::get().uri("/"), &session).to_request();
    let response = test::call_service(&app, dashboard).await;
    assert_eq!(response.status(), StatusCode::OK);

    let add = with_cookies(test::TestRequest::post().uri("/customers/add"), &session)
        .set_form([("name", "Acme"), ("phone", "555-0100"), ("email", "")])
        .to_request();
    let response = test::call_service(&app, add).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let customers = repo.list_customers().unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Acme");

    let missing = with_cookies(test::TestRequest::get().uri("/update_order/999/"), &session)
        .to_request();
    let response = test::call_service(&app, missing).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), Some("/"));
}
