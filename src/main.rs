use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use crm_dashboard::config::ServerConfig;
use crm_dashboard::db::{establish_connection_pool, run_migrations};
use crm_dashboard::repository::DieselRepository;
use crm_dashboard::routes;
use crm_dashboard::services::auth::ensure_admin;

fn signing_key(secret: Option<&str>) -> Key {
    match secret.map(|secret| Key::try_from(secret.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(err)) => {
            log::warn!("SECRET_KEY is unusable ({err}); using a random key for this run");
            Key::generate()
        }
        None => {
            log::warn!("SECRET_KEY is not set; sessions will not survive a restart");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();
    let secret_key = signing_key(config.secret.as_deref());

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);

    if let Some(admin) = &config.admin {
        match ensure_admin(&repo, admin) {
            Ok(true) => log::info!("Created admin account {}", admin.username),
            Ok(false) => log::info!("Admin account {} already exists", admin.username),
            Err(e) => {
                log::error!("Failed to create admin account {}: {e}", admin.username);
                std::process::exit(1);
            }
        }
    }

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = match Tera::new(&format!("{}/**/*", config.templates_dir)) {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };

    // Browsers drop cookies scoped to a bare `localhost` domain.
    let cookie_domain = Some(config.domain.clone()).filter(|domain| domain != "localhost");
    log::info!("Listening on {}:{}", config.address, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(cookie_domain.clone())
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(routes::configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
    })
    .bind((config.address.as_str(), config.port))?
    .run()
    .await
}
