use std::env;

/// Runtime settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Cookie signing key material; a random key is generated when absent.
    pub secret: Option<String>,
    pub domain: String,
    pub templates_dir: String,
    /// Account created at start-up when it does not exist yet.
    pub admin: Option<AdminBootstrap>,
}

#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT").unwrap_or("8080".to_string());
        let port = port.parse::<u16>().unwrap_or(8080);

        let admin = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) if !username.trim().is_empty() => Some(AdminBootstrap {
                email: env::var("ADMIN_EMAIL").unwrap_or_default(),
                username,
                password,
            }),
            _ => None,
        };

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or("app.db".to_string()),
            address: env::var("ADDRESS").unwrap_or("127.0.0.1".to_string()),
            port,
            secret: env::var("SECRET_KEY").ok().filter(|key| !key.is_empty()),
            domain: env::var("DOMAIN").unwrap_or("localhost".to_string()),
            templates_dir: env::var("TEMPLATES_DIR").unwrap_or("templates".to_string()),
            admin,
        }
    }
}
