use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:4200";

/// Process configuration, read once at startup and passed explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub cors_allowed_origins: Vec<String>,
    pub enable_hsts: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8000);

        let jwt_secret =
            env::var("SECRET_KEY").unwrap_or_else(|_| "insecure-dev-secret".to_string());

        let token_ttl_hours = env::var("ACCESS_TOKEN_EXPIRE_HOURS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(3);

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let enable_hsts = env::var("RUST_ENV")
            .map(|value| value.to_lowercase() == "production")
            .unwrap_or(false);

        Self {
            port,
            jwt_secret,
            token_ttl_hours,
            cors_allowed_origins,
            enable_hsts,
        }
    }
}
