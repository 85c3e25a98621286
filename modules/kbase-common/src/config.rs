use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Drafting service
    pub anthropic_api_key: String,
    pub drafting_model: String,

    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Auth
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
}

const DEFAULT_DRAFTING_MODEL: &str = "claude-sonnet-4-5-20250929";

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            anthropic_api_key: required_env("ANTHROPIC_API_KEY"),
            drafting_model: env::var("DRAFTING_MODEL")
                .unwrap_or_else(|_| DEFAULT_DRAFTING_MODEL.to_string()),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
            jwt_secret: required_env("JWT_SECRET"),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: required_env("ADMIN_PASSWORD"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
