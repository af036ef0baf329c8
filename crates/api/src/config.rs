//! Server configuration loaded from the environment.

use crate::auth::jwt::JwtConfig;

/// Runtime configuration for the API server.
///
/// | Variable               | Default                 | Meaning                   |
/// |------------------------|-------------------------|---------------------------|
/// | `HOST`                 | `0.0.0.0`               | Bind address              |
/// | `PORT`                 | `3000`                  | Bind port                 |
/// | `CORS_ORIGINS`         | `http://localhost:5173` | Comma-separated origins   |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    | Per-request timeout       |
///
/// JWT settings are documented on [`JwtConfig`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from the environment. Panics on malformed values;
    /// call once at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a number");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a number");

        ServerConfig {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
        }
    }
}
