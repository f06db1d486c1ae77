use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub auth_provider: AuthProviderConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HS256 secret for session tokens. Empty means "not configured" and all
    /// session operations fail closed.
    pub session_secret: String,
    /// Session cookie lifetime. The product contract is 7 days.
    pub session_cookie_days: i64,
    /// `Secure` attribute on the session cookie. On everywhere except local
    /// development.
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthProviderConfig {
    /// Base URL of the external authentication service.
    pub base_url: String,
    /// Service api key sent on every provider request.
    pub api_key: String,
    /// Where the magic-link callback lands.
    pub magic_link_redirect: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        if let Ok(v) = env::var("API_ENABLE_CORS") {
            self.api.enable_cors = v.parse().unwrap_or(self.api.enable_cors);
        }
        if let Ok(v) = env::var("API_CORS_ORIGINS") {
            self.api.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE_DAYS") {
            self.security.session_cookie_days = v.parse().unwrap_or(self.security.session_cookie_days);
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }

        if let Ok(v) = env::var("AUTH_PROVIDER_URL") {
            self.auth_provider.base_url = v;
        }
        if let Ok(v) = env::var("AUTH_PROVIDER_API_KEY") {
            self.auth_provider.api_key = v;
        }
        if let Ok(v) = env::var("AUTH_MAGIC_LINK_REDIRECT") {
            self.auth_provider.magic_link_redirect = v;
        }

        self
    }

    pub(crate) fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            api: ApiConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                enable_request_logging: true,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_cookie_days: 7,
                secure_cookies: false,
            },
            auth_provider: AuthProviderConfig {
                base_url: "http://localhost:9999".to_string(),
                api_key: String::new(),
                magic_link_redirect: "http://localhost:5173/auth/callback".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            api: ApiConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.admin.example.com".to_string()],
                enable_request_logging: true,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_cookie_days: 7,
                secure_cookies: true,
            },
            auth_provider: AuthProviderConfig {
                base_url: String::new(),
                api_key: String::new(),
                magic_link_redirect: "https://staging.admin.example.com/auth/callback".to_string(),
            },
        }
    }

    pub(crate) fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            api: ApiConfig {
                enable_cors: true,
                cors_origins: vec!["https://admin.example.com".to_string()],
                enable_request_logging: false,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_cookie_days: 7,
                secure_cookies: true,
            },
            auth_provider: AuthProviderConfig {
                base_url: String::new(),
                api_key: String::new(),
                magic_link_redirect: "https://admin.example.com/auth/callback".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert!(!config.security.secure_cookies);
        assert_eq!(config.security.session_cookie_days, 7);
        assert!(config.api.enable_cors);
    }

    #[test]
    fn production_hardens_cookies() {
        let config = AppConfig::production();
        assert!(config.security.secure_cookies);
        assert_eq!(config.security.session_cookie_days, 7);
        assert!(!config.database.enable_query_logging);
    }
}
