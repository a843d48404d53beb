use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub mailer: MailerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HS256 signing secret. Empty until JWT_SECRET is set; token issuance
    /// fails closed on an empty secret.
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub reset_token_ttl_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub address: String,
    pub password: String,
    /// Base URL of the web UI that activation/invite/reset links point into.
    pub ui_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, then specific env vars win
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }

        // API overrides
        if let Ok(v) = env::var("PORT") {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("RESET_TOKEN_TTL_MINUTES") {
            self.security.reset_token_ttl_minutes =
                v.parse().unwrap_or(self.security.reset_token_ttl_minutes);
        }

        // Mailer overrides
        if let Ok(v) = env::var("MAILER_HOST") {
            self.mailer.smtp_host = v;
        }
        if let Ok(v) = env::var("MAILER_PORT") {
            self.mailer.smtp_port = v.parse().unwrap_or(self.mailer.smtp_port);
        }
        if let Ok(v) = env::var("MAILER_ADDRESS") {
            self.mailer.address = v;
        }
        if let Ok(v) = env::var("MAILER_PASS") {
            self.mailer.password = v;
        }
        if let Ok(v) = env::var("UI_BASE_URL") {
            self.mailer.ui_base_url = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout_secs: 30,
            },
            api: ApiConfig {
                port: 4000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 48,
                reset_token_ttl_minutes: 10,
            },
            mailer: MailerConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                address: String::new(),
                password: String::new(),
                ui_base_url: "http://localhost:5173".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            api: ApiConfig {
                port: 4000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 48,
                reset_token_ttl_minutes: 10,
            },
            mailer: MailerConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                address: String::new(),
                password: String::new(),
                ui_base_url: "https://staging.projectify.example.com".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout_secs: 5,
            },
            api: ApiConfig {
                port: 4000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 48,
                reset_token_ttl_minutes: 10,
            },
            mailer: MailerConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                address: String::new(),
                password: String::new(),
                ui_base_url: "https://projectify.example.com".to_string(),
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
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.port, 4000);
        assert_eq!(config.security.jwt_expiry_hours, 48);
        assert_eq!(config.security.reset_token_ttl_minutes, 10);
        assert!(config.api.enable_request_logging);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.database.max_connections, 50);
        assert!(config.mailer.ui_base_url.starts_with("https://"));
    }
}
