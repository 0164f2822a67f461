use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub paging: PagingConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Seed demo cards into the in-memory store at startup.
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    pub default_size: i64,
    /// Requested page sizes above this are clamped, bounding per-request work.
    pub max_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection URL; the in-memory store is used when unset.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("CARD_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("CARD_SEED_DEMO") {
            self.server.seed_demo_data = matches!(v.as_str(), "1" | "true" | "yes");
        }

        // Paging overrides
        if let Ok(v) = env::var("PAGING_DEFAULT_SIZE") {
            self.paging.default_size = v.parse().unwrap_or(self.paging.default_size);
        }
        if let Ok(v) = env::var("PAGING_MAX_SIZE") {
            self.paging.max_size = v.parse().unwrap_or(self.paging.max_size);
        }

        // Database overrides; an empty DATABASE_URL means "no database configured"
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = if v.is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                seed_demo_data: false,
            },
            paging: PagingConfig {
                default_size: 20,
                max_size: 1000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                seed_demo_data: false,
            },
            paging: PagingConfig {
                default_size: 20,
                max_size: 500,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                seed_demo_data: false,
            },
            paging: PagingConfig {
                default_size: 20,
                max_size: 100,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
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
