use std::env;
use std::fmt;

use auth::HashingCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: HashingCost,
    pub log: LogConfig,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

// The url usually embeds credentials.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Flat variables: JWT_SECRET_KEY, DATABASE_URL, PORT, LOG_LEVEL, LOG_FORMATTER
    /// 2. Prefixed variables (ACCOUNT__DATABASE__URL, ACCOUNT__SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    /// 5. Built-in defaults
    ///
    /// # Errors
    /// * `ConfigError` - A source failed to parse, or the signing secret or
    ///   database url is missing or blank
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let cost = HashingCost::default();

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080)?
            .set_default("server.request_timeout_secs", 10)?
            .set_default("server.shutdown_timeout_secs", 5)?
            .set_default("server.cors_allowed_origins", vec!["http://localhost:5173"])?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.issuer", "account-service")?
            .set_default("password.memory_kib", i64::from(cost.memory_kib))?
            .set_default("password.iterations", i64::from(cost.iterations))?
            .set_default("password.parallelism", i64::from(cost.parallelism))?
            .set_default("log.level", "account_service=info,tower_http=info")?
            .set_default("log.format", "text")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: ACCOUNT__DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::with_prefix("ACCOUNT")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("jwt.secret", env::var("JWT_SECRET_KEY").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("server.http_port", env::var("PORT").ok())?
            .set_override_option("log.level", env::var("LOG_LEVEL").ok())?
            .set_override_option("log.format", env::var("LOG_FORMATTER").ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT_SECRET_KEY)".to_string(),
            ));
        }

        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "database.url must be set (DATABASE_URL)".to_string(),
            ));
        }

        // Credentialed CORS cannot use a wildcard origin.
        if self
            .server
            .cors_allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
        {
            return Err(ConfigError::Message(
                "server.cors_allowed_origins must list explicit origins, not \"*\"".to_string(),
            ));
        }

        Ok(())
    }
}
