//! # configs
//!
//! Layered configuration for the leafboard binary: hard defaults, then an
//! optional `config/leafboard.toml`, then `LEAFBOARD__*` environment
//! variables (double underscore as the section separator, e.g.
//! `LEAFBOARD__SERVER__PORT=8080`).
//!
//! A `.env` file is honored before the environment source is read, so local
//! development matches the deployed container without exporting anything.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for verifying bearer tokens. The `dev` default exists so
    /// a fresh checkout boots; deployments override it via
    /// `LEAFBOARD__AUTH__JWT_SECRET`.
    pub jwt_secret: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Whether the `yours` listing includes the caller's own banned posts.
    /// Defaults to the stricter reading: it does not.
    pub mine_includes_banned: bool,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub forum: ForumConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("database.url", "sqlite:leafboard.db")?
            .set_default("database.max_connections", 10_i64)?
            .set_default("auth.jwt_secret", "dev")?
            .set_default("forum.mine_includes_banned", false)?
            .add_source(config::File::with_name("config/leafboard").required(false))
            .add_source(
                config::Environment::with_prefix("LEAFBOARD")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let app: AppConfig = cfg.try_deserialize()?;
        tracing::debug!(
            host = %app.server.host,
            port = app.server.port,
            database = %app.database.url,
            "configuration loaded"
        );
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_cover_every_section() {
        let cfg = AppConfig::load().expect("defaults should satisfy the schema");
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.auth.jwt_secret.expose_secret(), "dev");
        assert!(!cfg.forum.mine_includes_banned);
    }
}
