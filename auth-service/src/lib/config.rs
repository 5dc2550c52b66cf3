use std::env;
use std::time::Duration;

use auth::HashCost;
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
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
}

/// Argon2 cost applied to every new password digest
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl JwtConfig {
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_ttl_minutes)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.refresh_token_ttl_days)
    }
}

impl PasswordConfig {
    pub fn hash_cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.memory_kib,
            iterations: self.iterations,
            parallelism: self.parallelism,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults for everything except the database url and secret
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let default_cost = HashCost::default();

        let configuration = ConfigBuilder::builder()
            .set_default("database.max_connections", 5)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("server.http_port", 8080)?
            .set_default("jwt.access_token_ttl_minutes", 60)?
            .set_default("jwt.refresh_token_ttl_days", 7)?
            .set_default("password.memory_kib", default_cost.memory_kib)?
            .set_default("password.iterations", default_cost.iterations)?
            .set_default("password.parallelism", default_cost.parallelism)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "secret".to_string(),
            access_token_ttl_minutes: 60,
            refresh_token_ttl_days: 7,
        }
    }

    #[test]
    fn test_token_lifetimes() {
        let jwt = jwt_config();

        assert_eq!(jwt.access_token_ttl(), chrono::Duration::hours(1));
        assert_eq!(jwt.refresh_token_ttl(), chrono::Duration::days(7));
    }

    #[test]
    fn test_environment_overrides_files() {
        std::env::set_var("JWT__SECRET", "from-environment-secret");
        std::env::set_var("SERVER__HTTP_PORT", "9090");

        let config = Config::load().expect("Failed to load configuration");

        std::env::remove_var("JWT__SECRET");
        std::env::remove_var("SERVER__HTTP_PORT");

        assert_eq!(config.jwt.secret, "from-environment-secret");
        assert_eq!(config.server.http_port, 9090);
    }

    #[test]
    fn test_hash_cost() {
        let password = PasswordConfig {
            memory_kib: 4096,
            iterations: 3,
            parallelism: 2,
        };

        assert_eq!(
            password.hash_cost(),
            HashCost {
                memory_kib: 4096,
                iterations: 3,
                parallelism: 2
            }
        );
    }
}
