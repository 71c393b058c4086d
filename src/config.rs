use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use std::env;
use std::str::FromStr;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Answer failures with HTTP 200 and the error envelope, for clients
    /// that only look at the body.
    pub uniform_error_status: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; when set, the discrete fields below are ignored.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub name: String,
    pub table: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from `APP_CONFIG` (or `config/config.yaml`), layered
    /// under `APP_*` environment variables.
    pub fn load() -> Result<Self> {
        let path = env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self> {
        tracing::info!("Loading configuration from: {}", path);

        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000_i64)?
            .set_default("server.uniform_error_status", false)?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432_i64)?
            .set_default("database.name", "postgres")?
            .set_default("database.table", "bus_data_v1")?
            .set_default("database.max_connections", 10_i64)?
            .set_default("database.acquire_timeout_secs", 5_i64)?
            .set_default("logging.level", "info")?
            .add_source(config::File::new(path, config::FileFormat::Yaml).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;

        if let Ok(url) = env::var("DATABASE_URL") {
            cfg.database.url = Some(url);
        }

        cfg.database.validate()?;
        Ok(cfg)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    /// The table name ends up in SQL text, so only plain identifiers pass.
    pub fn validate(&self) -> Result<()> {
        let parts: Vec<&str> = self.table.split('.').collect();
        if parts.len() > 2 || !parts.iter().all(|p| is_identifier(p)) {
            return Err(AppError::Config(format!(
                "database.table must be an identifier or schema.table, got '{}'",
                self.table
            )));
        }
        if self.max_connections == 0 {
            return Err(AppError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return Ok(PgConnectOptions::from_str(url)?);
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name);
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Sets environment variables and restores the previous values on drop,
    /// so a failing assertion cannot leak them into other tests.
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn new() -> Self {
            Self { saved: Vec::new() }
        }

        fn set(&mut self, key: &'static str, value: &str) {
            self.saved.push((key, env::var(key).ok()));
            env::set_var(key, value);
        }

        fn unset(&mut self, key: &'static str) {
            self.saved.push((key, env::var(key).ok()));
            env::remove_var(key);
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in self.saved.drain(..).rev() {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    fn write_config(name: &str, contents: &str) -> String {
        let path = env::temp_dir().join(format!("{}-{}.yaml", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn database(table: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: None,
            password: None,
            name: "test".to_string(),
            table: table.to_string(),
            max_connections: 5,
            acquire_timeout_secs: 1,
        }
    }

    #[test]
    #[serial]
    fn test_defaults_apply_without_file() {
        let mut env_guard = EnvGuard::new();
        env_guard.unset("DATABASE_URL");
        env_guard.unset("APP_SERVER__PORT");
        let cfg = Config::load_from("/nonexistent/bus-temperature.yaml").unwrap();

        assert_eq!(cfg.server.port, 8000);
        assert!(!cfg.server.uniform_error_status);
        assert_eq!(cfg.database.table, "bus_data_v1");
        assert_eq!(cfg.database.url, None);
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    #[serial]
    fn test_yaml_and_env_override() {
        let path = write_config(
            "bus-temperature-config",
            r#"
server:
  port: 9000
  uniform_error_status: true
database:
  host: "db.internal"
  name: "telemetry"
  table: "public.bus_data_v2"
"#,
        );

        let mut env_guard = EnvGuard::new();
        env_guard.set("DATABASE_URL", "postgres://override@localhost/test");
        env_guard.set("APP_SERVER__PORT", "9100");

        let cfg = Config::load_from(&path);
        std::fs::remove_file(&path).ok();
        let cfg = cfg.unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert!(cfg.server.uniform_error_status);
        assert_eq!(cfg.database.host, "db.internal");
        assert_eq!(cfg.database.table, "public.bus_data_v2");
        assert_eq!(
            cfg.database.url.as_deref(),
            Some("postgres://override@localhost/test")
        );
    }

    #[test]
    #[serial]
    fn test_env_prefix_takes_single_underscore() {
        let mut env_guard = EnvGuard::new();
        env_guard.unset("DATABASE_URL");
        env_guard.set("APP_SERVER__PORT", "9100");
        env_guard.set("APP_DATABASE__TABLE", "telemetry.bus_data_v3");
        env_guard.set("APP_SERVER__UNIFORM_ERROR_STATUS", "true");

        let cfg = Config::load_from("/nonexistent/bus-temperature.yaml").unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.database.table, "telemetry.bus_data_v3");
        assert!(cfg.server.uniform_error_status);
    }

    #[test]
    fn test_table_name_must_be_identifier() {
        assert!(database("bus_data_v1").validate().is_ok());
        assert!(database("telemetry.bus_data_v1").validate().is_ok());
        assert!(database("bus_data; DROP TABLE x").validate().is_err());
        assert!(database("a.b.c").validate().is_err());
        assert!(database("1table").validate().is_err());
        assert!(database("").validate().is_err());
    }

    #[test]
    fn test_connect_options_from_parts() {
        let mut db = database("bus_data_v1");
        db.user = Some("postgres".to_string());
        let options = db.connect_options().unwrap();
        assert_eq!(options.get_host(), "localhost");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_database(), Some("test"));
    }

    #[test]
    fn test_connect_options_rejects_bad_url() {
        let mut db = database("bus_data_v1");
        db.url = Some("not a url".to_string());
        assert!(db.connect_options().is_err());
    }
}
