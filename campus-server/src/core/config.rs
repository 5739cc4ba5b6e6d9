//! 服务器配置 / server configuration
//!
//! Environment variables:
//!
//! | Variable            | Default           | 说明                          |
//! |---------------------|-------------------|-------------------------------|
//! | `WORK_DIR`          | `/var/lib/campus` | 数据目录 data directory       |
//! | `HTTP_PORT`         | `3000`            | listen port                   |
//! | `ENVIRONMENT`       | `development`     | `development` / `production`  |
//! | `DATABASE_PATH`     | `<WORK_DIR>/campus.db` | SQLite file override     |
//! | `LOG_DIR`           | unset             | daily log files when set      |
//! | `LOG_LEVEL`         | `info`            | tracing filter                |
//! | `JWT_SECRET`        | generated in dev  | required in production        |
//! | `JWT_EXPIRATION_MINUTES` | `480`        | token lifetime                |

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub http_port: u16,
    pub environment: String,
    pub database_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("/var/lib/campus"),
            http_port: 3000,
            environment: "development".to_string(),
            database_path: None,
            log_dir: None,
        }
    }
}

impl Config {
    /// Read configuration from the environment, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            http_port: env::var("HTTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_port),
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            database_path: env::var("DATABASE_PATH").ok().map(PathBuf::from),
            log_dir: env::var("LOG_DIR").ok().map(PathBuf::from),
        }
    }

    /// Test helper: defaults with selective overrides.
    pub fn with_overrides(
        work_dir: Option<PathBuf>,
        http_port: Option<u16>,
        database_path: Option<PathBuf>,
    ) -> Self {
        let mut config = Self::default();
        if let Some(dir) = work_dir {
            config.work_dir = dir;
        }
        if let Some(port) = http_port {
            config.http_port = port;
        }
        config.database_path = database_path;
        config
    }

    /// Effective SQLite file location.
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| self.work_dir.join("campus.db"))
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        !self.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.http_port, 3000);
        assert!(config.is_development());
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/campus/campus.db")
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::with_overrides(
            Some(PathBuf::from("/tmp/x")),
            Some(8080),
            Some(PathBuf::from("/tmp/x/other.db")),
        );
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database_path(), PathBuf::from("/tmp/x/other.db"));
    }
}
