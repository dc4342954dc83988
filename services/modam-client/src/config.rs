//! Configuration types and loading
//!
//! Precedence: `--config` flag > `CONFIG_PATH` env var > `modam-client.toml`.
//! `MODAM_BASE_URL` overrides the API base URL from the file. The login
//! password comes only from `MODAM_PASSWORD`, never from the TOML or argv.

use common::Secret;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Remote API settings
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Network-wide request timeout
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

/// Where the session credentials live
#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("credentials.json")
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        if let Ok(url) = std::env::var("MODAM_BASE_URL") {
            config.api.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> common::Result<()> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if !self.api.login_path.starts_with('/') {
            return Err(common::Error::Config(format!(
                "login_path must start with '/', got: {}",
                self.api.login_path
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("modam-client.toml")
    }
}

/// Read the login password from `MODAM_PASSWORD`.
pub fn password_from_env() -> common::Result<Secret<String>> {
    match std::env::var("MODAM_PASSWORD") {
        Ok(p) if !p.is_empty() => Ok(Secret::new(p)),
        _ => Err(common::Error::Config(
            "MODAM_PASSWORD must be set to log in".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that mutate environment variables.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// SAFETY: Callers must hold ENV_MUTEX to prevent concurrent env mutation.
    unsafe fn set_env(key: &str, val: &str) {
        unsafe { std::env::set_var(key, val) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("modam-client.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("MODAM_BASE_URL") };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\nbase_url = \"https://api.example.com\"\n");

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://api.example.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.api.login_path, "/auth/login");
        assert_eq!(config.store.path, PathBuf::from("credentials.json"));
    }

    #[test]
    fn full_config_is_read() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("MODAM_BASE_URL") };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
[api]
base_url = "http://127.0.0.1:3000"
timeout_secs = 3
login_path = "/v1/login"

[store]
path = "/var/lib/modam/session.json"
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.api.login_path, "/v1/login");
        assert_eq!(
            config.store.path,
            PathBuf::from("/var/lib/modam/session.json")
        );
    }

    #[test]
    fn env_overrides_base_url() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\nbase_url = \"https://api.example.com\"\n");

        unsafe { set_env("MODAM_BASE_URL", "http://localhost:8080") };
        let config = Config::load(&path);
        unsafe { remove_env("MODAM_BASE_URL") };

        assert_eq!(config.unwrap().api.base_url, "http://localhost:8080");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("MODAM_BASE_URL") };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "[api]\nbase_url = \"ftp://api.example.com\"\n");

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("base_url"), "got: {err}");
    }

    #[test]
    fn rejects_zero_timeout() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("MODAM_BASE_URL") };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[api]\nbase_url = \"https://api.example.com\"\ntimeout_secs = 0\n",
        );

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs"), "got: {err}");
    }

    #[test]
    fn rejects_relative_login_path() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("MODAM_BASE_URL") };
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "[api]\nbase_url = \"https://api.example.com\"\nlogin_path = \"auth/login\"\n",
        );

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn missing_file_and_bad_toml_fail() {
        assert!(matches!(
            Config::load(Path::new("/nonexistent/modam-client.toml")),
            Err(common::Error::Io(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "not valid {{{{ toml");
        assert!(matches!(Config::load(&path), Err(common::Error::Toml(_))));
    }

    #[test]
    fn resolve_path_precedence() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { set_env("CONFIG_PATH", "/etc/modam/env.toml") };
        assert_eq!(
            Config::resolve_path(Some("/tmp/cli.toml")),
            PathBuf::from("/tmp/cli.toml")
        );
        assert_eq!(
            Config::resolve_path(None),
            PathBuf::from("/etc/modam/env.toml")
        );
        unsafe { remove_env("CONFIG_PATH") };
        assert_eq!(
            Config::resolve_path(None),
            PathBuf::from("modam-client.toml")
        );
    }

    #[test]
    fn password_comes_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        unsafe { remove_env("MODAM_PASSWORD") };
        assert!(password_from_env().is_err());

        unsafe { set_env("MODAM_PASSWORD", "correct horse") };
        let password = password_from_env().unwrap();
        unsafe { remove_env("MODAM_PASSWORD") };
        assert_eq!(password.expose_str(), "correct horse");
    }
}
