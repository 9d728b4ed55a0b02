use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Secret used when nothing else is configured. Fine for local hacking only.
pub const DEFAULT_SECRET_KEY: &str = "dev-secret-change-me";

const DEFAULT_POSTS_PER_PAGE: u32 = 5;
const MAX_POSTS_PER_PAGE: u32 = 100;
const DEFAULT_SESSION_TTL_DAYS: i64 = 14;
const MAX_SESSION_TTL_DAYS: i64 = 3650;
const DEFAULT_BCRYPT_COST: u32 = 12;

/// Configuration problems detected after loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error("{field} out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("secret_key cannot be empty")]
    EmptySecret,
}

/// Centralized configuration for the blog server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlogConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub secret_key: String,
    pub posts_per_page: u32,
    pub session_ttl_days: i64,
    pub bcrypt_cost: u32,
    /// Mark cookies `Secure` (enable behind TLS)
    pub secure_cookies: bool,
    pub log_level: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database_path: config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("blog.db"),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            secure_cookies: false,
            log_level: "info".to_string(),
        }
    }
}

impl BlogConfig {
    /// Load config from `path` (or ~/.blogctl/config.toml), then apply
    /// environment overrides.
    ///
    /// A missing file is not an error: defaults are used. A file that exists
    /// but cannot be read or parsed is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// `load` with an explicit environment lookup.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_path);

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            debug!("Loaded config from {}", config_path.display());
            Self::from_toml_str(&content)?
        } else {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            Self::default()
        };

        config.apply_env_with(lookup)?;
        config.validate()?;

        Ok(config)
    }

    /// Parse config from TOML. Unset keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file (invalid TOML)")
    }

    /// Get config file path: ~/.blogctl/config.toml
    pub fn config_path() -> PathBuf {
        config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Apply overrides from an environment-like lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("BLOGCTL_BIND") {
            self.bind_addr = parse_env("BLOGCTL_BIND", v)?;
        }
        if let Some(v) = lookup("BLOGCTL_DATABASE") {
            self.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SECRET_KEY") {
            self.secret_key = v;
        }
        if let Some(v) = lookup("BLOGCTL_POSTS_PER_PAGE") {
            self.posts_per_page = parse_env("BLOGCTL_POSTS_PER_PAGE", v)?;
        }
        if let Some(v) = lookup("BLOGCTL_SESSION_TTL_DAYS") {
            self.session_ttl_days = parse_env("BLOGCTL_SESSION_TTL_DAYS", v)?;
        }
        if let Some(v) = lookup("BLOGCTL_BCRYPT_COST") {
            self.bcrypt_cost = parse_env("BLOGCTL_BCRYPT_COST", v)?;
        }
        if let Some(v) = lookup("BLOGCTL_SECURE_COOKIES") {
            self.secure_cookies = match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "BLOGCTL_SECURE_COOKIES",
                        value: v,
                    })
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret_key.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if !(1..=MAX_POSTS_PER_PAGE).contains(&self.posts_per_page) {
            return Err(ConfigError::OutOfRange {
                field: "posts_per_page",
                reason: format!("must be between 1 and {}", MAX_POSTS_PER_PAGE),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::OutOfRange {
                field: "bcrypt_cost",
                reason: "must be between 4 and 31".to_string(),
            });
        }
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&self.session_ttl_days) {
            return Err(ConfigError::OutOfRange {
                field: "session_ttl_days",
                reason: format!("must be between 1 and {}", MAX_SESSION_TTL_DAYS),
            });
        }
        Ok(())
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Write config to `path` as pretty TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(path, toml_str)
            .context(format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

/// Get the blogctl config directory path (~/.blogctl)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".blogctl"))
}

/// Load environment variables from .env files.
///
/// Priority order (highest to lowest):
/// 1. Variables already set in the environment
/// 2. Current directory .env
/// 3. ~/.blogctl/.env
pub fn load_dotenv() -> Result<()> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(format!("current directory ({})", path.display()));
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            // dotenvy doesn't overwrite existing vars
            match dotenvy::from_path(&env_file) {
                Ok(_) => loaded_from.push(format!("~/.blogctl/.env ({})", env_file.display())),
                Err(e) => debug!("Failed to load ~/.blogctl/.env: {}", e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found (current dir or ~/.blogctl)");
    } else {
        info!("Loaded environment from: {}", loaded_from.join(", "));
    }

    Ok(())
}
