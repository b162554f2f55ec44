//! Server configuration: optional TOML file, overridden by environment.
//!
//! The file is `domus.toml` in the working directory unless `CONFIG_FILE`
//! names another. A missing default file is fine; a missing named file is
//! an error. Every key in the file has an environment variable of the same
//! name in upper case, and the environment wins.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::auth::AuthProviderKind;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_CONFIG_FILE: &str = "domus.toml";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
    #[error("invalid boolean for {key}: {value:?}")]
    InvalidBool { key: &'static str, value: String },
    #[error("invalid number for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("unknown AUTH_PROVIDER: {0:?} (expected `session` or `anonymous`)")]
    UnknownAuthProvider(String),
    #[error("cannot read config file {path}: {message}")]
    Read { path: PathBuf, message: String },
    #[error("invalid config file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Values from the config file. Absent keys fall back to defaults.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub cookie_secure: Option<bool>,
    pub dev_auth_bypass: Option<bool>,
    pub auth_provider: Option<String>,
    pub session_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub cookie_secure: bool,
    pub dev_auth_bypass: bool,
    pub auth_provider: AuthProviderKind,
    pub session_ttl: Duration,
}

impl Config {
    /// Build config from the config file and the process environment.
    ///
    /// Optional:
    /// - `CONFIG_FILE`: default `domus.toml`
    /// - `HOST`: default `0.0.0.0`
    /// - `PORT`: default 3000
    /// - `STATIC_DIR`: default `static`
    /// - `COOKIE_SECURE`: default false
    /// - `DEV_AUTH_BYPASS`: default false
    /// - `AUTH_PROVIDER`: `session` (default) or `anonymous`
    /// - `SESSION_TTL_SECS`: default 86400
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file is unreadable or malformed, or
    /// any variable is present but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// Read the config file named by `lookup("CONFIG_FILE")`, then apply
    /// `lookup` on top of it.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match lookup("CONFIG_FILE") {
            Some(path) => read_file_config(Path::new(&path))?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() { read_file_config(path)? } else { FileConfig::default() }
            }
        };
        Self::from_sources(file, lookup)
    }

    /// Merge file values with a key lookup; the lookup wins.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unparsable lookup values or an unknown
    /// auth provider name.
    pub fn from_sources<F>(file: FileConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").or(file.host).unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(raw) => parse_port(&raw)?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };
        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .or(file.static_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));
        let cookie_secure = parse_bool_var("COOKIE_SECURE", lookup("COOKIE_SECURE").as_deref())?
            .or(file.cookie_secure)
            .unwrap_or(false);
        let dev_auth_bypass = parse_bool_var("DEV_AUTH_BYPASS", lookup("DEV_AUTH_BYPASS").as_deref())?
            .or(file.dev_auth_bypass)
            .unwrap_or(false);
        let auth_provider = parse_auth_provider(lookup("AUTH_PROVIDER").or(file.auth_provider).as_deref())?;
        let session_ttl_secs = match lookup("SESSION_TTL_SECS") {
            Some(raw) => parse_number("SESSION_TTL_SECS", &raw)?,
            None => file.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS),
        };

        Ok(Self {
            host,
            port,
            static_dir,
            cookie_secure,
            dev_auth_bypass,
            auth_provider,
            session_ttl: Duration::from_secs(session_ttl_secs),
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            cookie_secure: false,
            dev_auth_bypass: false,
            auth_provider: AuthProviderKind::Session,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Read { path: path.to_owned(), message: e.to_string() })?;
    parse_file_config(&text).map_err(|message| ConfigError::Parse { path: path.to_owned(), message })
}

pub(crate) fn parse_file_config(text: &str) -> Result<FileConfig, String> {
    toml::from_str(text).map_err(|e| e.to_string())
}

/// Parse a loose boolean: `1/true/yes/on` or `0/false/no/off`.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_bool_var(key: &'static str, raw: Option<&str>) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    parse_bool(raw)
        .map(Some)
        .ok_or_else(|| ConfigError::InvalidBool { key, value: raw.to_owned() })
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw.to_owned()))
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value: raw.to_owned() })
}

fn parse_auth_provider(raw: Option<&str>) -> Result<AuthProviderKind, ConfigError> {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(AuthProviderKind::Session),
        Some(v) if v.is_empty() || v == "session" => Ok(AuthProviderKind::Session),
        Some(v) if v == "anonymous" => Ok(AuthProviderKind::Anonymous),
        Some(v) => Err(ConfigError::UnknownAuthProvider(v)),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
