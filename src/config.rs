//! Typed application settings read from the process environment.
//!
//! `main` loads a `.env` file first (via `dotenvy`), so every variable below can
//! also live there during development.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("SESSION_KEY must be at least 64 bytes long")]
    SessionKeyTooShort,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub pool_max_size: u32,
    /// Deadline for checking out a connection and for any single statement.
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        // OWASP minimum recommendation for Argon2id.
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    /// Receives a copy of every new order.
    pub admin_email: String,
}

impl EmailSettings {
    pub fn is_configured(&self) -> bool {
        !self.smtp_user.is_empty()
            && !self.smtp_password.is_empty()
            && !self.from_email.is_empty()
            && !self.admin_email.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database: DatabaseSettings,
    pub session_key: Option<Vec<u8>>,
    pub cookie_secure: bool,
    pub password: PasswordSettings,
    pub email: EmailSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| vars.get(name).filter(|v| !v.is_empty()).cloned();
        let or = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let session_key = match get("SESSION_KEY") {
            Some(key) if key.len() < 64 => return Err(ConfigError::SessionKeyTooShort),
            Some(key) => Some(key.into_bytes()),
            None => None,
        };

        let defaults = PasswordSettings::default();

        Ok(Self {
            host: or("HOST", "0.0.0.0"),
            port: parse(vars, "PORT", 8080)?,
            database: DatabaseSettings {
                url,
                pool_max_size: parse(vars, "DB_POOL_MAX_SIZE", 10)?,
                timeout: Duration::from_secs(parse(vars, "DB_TIMEOUT_SECS", 3)?),
            },
            session_key,
            cookie_secure: parse(vars, "COOKIE_SECURE", false)?,
            password: PasswordSettings {
                memory_kib: parse(vars, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse(vars, "ARGON2_ITERATIONS", defaults.iterations)?,
                parallelism: parse(vars, "ARGON2_PARALLELISM", defaults.parallelism)?,
            },
            email: EmailSettings {
                smtp_host: or("SMTP_HOST", "smtp.gmail.com"),
                smtp_port: parse(vars, "SMTP_PORT", 587)?,
                smtp_user: or("SMTP_USER", ""),
                smtp_password: or("SMTP_PASSWORD", ""),
                from_email: or("FROM_EMAIL", ""),
                from_name: or("FROM_NAME", "Transpalet Wheels"),
                admin_email: or("ADMIN_EMAIL", ""),
            },
        })
    }
}

fn parse<T: std::str::FromStr>(
    vars: &HashMap<String, String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(name).filter(|v| !v.is_empty()) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            name,
            value: value.clone(),
        }),
        None => Ok(default),
    }
}
