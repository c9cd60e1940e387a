use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use std::fmt;

use crate::constants::{DEFAULT_REVIEW_LIMIT, MAX_REVIEW_LIMIT};

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub jwt_secret: String,
    pub cors_origin: String,
    pub review: ReviewEnvConfig,
}

#[derive(Debug, Clone)]
pub struct ReviewEnvConfig {
    /// Fixed seed for the priority jitter; `None` seeds from entropy.
    pub jitter_seed: Option<u64>,
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for ReviewEnvConfig {
    fn default() -> Self {
        Self {
            jitter_seed: None,
            default_limit: DEFAULT_REVIEW_LIMIT,
            max_limit: MAX_REVIEW_LIMIT,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("enable_file_logs", &self.enable_file_logs)
            .field("log_dir", &self.log_dir)
            .field("sled_path", &self.sled_path)
            .field("jwt_secret", &"***REDACTED***")
            .field("cors_origin", &self.cors_origin)
            .field("review", &self.review)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        let max_limit = env_or_parse("REVIEW_MAX_LIMIT", MAX_REVIEW_LIMIT).max(1);
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/vocab-review.sled"),
            jwt_secret: env_or(
                "JWT_SECRET",
                "change_me_to_random_64_chars_change_me_to_random_64_chars",
            ),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            review: ReviewEnvConfig {
                jitter_seed: env_opt_parse("REVIEW_JITTER_SEED"),
                default_limit: env_or_parse("REVIEW_DEFAULT_LIMIT", DEFAULT_REVIEW_LIMIT)
                    .clamp(1, max_limit),
                max_limit,
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    env_opt_parse(key).unwrap_or(default)
}

/// Parses `key` when set; unparsable values are logged and treated as unset.
pub fn env_opt_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(
                key,
                value = %raw,
                "Failed to parse env var, using default"
            );
            None
        }
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
