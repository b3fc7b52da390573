use std::env;
use std::str::FromStr;

use dotenvy::dotenv;
use thiserror::Error;

/// Instruction used whenever the remote instruction file cannot be fetched.
pub const DEFAULT_INSTRUCTION: &str = "You are a helpful assistant.";

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind host (e.g., 0.0.0.0)
    pub app_host: String,
    /// HTTP bind port (e.g., 8080)
    pub app_port: u16,

    /// System instruction sent when the instruction fetch fails
    pub fallback_instruction: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid number for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Empty value for {0}")]
    EmptyVar(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env if present
        let _ = dotenv();

        let app_host = env_or_default("APP_HOST", "0.0.0.0");
        let app_port = parse_or_default::<u16>("APP_PORT", 8080)?;

        let fallback_instruction = env_or_default("FALLBACK_INSTRUCTION", DEFAULT_INSTRUCTION);
        if fallback_instruction.trim().is_empty() {
            return Err(ConfigError::EmptyVar("FALLBACK_INSTRUCTION"));
        }

        Ok(Self {
            app_host,
            app_port,
            fallback_instruction,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.app_host, self.app_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_host: "0.0.0.0".to_string(),
            app_port: 8080,
            fallback_instruction: DEFAULT_INSTRUCTION.to_string(),
        }
    }
}

/* --------------------------- helpers --------------------------- */

fn env_or_default(key: &'static str, default: &'static str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or_default<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(v) => v.parse::<T>().map_err(|_| ConfigError::InvalidNumber {
            name: key,
            value: v,
        }),
        Err(_) => Ok(default),
    }
}
