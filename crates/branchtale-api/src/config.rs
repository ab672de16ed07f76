//! Server configuration read from the environment.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use branchtale_adventure::domain::rules::{
    DEFAULT_MAX_CHOICES, DEFAULT_SUCCESS_KEYWORDS, DEFAULT_SUCCESS_THRESHOLD, GameRules,
};
use branchtale_completion::CompletionConfig;
use branchtale_completion::config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};

use crate::error::AppError;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default allowed CORS origin.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// The single origin allowed by CORS.
    pub cors_origin: HeaderValue,
    /// Completion client settings.
    pub completion: CompletionConfig,
    /// Turn budget, win threshold and success keywords.
    pub rules: GameRules,
}

impl ServerConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `OPENAI_API_KEY` is missing or any
    /// variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `OPENAI_API_KEY` is missing or any
    /// variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AppError::Config("OPENAI_API_KEY environment variable must be set".to_owned())
            })?;

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_owned());
        let cors_origin = HeaderValue::from_str(&cors_origin)
            .map_err(|e| AppError::Config(format!("CORS_ORIGIN must be a valid origin: {e}")))?;

        let completion = CompletionConfig {
            api_key,
            base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
            max_tokens: parse_var(&lookup, "COMPLETION_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            temperature: parse_var(&lookup, "COMPLETION_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            timeout: Duration::from_secs(parse_var(&lookup, "COMPLETION_TIMEOUT_SECS", 60)?),
        };

        let keywords = lookup("SUCCESS_KEYWORDS").map_or_else(
            || {
                DEFAULT_SUCCESS_KEYWORDS
                    .iter()
                    .map(|k| (*k).to_owned())
                    .collect::<Vec<_>>()
            },
            |raw| raw.split(',').map(str::to_owned).collect(),
        );
        let rules = GameRules::new(
            parse_var(&lookup, "MAX_CHOICES", DEFAULT_MAX_CHOICES)?,
            parse_var(&lookup, "SUCCESS_THRESHOLD", DEFAULT_SUCCESS_THRESHOLD)?,
            keywords,
        )
        .map_err(|e| AppError::Config(format!("invalid game rules: {e}")))?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            cors_origin,
            completion,
            rules,
        })
    }

    /// The socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if host and port do not form an address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} has an invalid value {raw:?}: {e}"))),
    }
}
