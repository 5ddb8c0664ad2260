use crate::error::ConfigError;
use std::env;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
const GENERATE_PATH: &str = "/generate";

#[derive(Debug, Clone)]
pub struct Config {
    pub generate_url: String,
    pub request_timeout: Duration,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("GENERATION_API_URL")
            .map_err(|_| ConfigError::Missing("GENERATION_API_URL"))?;
        let timeout_secs = match env::var("GENERATION_TIMEOUT_SECS") {
            Ok(value) => parse_timeout(&value)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        let server_port = match env::var("SERVER_PORT") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: "SERVER_PORT",
                value,
            })?,
            Err(_) => 8080,
        };

        Ok(Self {
            generate_url: generate_url(&base_url),
            request_timeout: Duration::from_secs(timeout_secs),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port,
        })
    }

    /// Config pointing at `base_url` with the default timeout, for wiring a
    /// service without touching the environment.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            generate_url: generate_url(base_url),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
        }
    }
}

fn parse_timeout(value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::Invalid {
            var: "GENERATION_TIMEOUT_SECS",
            value: value.to_string(),
        }),
    }
}

fn generate_url(base_url: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    if base_url.ends_with(GENERATE_PATH) {
        base_url.to_string()
    } else {
        format!("{}{}", base_url, GENERATE_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_generate_path() {
        assert_eq!(
            generate_url("https://llm.example.com"),
            "https://llm.example.com/generate"
        );
        assert_eq!(
            generate_url("https://llm.example.com/"),
            "https://llm.example.com/generate"
        );
    }

    #[test]
    fn keeps_existing_generate_path() {
        assert_eq!(
            generate_url("https://llm.example.com/generate/"),
            "https://llm.example.com/generate"
        );
    }

    #[test]
    fn rejects_zero_or_garbage_timeout() {
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("soon").is_err());
        assert_eq!(parse_timeout(" 30 ").unwrap(), 30);
    }

    #[test]
    fn base_url_config_uses_default_timeout() {
        let config = Config::with_base_url("http://localhost:9000");
        assert_eq!(config.generate_url, "http://localhost:9000/generate");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }
}
