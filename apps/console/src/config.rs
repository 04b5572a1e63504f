use anyhow::{bail, Context, Result};
use reqwest::Url;

const DEFAULT_UPSTREAM_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub upstream_base_url: Url,
    pub admin_username: String,
    pub admin_password: String,
    pub port: u16,
    pub rust_log: String,
    pub session_ttl_minutes: i64,
    pub upstream_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let upstream_raw =
            lookup("UPSTREAM_BASE_URL").unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());
        let upstream_base_url = Url::parse(&upstream_raw)
            .with_context(|| format!("UPSTREAM_BASE_URL '{upstream_raw}' is not a valid URL"))?;
        if !matches!(upstream_base_url.scheme(), "http" | "https") {
            bail!("UPSTREAM_BASE_URL must use http or https, got '{upstream_raw}'");
        }

        let session_ttl_minutes = parse_or(&lookup, "SESSION_TTL_MINUTES", 60)?;
        if session_ttl_minutes <= 0 {
            bail!("SESSION_TTL_MINUTES must be positive");
        }

        Ok(Config {
            upstream_base_url,
            admin_username: require("ADMIN_USERNAME")?,
            admin_password: require("ADMIN_PASSWORD")?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            session_ttl_minutes,
            upstream_timeout_secs: parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 30)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const CREDS: [(&str, &str); 2] = [("ADMIN_USERNAME", "admin"), ("ADMIN_PASSWORD", "hunter2")];

    #[test]
    fn test_defaults_apply() {
        let config = config_from(&CREDS).unwrap();
        assert_eq!(config.upstream_base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.session_ttl_minutes, 60);
        assert_eq!(config.upstream_timeout_secs, 30);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let mut pairs = CREDS.to_vec();
        pairs.extend([
            ("UPSTREAM_BASE_URL", "https://screening.internal/api"),
            ("PORT", "9000"),
            ("SESSION_TTL_MINUTES", "15"),
            ("MAX_UPLOAD_BYTES", "2048"),
        ]);
        let config = config_from(&pairs).unwrap();
        assert_eq!(config.upstream_base_url.host_str(), Some("screening.internal"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.session_ttl_minutes, 15);
        assert_eq!(config.max_upload_bytes, 2048);
    }

    #[test]
    fn test_missing_credentials_fail() {
        let err = config_from(&[("ADMIN_USERNAME", "admin")]).unwrap_err();
        assert!(err.to_string().contains("ADMIN_PASSWORD"));
    }

    #[test]
    fn test_invalid_port_fails() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(config_from(&pairs).is_err());
    }

    #[test]
    fn test_non_http_upstream_fails() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("UPSTREAM_BASE_URL", "ftp://files.example.com"));
        assert!(config_from(&pairs).is_err());
    }

    #[test]
    fn test_zero_ttl_fails() {
        let mut pairs = CREDS.to_vec();
        pairs.push(("SESSION_TTL_MINUTES", "0"));
        assert!(config_from(&pairs).is_err());
    }
}
