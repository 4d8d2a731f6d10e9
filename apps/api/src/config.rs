use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_AI_CALL_TIMEOUT_SECS: u64 = 15;
const DEFAULT_INTERVIEW_DURATION_SECS: u32 = 1800;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub azure_openai_api_key: String,
    pub azure_openai_endpoint: String,
    pub azure_openai_deployment: String,
    /// Results fall back to an in-memory store when unset.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound for every question, scoring and summary call.
    pub ai_call_timeout: Duration,
    pub interview_duration_secs: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ai_call_timeout_secs: u64 = parse_env(
            "AI_CALL_TIMEOUT_SECS",
            std::env::var("AI_CALL_TIMEOUT_SECS").ok(),
            DEFAULT_AI_CALL_TIMEOUT_SECS,
        )?;
        let interview_duration_secs: u32 = parse_env(
            "INTERVIEW_DURATION_SECS",
            std::env::var("INTERVIEW_DURATION_SECS").ok(),
            DEFAULT_INTERVIEW_DURATION_SECS,
        )?;

        if ai_call_timeout_secs == 0 {
            bail!("AI_CALL_TIMEOUT_SECS must be greater than zero");
        }
        if interview_duration_secs == 0 {
            bail!("INTERVIEW_DURATION_SECS must be greater than zero");
        }

        Ok(Config {
            azure_openai_api_key: require_env("AZURE_OPENAI_API_KEY")?,
            azure_openai_endpoint: require_env("AZURE_OPENAI_ENDPOINT")?
                .trim_end_matches('/')
                .to_string(),
            azure_openai_deployment: require_env("AZURE_OPENAI_DEPLOYMENT_NAME")?,
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            port: parse_env("PORT", std::env::var("PORT").ok(), DEFAULT_PORT)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ai_call_timeout: Duration::from_secs(ai_call_timeout_secs),
            interview_duration_secs,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses an optional variable, using `default` when it is absent.
fn parse_env<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_absent() {
        let port: u16 = parse_env("PORT", None, 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_env_parses_present_value() {
        let secs: u64 = parse_env("AI_CALL_TIMEOUT_SECS", Some(" 20 ".to_string()), 15).unwrap();
        assert_eq!(secs, 20);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        let err = parse_env::<u16>("PORT", Some("eighty".to_string()), 8080).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
