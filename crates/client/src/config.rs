use std::path::PathBuf;

use wellnest_core::cooldown::DEFAULT_RESEND_COOLDOWN_SECS;
use wellnest_core::error::CoreError;

/// Default API root used in local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root including the `/api` prefix.
    pub api_url: String,
    /// Where the session entries are persisted.
    pub session_file: PathBuf,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Seconds before a one-time code may be re-sent.
    pub resend_cooldown_secs: u32,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                          |
    /// |---------------------------------|----------------------------------|
    /// | `WELLNEST_API_URL`              | `http://localhost:8080/api`      |
    /// | `WELLNEST_SESSION_FILE`         | `$HOME/.wellnest/session.json`   |
    /// | `WELLNEST_REQUEST_TIMEOUT_SECS` | `30`                             |
    /// | `WELLNEST_RESEND_COOLDOWN_SECS` | `60`                             |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let api_url = lookup("WELLNEST_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        check_api_url("WELLNEST_API_URL", &api_url)?;

        let session_file = lookup("WELLNEST_SESSION_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_session_file(lookup("HOME")));

        let request_timeout_secs = parse_var(&lookup, "WELLNEST_REQUEST_TIMEOUT_SECS", 30)?;
        let resend_cooldown_secs = parse_var(
            &lookup,
            "WELLNEST_RESEND_COOLDOWN_SECS",
            DEFAULT_RESEND_COOLDOWN_SECS,
        )?;

        Ok(Self {
            api_url,
            session_file,
            request_timeout_secs,
            resend_cooldown_secs,
        })
    }
}

impl ClientConfig {
    /// Replace the API root with a command-line value, applying the same
    /// check as `WELLNEST_API_URL`.
    pub fn set_api_url(&mut self, raw: &str) -> Result<(), CoreError> {
        let api_url = raw.trim().trim_end_matches('/');
        check_api_url("--api-url", api_url)?;
        self.api_url = api_url.to_string();
        Ok(())
    }
}

fn check_api_url(source: &str, api_url: &str) -> Result<(), CoreError> {
    if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
        return Err(CoreError::Validation(format!(
            "{source} must be an http(s) URL, got '{api_url}'"
        )));
    }
    Ok(())
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            session_file: default_session_file(std::env::var("HOME").ok()),
            request_timeout_secs: 30,
            resend_cooldown_secs: DEFAULT_RESEND_COOLDOWN_SECS,
        }
    }
}

fn default_session_file(home: Option<String>) -> PathBuf {
    let base = home
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .unwrap_or_default();
    base.join(".wellnest").join("session.json")
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, CoreError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            CoreError::Validation(format!("{key} must be a non-negative integer, got '{raw}'"))
        }),
    }
}
