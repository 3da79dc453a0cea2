//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

/// Honeypot service configuration.
#[derive(Debug, Clone)]
pub struct HoneypotConfig {
    /// Pre-shared API key required on authenticated routes.
    pub api_key: SecretString,
    /// Endpoint that receives the terminal session summary. `None` disables
    /// delivery (the summary is still logged locally).
    pub callback_url: Option<String>,
    /// Callback request timeout.
    pub callback_timeout: Duration,
    /// Scammer-message cap; the session terminates on the message that
    /// reaches it.
    pub message_cap: usize,
    /// Maximum wall-clock engagement duration per session.
    pub max_session_duration: Duration,
    /// Idle timeout (sessions with no activity for this long are swept).
    pub session_idle_timeout: Duration,
    /// Interval between background idle sweeps.
    pub sweep_interval: Duration,
    /// Minimum values required in every intelligence category before the
    /// intelligence-goal termination rule fires. `None` disables the rule.
    pub intel_goal_per_category: Option<usize>,
    /// Port to bind the HTTP server on.
    pub port: u16,
}

impl Default for HoneypotConfig {
    fn default() -> Self {
        Self {
            api_key: SecretString::from("default-api-key"),
            callback_url: None,
            callback_timeout: Duration::from_secs(10),
            message_cap: 13,
            max_session_duration: Duration::from_secs(1800), // 30 minutes
            session_idle_timeout: Duration::from_secs(3600), // 1 hour
            sweep_interval: Duration::from_secs(60),
            intel_goal_per_category: None,
            port: 8000,
        }
    }
}

impl HoneypotConfig {
    /// Build a config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            api_key: std::env::var("SCAMTRAP_API_KEY")
                .map(SecretString::from)
                .unwrap_or(defaults.api_key),
            callback_url: std::env::var("SCAMTRAP_CALLBACK_URL").ok(),
            callback_timeout: env_secs("SCAMTRAP_CALLBACK_TIMEOUT_SECS")
                .unwrap_or(defaults.callback_timeout),
            message_cap: env_parse("SCAMTRAP_MESSAGE_CAP").unwrap_or(defaults.message_cap),
            max_session_duration: env_secs("SCAMTRAP_MAX_SESSION_SECS")
                .unwrap_or(defaults.max_session_duration),
            session_idle_timeout: env_secs("SCAMTRAP_IDLE_TIMEOUT_SECS")
                .unwrap_or(defaults.session_idle_timeout),
            sweep_interval: env_secs("SCAMTRAP_SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.sweep_interval),
            intel_goal_per_category: env_parse("SCAMTRAP_INTEL_GOAL"),
            port: env_parse("SCAMTRAP_PORT").unwrap_or(defaults.port),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_secs(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_secs)
}
