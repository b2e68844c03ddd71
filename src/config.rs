//! Relay Configuration
//!
//! Configuration for the webhook client, session lifetime and logging.
//!
//! ```ignore
//! let config = RelayConfig::from_env()?
//!     .with_request_timeout(Duration::from_secs(10))
//!     .with_log_dir("/var/log/webhook-relay");
//! config.validate()?;
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{RelayError, RelayResult};

/// Environment variable holding the webhook base URL
pub const BASE_URL_ENV: &str = "N8N_WEBHOOK_BASE_URL";

/// Base URL used when the environment does not provide one
pub const DEFAULT_BASE_URL: &str = "https://bot-n8n:5678/webhook";

fn default_user_agent() -> String {
    format!("webhook-relay/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_session_idle_timeout_secs() -> u64 {
    30 * 60
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

fn default_accept_invalid_certs() -> bool {
    true
}

/// Business context sent along with every masking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskingProfile {
    pub company_name: String,
    pub industry: String,
    pub additional_context: String,
    pub masking_level: String,
    pub preserve_formatting: bool,
}

impl Default for MaskingProfile {
    fn default() -> Self {
        Self {
            company_name: "메이아이".to_string(),
            industry: "AI/Computer Vision".to_string(),
            additional_context: "CCTV 분석, 매장 고객 분석".to_string(),
            masking_level: "balanced".to_string(),
            preserve_formatting: true,
        }
    }
}

/// Configuration for the relay process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Base URL every tool path is appended to
    pub base_url: String,

    /// User-Agent sent with every webhook call
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Sessions idle longer than this are evicted
    #[serde(default = "default_session_idle_timeout_secs")]
    pub session_idle_timeout_secs: u64,

    /// How often the reaper sweeps the store
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Accept self-signed or otherwise unverifiable certificates.
    ///
    /// The webhook host lives on a private network with a self-signed
    /// certificate. Turning this off requires a verifiable certificate there.
    #[serde(default = "default_accept_invalid_certs")]
    pub accept_invalid_certs: bool,

    /// Context for the masking workflow
    #[serde(default)]
    pub masking: MaskingProfile,

    /// Directory for rolling JSON log files (stderr only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl RelayConfig {
    /// Create a configuration pointing at the given webhook base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            session_idle_timeout_secs: default_session_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            accept_invalid_certs: default_accept_invalid_certs(),
            masking: MaskingProfile::default(),
            log_dir: None,
        }
    }

    /// Build the configuration from environment variables
    ///
    /// Every variable is optional; missing ones fall back to defaults.
    pub fn from_env() -> RelayResult<Self> {
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(base_url);

        if let Ok(agent) = env::var("RELAY_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(secs) = env_secs("RELAY_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = env_secs("RELAY_SESSION_TIMEOUT_SECS")? {
            config.session_idle_timeout_secs = secs;
        }
        if let Some(secs) = env_secs("RELAY_SWEEP_INTERVAL_SECS")? {
            config.sweep_interval_secs = secs;
        }
        if let Ok(dir) = env::var("RELAY_LOG_DIR") {
            if !dir.trim().is_empty() {
                config.log_dir = Some(PathBuf::from(dir));
            }
        }

        Ok(config)
    }

    /// Set the User-Agent header value
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-call timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the idle timeout after which sessions are evicted
    pub fn with_session_idle_timeout(mut self, timeout: Duration) -> Self {
        self.session_idle_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the reaper sweep interval
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_secs = interval.as_secs();
        self
    }

    /// Set whether unverifiable certificates are accepted
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set the masking profile
    pub fn with_masking(mut self, masking: MaskingProfile) -> Self {
        self.masking = masking;
        self
    }

    /// Write rolling log files into this directory
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Reject configurations the relay cannot run with
    pub fn validate(&self) -> RelayResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(RelayError::InvalidConfig("base_url is empty".into()));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(RelayError::InvalidConfig(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(RelayError::InvalidConfig("request timeout must be non-zero".into()));
        }
        if self.session_idle_timeout_secs == 0 {
            return Err(RelayError::InvalidConfig("session timeout must be non-zero".into()));
        }
        if self.sweep_interval_secs == 0 {
            return Err(RelayError::InvalidConfig("sweep interval must be non-zero".into()));
        }
        Ok(())
    }
}

fn env_secs(key: &str) -> RelayResult<Option<u64>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| RelayError::InvalidConfig(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}
