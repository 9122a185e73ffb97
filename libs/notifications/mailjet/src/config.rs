//! Mailjet client configuration.

use crate::models::{Tracking, TrackingMode};
use core_config::{env_first, env_or_default, env_parse, ConfigError, FromEnv};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.mailjet.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and defaults, loaded once and injected into the transport and normalizer.
#[derive(Clone)]
pub struct MailjetConfig {
    pub public_key: String,
    pub private_key: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Tracking applied to provider-neutral messages
    pub tracking: Tracking,
}

impl MailjetConfig {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            tracking: Tracking::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = tracking;
        self
    }
}

impl FromEnv for MailjetConfig {
    /// Reads:
    /// - `MAILJET_PUBLIC_KEY` (or legacy `MailJetPub`), required
    /// - `MAILJET_PRIVATE_KEY` (or legacy `MailJetPri`), required
    /// - `MAILJET_BASE_URL`, defaults to `https://api.mailjet.com`
    /// - `MAILJET_TIMEOUT_SECS`, defaults to 30
    /// - `MAILJET_TRACK_OPEN` / `MAILJET_TRACK_CLICK`: `default`, `on` or `off`; default `on`
    fn from_env() -> Result<Self, ConfigError> {
        let public_key = env_first(&["MAILJET_PUBLIC_KEY", "MailJetPub"])?;
        let private_key = env_first(&["MAILJET_PRIVATE_KEY", "MailJetPri"])?;
        let base_url = env_or_default("MAILJET_BASE_URL", DEFAULT_BASE_URL);
        let timeout = Duration::from_secs(env_parse("MAILJET_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?);
        let tracking = Tracking {
            open: env_parse("MAILJET_TRACK_OPEN", TrackingMode::On)?,
            click: env_parse("MAILJET_TRACK_CLICK", TrackingMode::On)?,
        };

        Ok(Self {
            public_key,
            private_key,
            base_url,
            timeout,
            tracking,
        })
    }
}

impl fmt::Debug for MailjetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailjetConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("tracking", &self.tracking)
            .finish()
    }
}
