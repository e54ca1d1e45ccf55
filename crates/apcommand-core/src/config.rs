// ── Runtime connection configuration ──
//
// Describes how to reach one AP: where it is, which credentials the web
// server expects and how patiently to talk to it. Never touches disk;
// the CLI builds an `ApConfig` from its profiles and hands it in.

use std::time::Duration;

use apcommand_api::TransportConfig;
use secrecy::SecretString;
use url::Url;

use crate::error::CoreError;
use crate::session::DEFAULT_SETTLE;

/// Factory address of the BCM94718NR reference board.
pub const DEFAULT_URL: &str = "http://192.168.1.1";

/// Configuration for one access point.
#[derive(Debug, Clone)]
pub struct ApConfig {
    /// AP root URL (e.g. `http://192.168.1.1`).
    pub url: Url,
    /// Basic-auth user; the reference firmware expects an empty one.
    pub username: String,
    pub password: SecretString,
    /// Pause after every navigation and submission.
    pub settle: Duration,
    /// Upper bound for a single HTTP call.
    pub timeout: Duration,
    /// Extra attempts after a transient transport failure.
    pub retries: u32,
}

impl Default for ApConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            url: Url::parse(DEFAULT_URL).expect("default AP URL is valid"),
            username: String::new(),
            password: SecretString::from("admin"),
            settle: DEFAULT_SETTLE,
            timeout: transport.timeout,
            retries: transport.retries,
        }
    }
}

impl ApConfig {
    /// Reject settings the AP cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.settle.is_zero() {
            return Err(CoreError::Config {
                message: "settle delay must be greater than zero".into(),
            });
        }
        if self.timeout.is_zero() {
            return Err(CoreError::Config {
                message: "request timeout must be greater than zero".into(),
            });
        }
        if !matches!(self.url.scheme(), "http" | "https") {
            return Err(CoreError::Config {
                message: format!("unsupported URL scheme '{}'", self.url.scheme()),
            });
        }
        Ok(())
    }

    /// The transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            retries: self.retries,
            ..TransportConfig::default()
        }
    }
}
