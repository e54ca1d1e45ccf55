use thiserror::Error;

/// Top-level error type for the `apcommand-api` crate.
///
/// Covers every failure mode of the AP web-admin and telnet transports.
/// `apcommand-core` wraps these and keeps the transient flag.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The AP rejected the basic-auth credentials.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Socket error on the telnet shell.
    #[error("Connection error: {0}")]
    Io(#[from] std::io::Error),

    /// The telnet shell misbehaved (closed early, garbled exchange).
    #[error("Shell session error: {message}")]
    Shell { message: String },

    /// Building the HTTP client failed.
    #[error("HTTP client error: {0}")]
    Client(String),

    // ── Web server ──────────────────────────────────────────────────
    /// The AP web server answered with a non-success status.
    #[error("AP returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// AP web servers are slow rather than absent, so timeouts, refused
    /// connections and gateway-style statuses all qualify.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::HttpStatus { status, .. } => matches!(status, 502..=504),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Returns `true` if the AP refused the credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_and_gateway_statuses_are_transient() {
        assert!(Error::Timeout { timeout_secs: 10 }.is_transient());
        assert!(
            Error::HttpStatus {
                status: 503,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            !Error::HttpStatus {
                status: 404,
                message: String::new()
            }
            .is_transient()
        );
        assert!(
            !Error::Authentication {
                message: "nope".into()
            }
            .is_transient()
        );
    }
}
