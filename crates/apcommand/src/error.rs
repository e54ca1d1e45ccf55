//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use apcommand_api::Error as ApiError;
use apcommand_config::ConfigError;
use apcommand_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const VERIFICATION: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to access point at {url}")]
    #[diagnostic(
        code(apcommand::connection_failed),
        help(
            "Check that the AP is powered and reachable.\n\
             URL: {url}\n\
             Try: apcommand --host <address> status"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(apcommand::timeout),
        help("Increase timeout with --timeout or check the AP's responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("Access point returned HTTP {status}")]
    #[diagnostic(code(apcommand::http_status), help("Response: {message}"))]
    HttpStatus { status: u16, message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(apcommand::auth_failed),
        help(
            "Verify the AP's web-admin password.\n\
             Run: apcommand config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    // ── Channel changes ──────────────────────────────────────────────
    #[error("Unknown channel {channel}")]
    #[diagnostic(
        code(apcommand::unknown_channel),
        help("Valid 2.4GHz channels: {valid_24ghz}\nValid 5GHz channels: {valid_5ghz}")
    )]
    UnknownChannel {
        channel: u16,
        valid_24ghz: String,
        valid_5ghz: String,
    },

    #[error("Channel change not applied: requested {requested}, AP reports {actual}")]
    #[diagnostic(
        code(apcommand::verification_failed),
        help("The AP accepted the form but kept its old channel. Check the regulatory domain.")
    )]
    VerificationFailed { requested: u16, actual: String },

    #[error("Invalid channel {channel} for {interface}")]
    #[diagnostic(code(apcommand::invalid_channel), help("Valid channels: {valid}"))]
    InvalidChannel {
        channel: u16,
        interface: String,
        valid: String,
    },

    // ── Shell commands ───────────────────────────────────────────────
    #[error("AP command '{command}' failed")]
    #[diagnostic(code(apcommand::command_failed), help("AP said: {output}"))]
    CommandFailed { command: String, output: String },

    #[error("Shell session error: {message}")]
    #[diagnostic(
        code(apcommand::shell),
        help("Check the AP's telnet service and its root prompt.")
    )]
    Shell { message: String },

    #[error("No channel change to undo")]
    #[diagnostic(
        code(apcommand::nothing_to_undo),
        help("unset-channel reverses the last verified `channel` change recorded for this profile.")
    )]
    NothingToUndo,

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(apcommand::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(apcommand::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: apcommand config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No access point configured")]
    #[diagnostic(
        code(apcommand::no_config),
        help(
            "Pass --host <address>, or create a profile with: apcommand config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(apcommand::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {message}")]
    #[diagnostic(code(apcommand::keyring))]
    Keyring { message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(apcommand::internal))]
    Internal { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::VerificationFailed { .. } => exit_code::VERIFICATION,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::UnknownChannel { .. } | Self::InvalidChannel { .. } | Self::Validation { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownChannel {
                channel,
                valid_24ghz,
                valid_5ghz,
            } => CliError::UnknownChannel {
                channel,
                valid_24ghz: join(valid_24ghz),
                valid_5ghz: join(valid_5ghz),
            },

            CoreError::InvalidBand { input } => CliError::Validation {
                field: "band".into(),
                reason: format!("'{input}' is not 2.4 or 5"),
            },

            CoreError::InvalidSideband { input } => CliError::Validation {
                field: "sideband".into(),
                reason: format!("'{input}' is not lower or upper"),
            },

            CoreError::InvalidChannel {
                channel,
                interface,
                valid,
            } => CliError::InvalidChannel {
                channel,
                interface: interface.into(),
                valid: join(valid),
            },

            CoreError::InvalidInterface { input } => CliError::Validation {
                field: "interface".into(),
                reason: format!("'{input}' is not a VAP name such as ath0"),
            },

            CoreError::CommandFailed { command, output } => {
                CliError::CommandFailed { command, output }
            }

            CoreError::ChannelVerification { requested, actual } => {
                CliError::VerificationFailed { requested, actual }
            }

            CoreError::NothingToUndo => CliError::NothingToUndo,

            CoreError::ForeignTransaction => CliError::Internal {
                message: "command issued on a different AP session".into(),
            },

            CoreError::Transport { source, .. } => source.into(),

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Authentication { .. } => CliError::AuthFailed {
                profile: "current".into(),
            },
            ApiError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            ApiError::HttpStatus { status, message } => CliError::HttpStatus { status, message },
            ApiError::Transport(e) => CliError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string),
                source: Box::new(e),
            },
            ApiError::InvalidUrl(e) => CliError::Validation {
                field: "host".into(),
                reason: e.to_string(),
            },
            ApiError::Client(message) => CliError::Internal { message },
            ApiError::Io(e) => CliError::ConnectionFailed {
                url: "(telnet)".into(),
                source: Box::new(e),
            },
            ApiError::Shell { message } => CliError::Shell { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Serialization(e) => CliError::Internal {
                message: format!("failed to serialize config: {e}"),
            },
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

fn join(channels: &[u16]) -> String {
    channels
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_failures_map_to_their_own_errors() {
        let failed: CliError = CoreError::CommandFailed {
            command: "wlanconfig ath1 destroy".into(),
            output: "No such device".into(),
        }
        .into();
        assert!(matches!(failed, CliError::CommandFailed { .. }));
        assert_eq!(failed.exit_code(), exit_code::GENERAL);

        let channel: CliError = CoreError::InvalidChannel {
            channel: 12,
            interface: "ath0",
            valid: &[1, 11],
        }
        .into();
        assert_eq!(channel.exit_code(), exit_code::USAGE);

        let refused: CliError = CoreError::from(ApiError::Io(std::io::Error::from(
            std::io::ErrorKind::ConnectionRefused,
        )))
        .into();
        assert_eq!(refused.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn unknown_channel_is_a_usage_error() {
        let err: CliError = CoreError::UnknownChannel {
            channel: 75,
            valid_24ghz: &[1, 6, 11],
            valid_5ghz: &[36, 44],
        }
        .into();
        assert_eq!(err.exit_code(), exit_code::USAGE);
        match err {
            CliError::UnknownChannel {
                valid_24ghz,
                valid_5ghz,
                ..
            } => {
                assert_eq!(valid_24ghz, "1, 6, 11");
                assert_eq!(valid_5ghz, "36, 44");
            }
            other => panic!("expected UnknownChannel, got {other:?}"),
        }
    }

    #[test]
    fn transport_errors_map_to_specific_codes() {
        let auth: CliError = CoreError::from(ApiError::Authentication {
            message: "nope".into(),
        })
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let timeout: CliError = CoreError::from(ApiError::Timeout { timeout_secs: 10 }).into();
        assert_eq!(timeout.exit_code(), exit_code::TIMEOUT);

        let verify: CliError = CoreError::ChannelVerification {
            requested: 44,
            actual: "36".into(),
        }
        .into();
        assert_eq!(verify.exit_code(), exit_code::VERIFICATION);
    }
}
