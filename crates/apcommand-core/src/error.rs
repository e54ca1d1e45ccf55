// ── Core error types ──
//
// Domain errors from apcommand-core. Classification, verification and
// shell command failures are never retried; transport failures keep the transient flag
// reported by apcommand-api so callers can decide whether to try again.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Classification ───────────────────────────────────────────────
    #[error(
        "Unknown channel {channel}: valid 2.4GHz channels are {}; valid 5GHz channels are {}",
        join(.valid_24ghz),
        join(.valid_5ghz)
    )]
    UnknownChannel {
        channel: u16,
        valid_24ghz: &'static [u16],
        valid_5ghz: &'static [u16],
    },

    #[error("Invalid band '{input}' (expected 2.4 or 5)")]
    InvalidBand { input: String },

    #[error("Invalid sideband '{input}' (expected lower or upper)")]
    InvalidSideband { input: String },

    #[error("Invalid Channel: {channel} (valid on {interface}: {})", join(.valid))]
    InvalidChannel {
        channel: u16,
        interface: &'static str,
        valid: &'static [u16],
    },

    #[error("Unknown interface '{input}' (expected a VAP name such as ath0 or ath1)")]
    InvalidInterface { input: String },

    // ── Orchestration ────────────────────────────────────────────────
    #[error("Channel change not applied: requested {requested}, AP reports {actual}")]
    ChannelVerification { requested: u16, actual: String },

    #[error("No channel change to undo")]
    NothingToUndo,

    #[error("Transaction belongs to a different AP session")]
    ForeignTransaction,

    #[error("AP command '{command}' failed: {output}")]
    CommandFailed { command: String, output: String },

    // ── Collaborators ────────────────────────────────────────────────
    #[error("AP request failed: {source}")]
    Transport {
        #[source]
        source: apcommand_api::Error,
        transient: bool,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                transient: true,
                ..
            }
        )
    }

    /// Returns `true` if the AP rejected the configured credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_auth_failure())
    }
}

impl From<apcommand_api::Error> for CoreError {
    fn from(err: apcommand_api::Error) -> Self {
        let transient = err.is_transient();
        CoreError::Transport {
            source: err,
            transient,
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
