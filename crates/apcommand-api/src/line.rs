// Line-oriented command transport.
//
// The Atheros reference AP is driven from its shell rather than from web
// forms. Each call sends one command line and returns what it printed.

use async_trait::async_trait;

use crate::error::Error;

/// What one command line printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineOutput {
    /// Lines written to standard output, without line terminators.
    pub output: Vec<String>,
    /// Lines written to standard error. Transports that merge the two
    /// streams leave this empty.
    pub error: Vec<String>,
}

impl LineOutput {
    /// First output line containing `needle`, if any.
    pub fn find(&self, needle: &str) -> Option<&str> {
        self.output
            .iter()
            .chain(&self.error)
            .map(String::as_str)
            .find(|line| line.contains(needle))
    }
}

/// A client that runs shell command lines on an AP, one at a time.
///
/// `apcommand-core` serializes access so a multi-line configuration
/// sequence is never interleaved with another caller's commands.
#[async_trait]
pub trait LineTransport: Send + Sync {
    /// Run `line` (e.g. `cfg -a AP_SSID=lab`) and collect its output.
    async fn exec(&self, line: &str) -> Result<LineOutput, Error>;
}
