// ── Command algebra ──
//
// A command is one configuration change bound to an AP session. Commands
// compose: folding one into another merges its fields into the receiver's
// `added` set so several changes reach the firmware in a single form
// submission. The receiver's band, page and base fields always win.

mod radio;

pub use radio::{DisableInterface, EnableInterface, SetChannel, SetSideband, SetSsid};

use apcommand_api::FieldPayload;
use async_trait::async_trait;
use tracing::info;

use crate::error::CoreError;
use crate::payload;
use crate::policy::{Band, Page};
use crate::session::{ApSession, Transaction};

// ── CommandCore ──────────────────────────────────────────────────────

/// State every command carries: its session and the fields folded in
/// from other commands.
#[derive(Debug, Clone)]
pub struct CommandCore {
    session: ApSession,
    added: FieldPayload,
}

impl CommandCore {
    pub fn new(session: &ApSession) -> Self {
        Self {
            session: session.clone(),
            added: FieldPayload::new(),
        }
    }

    pub fn session(&self) -> &ApSession {
        &self.session
    }

    pub fn added(&self) -> &FieldPayload {
        &self.added
    }
}

// ── Command ──────────────────────────────────────────────────────────

/// A combinable configuration change.
///
/// Implementors provide the fields that make them what they are
/// (`singular_data`), the band they address and the page they post to.
/// Everything else is derived: `data()` is rebuilt on every call as
/// `base ∪ singular ∪ added`, later sets winning.
#[async_trait]
pub trait Command: Send + Sync {
    fn core(&self) -> &CommandCore;

    fn core_mut(&mut self) -> &mut CommandCore;

    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// The radio this command addresses, if it is band-scoped.
    fn band(&self) -> Option<Band>;

    /// The fields this command exists to set.
    fn singular_data(&self) -> FieldPayload;

    fn page(&self) -> Page {
        Page::Radio
    }

    fn base_data(&self) -> FieldPayload {
        payload::command_base(self.band())
    }

    fn added_data(&self) -> &FieldPayload {
        self.core().added()
    }

    /// `singular ∪ added`: what this command contributes when folded into
    /// another one.
    fn non_base_data(&self) -> FieldPayload {
        self.singular_data().merged(self.added_data())
    }

    /// The full submission: `base ∪ singular ∪ added`.
    fn data(&self) -> FieldPayload {
        self.base_data().merged(&self.non_base_data())
    }

    /// Fold `other`'s non-base fields into this command.
    fn combine_in_place(&mut self, other: &dyn Command) {
        let extra = other.non_base_data();
        self.core_mut().added.merge(&extra);
    }

    /// Like [`combine_in_place`](Self::combine_in_place) but leaves both
    /// operands untouched.
    fn combine(&self, other: &dyn Command) -> Self
    where
        Self: Clone + Sized,
    {
        let mut combined = self.clone();
        combined.combine_in_place(other);
        combined
    }

    /// Drop `other`'s non-base field names from this command's added set.
    fn remove_in_place(&mut self, other: &dyn Command) {
        let names = other.non_base_data();
        self.core_mut().added.remove_keys_of(&names);
    }

    fn remove(&self, other: &dyn Command) -> Self
    where
        Self: Clone + Sized,
    {
        let mut reduced = self.clone();
        reduced.remove_in_place(other);
        reduced
    }

    /// Lock the session and submit.
    async fn execute(&self) -> Result<String, CoreError> {
        let mut tx = self.core().session().begin().await;
        self.execute_in(&mut tx).await
    }

    /// Submit inside an already-open transaction on the same session.
    async fn execute_in(&self, tx: &mut Transaction<'_>) -> Result<String, CoreError> {
        if !tx.session().same_session(self.core().session()) {
            return Err(CoreError::ForeignTransaction);
        }
        let data = self.data();
        info!(command = self.name(), page = self.page().path(), %data, "executing command");
        tx.submit(self.page(), Some(&data)).await
    }
}
