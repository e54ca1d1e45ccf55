// ── AP session ──
//
// One shared connection to an AP. The transport is owned by the caller
// and injected here; the session adds the request lock and the settle
// delay the firmware's web server needs between calls.
//
// Every request is issued through a `Transaction`, which holds the lock
// for its lifetime. Work that spans several requests (the channel change,
// a status snapshot) keeps one transaction open and passes it down by
// `&mut`; the lock is not re-entrant.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use apcommand_api::{FieldPayload, FormTransport};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::policy::Page;

/// Default pause after every navigation and submission.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// Cheaply cloneable handle to one AP connection.
#[derive(Clone)]
pub struct ApSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    transport: Arc<dyn FormTransport>,
    lock: Mutex<()>,
    settle: Duration,
}

impl ApSession {
    pub fn new(transport: Arc<dyn FormTransport>, settle: Duration) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                transport,
                lock: Mutex::new(()),
                settle,
            }),
        }
    }

    pub fn settle(&self) -> Duration {
        self.inner.settle
    }

    /// Wait for exclusive access to the AP.
    pub async fn begin(&self) -> Transaction<'_> {
        let guard = self.inner.lock.lock().await;
        trace!("AP session lock acquired");
        Transaction {
            session: self,
            _guard: guard,
        }
    }

    /// Whether two handles refer to the same connection.
    pub fn same_session(&self, other: &ApSession) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ApSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApSession")
            .field("settle", &self.inner.settle)
            .finish_non_exhaustive()
    }
}

/// Exclusive access to an [`ApSession`]. Dropping it releases the lock.
pub struct Transaction<'a> {
    session: &'a ApSession,
    _guard: MutexGuard<'a, ()>,
}

impl Transaction<'_> {
    pub fn session(&self) -> &ApSession {
        self.session
    }

    /// Navigate to `page`, settle, submit, settle.
    ///
    /// `None` fetches the page as is. The settle delay is observed after
    /// the submission even when it fails.
    pub async fn submit(
        &mut self,
        page: Page,
        data: Option<&FieldPayload>,
    ) -> Result<String, CoreError> {
        let inner = &self.session.inner;

        debug!(page = page.path(), "navigating");
        inner.transport.set_path(page.path());
        tokio::time::sleep(inner.settle).await;

        match data {
            Some(data) => debug!(page = page.path(), %data, "submitting form"),
            None => debug!(page = page.path(), "fetching page"),
        }
        let result = inner.transport.submit(data).await;
        tokio::time::sleep(inner.settle).await;

        Ok(result?)
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("session", self.session)
            .finish_non_exhaustive()
    }
}
