// ── Radio status reader ──
//
// Read-only queries against `radio.asp` and `ssid.asp`. A query posts the
// unit selector without `action`, so the firmware renders the page for
// that radio and changes nothing. Fetched pages are cached per
// (page, band) unless the reader was built to always refresh.

use std::collections::HashMap;
use std::sync::Mutex;

use apcommand_api::scrape::{self, Field};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::payload;
use crate::policy::{Band, Page};
use crate::session::{ApSession, Transaction};

/// Shown when a field is missing from the page.
pub const NOT_AVAILABLE: &str = "NA";

pub struct RadioStatusReader {
    session: ApSession,
    refresh: bool,
    cache: Mutex<HashMap<(Page, Band), String>>,
}

impl RadioStatusReader {
    /// `refresh = true` re-fetches on every query; otherwise each
    /// (page, band) is fetched once and reused.
    pub fn new(session: ApSession, refresh: bool) -> Self {
        Self {
            session,
            refresh,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn refreshes(&self) -> bool {
        self.refresh
    }

    pub fn clear_cache(&self) {
        self.cache.lock().expect("page cache lock poisoned").clear();
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Current control channel, or `"NA"`.
    pub async fn channel(&self, band: Band) -> Result<String, CoreError> {
        let mut tx = self.session.begin().await;
        self.channel_in(&mut tx, band).await
    }

    pub async fn channel_in(&self, tx: &mut Transaction<'_>, band: Band) -> Result<String, CoreError> {
        let html = self.page_in(tx, Page::Radio, band).await?;
        Ok(or_sentinel(scrape::field(&html, Field::Channel), Field::Channel, band))
    }

    /// "Enabled" / "Disabled", or `"NA"`.
    pub async fn state(&self, band: Band) -> Result<String, CoreError> {
        let mut tx = self.session.begin().await;
        self.state_in(&mut tx, band).await
    }

    pub async fn state_in(&self, tx: &mut Transaction<'_>, band: Band) -> Result<String, CoreError> {
        let html = self.page_in(tx, Page::Radio, band).await?;
        Ok(or_sentinel(
            scrape::field(&html, Field::RadioState),
            Field::RadioState,
            band,
        ))
    }

    /// Control sideband. Only 5GHz has one; 2.4GHz answers `None`
    /// without touching the AP.
    pub async fn sideband(&self, band: Band) -> Result<Option<String>, CoreError> {
        let mut tx = self.session.begin().await;
        self.sideband_in(&mut tx, band).await
    }

    pub async fn sideband_in(
        &self,
        tx: &mut Transaction<'_>,
        band: Band,
    ) -> Result<Option<String>, CoreError> {
        if !band.requires_sideband() {
            return Ok(None);
        }
        let html = self.page_in(tx, Page::Radio, band).await?;
        Ok(scrape::field(&html, Field::Sideband))
    }

    /// Bandwidth capability text, if the page shows one.
    pub async fn bandwidth(&self, band: Band) -> Result<Option<String>, CoreError> {
        let mut tx = self.session.begin().await;
        self.bandwidth_in(&mut tx, band).await
    }

    pub async fn bandwidth_in(
        &self,
        tx: &mut Transaction<'_>,
        band: Band,
    ) -> Result<Option<String>, CoreError> {
        let html = self.page_in(tx, Page::Radio, band).await?;
        Ok(scrape::field(&html, Field::Bandwidth))
    }

    /// Network name, or `"NA"`.
    pub async fn ssid(&self, band: Band) -> Result<String, CoreError> {
        let mut tx = self.session.begin().await;
        self.ssid_in(&mut tx, band).await
    }

    pub async fn ssid_in(&self, tx: &mut Transaction<'_>, band: Band) -> Result<String, CoreError> {
        let html = self.page_in(tx, Page::Ssid, band).await?;
        Ok(or_sentinel(scrape::field(&html, Field::Ssid), Field::Ssid, band))
    }

    /// Radio MAC as listed in the unit selector, or `"NA"`.
    pub async fn mac_address(&self, band: Band) -> Result<String, CoreError> {
        let mut tx = self.session.begin().await;
        self.mac_address_in(&mut tx, band).await
    }

    pub async fn mac_address_in(
        &self,
        tx: &mut Transaction<'_>,
        band: Band,
    ) -> Result<String, CoreError> {
        let html = self.page_in(tx, Page::Radio, band).await?;
        Ok(scrape::unit_mac(&html, band.unit_id()).unwrap_or_else(|| {
            warn!(%band, "MAC address missing from radio page");
            NOT_AVAILABLE.to_owned()
        }))
    }

    // ── Page fetch ───────────────────────────────────────────────────

    async fn page_in(
        &self,
        tx: &mut Transaction<'_>,
        page: Page,
        band: Band,
    ) -> Result<String, CoreError> {
        if !tx.session().same_session(&self.session) {
            return Err(CoreError::ForeignTransaction);
        }

        if !self.refresh {
            let cached = self
                .cache
                .lock()
                .expect("page cache lock poisoned")
                .get(&(page, band))
                .cloned();
            if let Some(html) = cached {
                debug!(page = page.path(), %band, "page cache hit");
                return Ok(html);
            }
        }

        let html = tx.submit(page, Some(&payload::base_data(band))).await?;
        self.cache
            .lock()
            .expect("page cache lock poisoned")
            .insert((page, band), html.clone());
        Ok(html)
    }
}

fn or_sentinel(value: Option<String>, field: Field, band: Band) -> String {
    value.unwrap_or_else(|| {
        warn!(field = field.name(), %band, "field missing from page");
        NOT_AVAILABLE.to_owned()
    })
}
