// ── Access point facade ──
//
// One object per AP. Wires the session, the channel changer and a status
// reader together and exposes the operations the CLI offers.

use std::sync::Arc;
use std::time::Duration;

use apcommand_api::{FormTransport, HttpClient};
use serde::Serialize;
use tracing::{debug, info};

use crate::changer::{AppliedChange, ChannelChanger};
use crate::command::{Command, DisableInterface, EnableInterface, SetSsid};
use crate::config::ApConfig;
use crate::error::CoreError;
use crate::policy::{Band, Channel};
use crate::session::ApSession;
use crate::status::RadioStatusReader;

/// Everything the status pages say about one radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandStatus {
    pub band: Band,
    pub channel: String,
    pub ssid: String,
    pub state: String,
    pub sideband: Option<String>,
    pub mac_address: String,
    pub bandwidth: Option<String>,
}

/// Channel settings of one radio, all read from its radio page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelStatus {
    pub band: Band,
    pub channel: String,
    pub sideband: Option<String>,
    pub state: String,
}

/// A Broadcom BCM94718NR access point.
pub struct AccessPoint {
    session: ApSession,
    changer: ChannelChanger,
    reader: RadioStatusReader,
}

impl AccessPoint {
    /// Drive the AP through an existing transport.
    pub fn new(transport: Arc<dyn FormTransport>, settle: Duration) -> Self {
        let session = ApSession::new(transport, settle);
        Self {
            changer: ChannelChanger::new(session.clone()),
            reader: RadioStatusReader::new(session.clone(), true),
            session,
        }
    }

    /// Build the HTTP transport from `config` and wrap it.
    pub fn connect(config: &ApConfig) -> Result<Self, CoreError> {
        config.validate()?;
        debug!(url = %config.url, "building AP client");
        let client = HttpClient::new(
            config.url.clone(),
            config.username.clone(),
            config.password.clone(),
            &config.transport(),
        )?;
        Ok(Self::new(Arc::new(client), config.settle))
    }

    pub fn session(&self) -> &ApSession {
        &self.session
    }

    pub fn last_change(&self) -> Option<AppliedChange> {
        self.changer.last_change()
    }

    /// Seed the undo record with a change made through another handle.
    pub fn remember_change(&self, change: AppliedChange) {
        self.changer.set_last_change(Some(change));
    }

    // ── Channel ──────────────────────────────────────────────────────

    pub async fn set_channel(&self, channel: u16) -> Result<Channel, CoreError> {
        self.changer.set_channel(channel).await
    }

    pub async fn unset_channel(&self) -> Result<AppliedChange, CoreError> {
        self.changer.unset_channel().await
    }

    pub async fn channel(&self, band: Band) -> Result<String, CoreError> {
        self.reader.channel(band).await
    }

    /// Channel, sideband and state of each band, one radio page per band.
    pub async fn channels(&self, bands: &[Band]) -> Result<Vec<ChannelStatus>, CoreError> {
        let snapshot = RadioStatusReader::new(self.session.clone(), false);
        let mut tx = self.session.begin().await;

        let mut out = Vec::with_capacity(bands.len());
        for &band in bands {
            out.push(ChannelStatus {
                band,
                channel: snapshot.channel_in(&mut tx, band).await?,
                sideband: snapshot.sideband_in(&mut tx, band).await?,
                state: snapshot.state_in(&mut tx, band).await?,
            });
        }
        Ok(out)
    }

    // ── Radio state ──────────────────────────────────────────────────

    pub async fn enable(&self, band: Band) -> Result<(), CoreError> {
        info!(%band, "enabling radio");
        EnableInterface::new(&self.session, band).execute().await?;
        Ok(())
    }

    pub async fn disable(&self, band: Band) -> Result<(), CoreError> {
        info!(%band, "disabling radio");
        DisableInterface::new(&self.session, band).execute().await?;
        Ok(())
    }

    pub async fn state(&self, band: Band) -> Result<String, CoreError> {
        self.reader.state(band).await
    }

    // ── SSID ─────────────────────────────────────────────────────────

    pub async fn set_ssid(&self, band: Band, ssid: &str) -> Result<(), CoreError> {
        info!(%band, ssid, "setting SSID");
        SetSsid::new(&self.session, band, ssid).execute().await?;
        Ok(())
    }

    pub async fn ssid(&self, band: Band) -> Result<String, CoreError> {
        self.reader.ssid(band).await
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Snapshot of the given bands. Each page is fetched once per band.
    pub async fn status(&self, bands: &[Band]) -> Result<Vec<BandStatus>, CoreError> {
        let snapshot = RadioStatusReader::new(self.session.clone(), false);
        let mut tx = self.session.begin().await;

        let mut out = Vec::with_capacity(bands.len());
        for &band in bands {
            out.push(BandStatus {
                band,
                channel: snapshot.channel_in(&mut tx, band).await?,
                ssid: snapshot.ssid_in(&mut tx, band).await?,
                state: snapshot.state_in(&mut tx, band).await?,
                sideband: snapshot.sideband_in(&mut tx, band).await?,
                mac_address: snapshot.mac_address_in(&mut tx, band).await?,
                bandwidth: snapshot.bandwidth_in(&mut tx, band).await?,
            });
        }
        Ok(out)
    }
}
