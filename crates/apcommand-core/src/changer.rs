// ── Channel-change orchestrator ──
//
// Moves the AP to a channel in five phases under one transaction:
//
//   1. classify   the channel picks the target band (no traffic)
//   2. snapshot   read the target band's channel and sideband for undo
//   3. disable    the other band goes down
//   4. commit     channel + enable (+ sideband on 5GHz) in one submission
//   5. verify     a fresh read of the target band must echo the channel
//
// Undo runs the same shape backwards: the target band goes down with its
// old channel and sideband restored in one submission, the other band
// comes back up, and the restored channel is verified.
//
// Verification failures are reported, never retried.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::command::{Command, DisableInterface, EnableInterface, SetChannel, SetSideband};
use crate::error::CoreError;
use crate::policy::{Band, Channel, Sideband};
use crate::session::{ApSession, Transaction};
use crate::status::RadioStatusReader;

/// What a channel change did, with enough of the prior state to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedChange {
    pub enabled: Band,
    pub disabled: Band,
    /// Channel the enabled band reported before the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_channel: Option<u16>,
    /// Sideband the enabled band reported before the change (5GHz only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_sideband: Option<Sideband>,
}

pub struct ChannelChanger {
    session: ApSession,
    reader: RadioStatusReader,
    last: Mutex<Option<AppliedChange>>,
}

impl ChannelChanger {
    pub fn new(session: ApSession) -> Self {
        let reader = RadioStatusReader::new(session.clone(), true);
        Self {
            session,
            reader,
            last: Mutex::new(None),
        }
    }

    /// The most recent successful change, if any.
    pub fn last_change(&self) -> Option<AppliedChange> {
        *self.last.lock().expect("last change lock poisoned")
    }

    /// Forget or seed the undo record, e.g. from a change persisted by an
    /// earlier process.
    pub fn set_last_change(&self, change: Option<AppliedChange>) {
        *self.last.lock().expect("last change lock poisoned") = change;
    }

    /// Move the AP to `channel`, enabling its band and disabling the other.
    pub async fn set_channel(&self, channel: u16) -> Result<Channel, CoreError> {
        let channel = Channel::try_from(channel)?;
        let target = channel.band();
        info!(%channel, band = %target, "changing channel");

        let mut tx = self.session.begin().await;

        let (prior_channel, prior_sideband) = self.snapshot(&mut tx, target).await?;
        let change = AppliedChange {
            enabled: target,
            disabled: target.other(),
            prior_channel,
            prior_sideband,
        };

        DisableInterface::new(&self.session, change.disabled)
            .execute_in(&mut tx)
            .await?;

        let mut composite = SetChannel::new(&self.session, channel);
        composite.combine_in_place(&EnableInterface::new(&self.session, target));
        if target.requires_sideband() {
            composite.combine_in_place(&SetSideband::new(&self.session, Sideband::Lower));
        }
        composite.execute_in(&mut tx).await?;

        self.verify(&mut tx, channel).await?;
        drop(tx);

        self.set_last_change(Some(change));
        info!(%channel, "channel change verified");
        Ok(channel)
    }

    /// Undo the last successful change: take the band it enabled back
    /// down with its old channel and sideband, then bring the band it
    /// disabled back up. Returns the change that was undone.
    pub async fn unset_channel(&self) -> Result<AppliedChange, CoreError> {
        let last = self.last_change().ok_or(CoreError::NothingToUndo)?;
        let prior = last.prior_channel.map(Channel::try_from).transpose()?;
        info!(
            restore = %last.disabled,
            revert = %last.enabled,
            prior_channel = ?last.prior_channel,
            "undoing channel change"
        );

        let mut tx = self.session.begin().await;

        let mut composite = DisableInterface::new(&self.session, last.enabled);
        if let Some(prior) = prior {
            composite.combine_in_place(&SetChannel::new(&self.session, prior));
        }
        if let Some(sideband) = last.prior_sideband.filter(|_| last.enabled.requires_sideband()) {
            composite.combine_in_place(&SetSideband::new(&self.session, sideband));
        }
        composite.execute_in(&mut tx).await?;

        EnableInterface::new(&self.session, last.disabled)
            .execute_in(&mut tx)
            .await?;

        if let Some(prior) = prior {
            self.verify(&mut tx, prior).await?;
        }
        drop(tx);

        self.set_last_change(None);
        Ok(last)
    }

    /// Current channel and sideband of `band`, from one page fetch.
    async fn snapshot(
        &self,
        tx: &mut Transaction<'_>,
        band: Band,
    ) -> Result<(Option<u16>, Option<Sideband>), CoreError> {
        let page = RadioStatusReader::new(self.session.clone(), false);
        let channel = page
            .channel_in(tx, band)
            .await?
            .parse::<u16>()
            .ok()
            .filter(|&n| Channel::try_from(n).is_ok());
        let sideband = page
            .sideband_in(tx, band)
            .await?
            .and_then(|text| text.parse::<Sideband>().ok());
        debug!(%band, ?channel, ?sideband, "recorded prior radio settings");
        Ok((channel, sideband))
    }

    async fn verify(&self, tx: &mut Transaction<'_>, channel: Channel) -> Result<(), CoreError> {
        let actual = self.reader.channel_in(tx, channel.band()).await?;
        if actual == channel.number().to_string() {
            Ok(())
        } else {
            warn!(requested = %channel, %actual, "AP did not apply channel");
            Err(CoreError::ChannelVerification {
                requested: channel.number(),
                actual,
            })
        }
    }
}
