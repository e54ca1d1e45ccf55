// Radio-page commands, plus the SSID setter on `ssid.asp`.

use apcommand_api::FieldPayload;

use super::{Command, CommandCore};
use crate::policy::{
    Band, Channel, FIELD_CHANNEL, FIELD_RADIO, FIELD_SIDEBAND, FIELD_SSID, Page, RADIO_OFF,
    RADIO_ON, Sideband,
};
use crate::session::ApSession;

// ── EnableInterface / DisableInterface ───────────────────────────────

/// Bring a radio up.
#[derive(Debug, Clone)]
pub struct EnableInterface {
    core: CommandCore,
    band: Band,
}

impl EnableInterface {
    pub fn new(session: &ApSession, band: Band) -> Self {
        Self {
            core: CommandCore::new(session),
            band,
        }
    }
}

impl Command for EnableInterface {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "enable-interface"
    }

    fn band(&self) -> Option<Band> {
        Some(self.band)
    }

    fn singular_data(&self) -> FieldPayload {
        FieldPayload::new().with(FIELD_RADIO, RADIO_ON)
    }
}

/// Take a radio down.
#[derive(Debug, Clone)]
pub struct DisableInterface {
    core: CommandCore,
    band: Band,
}

impl DisableInterface {
    pub fn new(session: &ApSession, band: Band) -> Self {
        Self {
            core: CommandCore::new(session),
            band,
        }
    }
}

impl Command for DisableInterface {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "disable-interface"
    }

    fn band(&self) -> Option<Band> {
        Some(self.band)
    }

    fn singular_data(&self) -> FieldPayload {
        FieldPayload::new().with(FIELD_RADIO, RADIO_OFF)
    }
}

// ── SetChannel ───────────────────────────────────────────────────────

/// Select the control channel. The band follows the channel.
#[derive(Debug, Clone)]
pub struct SetChannel {
    core: CommandCore,
    channel: Channel,
}

impl SetChannel {
    pub fn new(session: &ApSession, channel: Channel) -> Self {
        Self {
            core: CommandCore::new(session),
            channel,
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Retarget the command; its band changes with the channel.
    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }
}

impl Command for SetChannel {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "set-channel"
    }

    fn band(&self) -> Option<Band> {
        Some(self.channel.band())
    }

    fn singular_data(&self) -> FieldPayload {
        FieldPayload::new().with(FIELD_CHANNEL, self.channel.number().to_string())
    }
}

// ── SetSideband ──────────────────────────────────────────────────────

/// Select the 5GHz control sideband.
#[derive(Debug, Clone)]
pub struct SetSideband {
    core: CommandCore,
    direction: Sideband,
}

impl SetSideband {
    pub fn new(session: &ApSession, direction: Sideband) -> Self {
        Self {
            core: CommandCore::new(session),
            direction,
        }
    }

    pub fn direction(&self) -> Sideband {
        self.direction
    }
}

impl Command for SetSideband {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "set-sideband"
    }

    fn band(&self) -> Option<Band> {
        Some(Band::Five)
    }

    fn singular_data(&self) -> FieldPayload {
        FieldPayload::new().with(FIELD_SIDEBAND, self.direction.wire_value())
    }
}

// ── SetSsid ──────────────────────────────────────────────────────────

/// Rename a radio's network.
#[derive(Debug, Clone)]
pub struct SetSsid {
    core: CommandCore,
    band: Band,
    ssid: String,
}

impl SetSsid {
    pub fn new(session: &ApSession, band: Band, ssid: impl Into<String>) -> Self {
        Self {
            core: CommandCore::new(session),
            band,
            ssid: ssid.into(),
        }
    }
}

impl Command for SetSsid {
    fn core(&self) -> &CommandCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CommandCore {
        &mut self.core
    }

    fn name(&self) -> &'static str {
        "set-ssid"
    }

    fn band(&self) -> Option<Band> {
        Some(self.band)
    }

    fn page(&self) -> Page {
        Page::Ssid
    }

    fn singular_data(&self) -> FieldPayload {
        FieldPayload::new().with(FIELD_SSID, self.ssid.as_str())
    }
}
