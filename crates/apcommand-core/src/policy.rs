// ── Band / channel policy ──
//
// The fixed tables every other module consults: which channels belong to
// which band, which band needs a sideband, where each form lives and what
// the firmware calls its fields. Nothing here mutates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::CoreError;

// ── Wire vocabulary ──────────────────────────────────────────────────

/// Radio unit selector ("0" = 2.4GHz, "1" = 5GHz).
pub const FIELD_UNIT: &str = "wl_unit";
/// Interface state ("1" = up, "0" = down).
pub const FIELD_RADIO: &str = "wl_radio";
/// Control channel.
pub const FIELD_CHANNEL: &str = "wl_channel";
/// Control sideband for 40MHz operation.
pub const FIELD_SIDEBAND: &str = "wl_nctrlsb";
/// Network name.
pub const FIELD_SSID: &str = "wl_ssid";
/// Bandwidth capability.
pub const FIELD_BANDWIDTH: &str = "wl_nbw_cap";
/// Submit button; its presence makes the firmware commit the form.
pub const FIELD_ACTION: &str = "action";
/// The only `action` value the core sends.
pub const ACTION_APPLY: &str = "Apply";

pub const RADIO_ON: &str = "1";
pub const RADIO_OFF: &str = "0";

// ── Channel tables ───────────────────────────────────────────────────

/// 2.4GHz channels usable in the US regulatory domain.
pub const CHANNELS_24GHZ: &[u16] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
/// 5GHz channels the test setups use; DFS channels 52-140 are left out.
pub const CHANNELS_5GHZ: &[u16] = &[36, 44, 149, 157];

// ── Band ─────────────────────────────────────────────────────────────

/// One of the AP's two radios.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    #[strum(serialize = "2.4GHz")]
    TwoPointFour,
    #[serde(rename = "5GHz")]
    #[strum(serialize = "5GHz")]
    Five,
}

impl Band {
    /// The `wl_unit` value selecting this radio.
    pub fn unit_id(self) -> &'static str {
        match self {
            Self::TwoPointFour => "0",
            Self::Five => "1",
        }
    }

    pub fn valid_channels(self) -> &'static [u16] {
        valid_channels(self)
    }

    pub fn requires_sideband(self) -> bool {
        requires_sideband(self)
    }

    /// The band that has to go down when this one comes up.
    pub fn other(self) -> Self {
        match self {
            Self::TwoPointFour => Self::Five,
            Self::Five => Self::TwoPointFour,
        }
    }
}

impl FromStr for Band {
    type Err = CoreError;

    /// Accepts "2.4", "2", "2.4GHz", "5", "5GHz" and friends; only the
    /// first character is significant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next() {
            Some('2') => Ok(Self::TwoPointFour),
            Some('5') => Ok(Self::Five),
            _ => Err(CoreError::InvalidBand {
                input: s.to_owned(),
            }),
        }
    }
}

/// The band a channel number belongs to, if any.
pub fn band_for(channel: u16) -> Option<Band> {
    if CHANNELS_24GHZ.contains(&channel) {
        Some(Band::TwoPointFour)
    } else if CHANNELS_5GHZ.contains(&channel) {
        Some(Band::Five)
    } else {
        None
    }
}

pub fn valid_channels(band: Band) -> &'static [u16] {
    match band {
        Band::TwoPointFour => CHANNELS_24GHZ,
        Band::Five => CHANNELS_5GHZ,
    }
}

/// Only 5GHz runs 40MHz-wide and needs a control sideband.
pub fn requires_sideband(band: Band) -> bool {
    matches!(band, Band::Five)
}

// ── Channel ──────────────────────────────────────────────────────────

/// A channel number known to belong to exactly one band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Channel {
    number: u16,
    band: Band,
}

impl Channel {
    pub fn number(self) -> u16 {
        self.number
    }

    pub fn band(self) -> Band {
        self.band
    }
}

impl TryFrom<u16> for Channel {
    type Error = CoreError;

    fn try_from(number: u16) -> Result<Self, Self::Error> {
        band_for(number)
            .map(|band| Self { number, band })
            .ok_or(CoreError::UnknownChannel {
                channel: number,
                valid_24ghz: CHANNELS_24GHZ,
                valid_5ghz: CHANNELS_5GHZ,
            })
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}

// ── Sideband ─────────────────────────────────────────────────────────

/// Which neighbour a 40MHz 5GHz channel bonds with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sideband {
    Lower,
    Upper,
}

impl Sideband {
    /// The `wl_nctrlsb` value.
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
        }
    }
}

impl FromStr for Sideband {
    type Err = CoreError;

    /// "l", "lower", "Lower" and "u", "upper", "Upper" all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('l') => Ok(Self::Lower),
            Some('u') => Ok(Self::Upper),
            _ => Err(CoreError::InvalidSideband {
                input: s.to_owned(),
            }),
        }
    }
}

// ── Pages ────────────────────────────────────────────────────────────

/// An admin page of the AP's web interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Page {
    Radio,
    Ssid,
    Lan,
    Security,
    Firmware,
}

impl Page {
    pub fn path(self) -> &'static str {
        match self {
            Self::Radio => "radio.asp",
            Self::Ssid => "ssid.asp",
            Self::Lan => "lan.asp",
            Self::Security => "security.asp",
            Self::Firmware => "firmware.asp",
        }
    }
}
