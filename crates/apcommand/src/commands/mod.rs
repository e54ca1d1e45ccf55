//! Command dispatch: bridges CLI args -> AccessPoint operations -> output.

pub mod atheros;
pub mod channel;
pub mod config_cmd;
pub mod radio;
pub mod ssid;
pub mod status;

use apcommand_core::{AccessPoint, Band};

use crate::cli::{BandArg, BandSelection, Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an AP-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    access_point: &AccessPoint,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status { band } => status::handle(access_point, band, global).await,
        Command::Channel { channel } => channel::handle(access_point, channel, global).await,
        Command::UnsetChannel => channel::unset(access_point, global).await,
        Command::Ssid { ssid, band } => ssid::handle(access_point, ssid, band, global).await,
        Command::Enable { band } => radio::enable(access_point, band, global).await,
        Command::Disable { band } => radio::disable(access_point, band, global).await,
        // Config, Completions and Atheros are handled before dispatch
        Command::Config(_) | Command::Completions(_) | Command::Atheros(_) => unreachable!(),
    }
}

// ── Band conversion ─────────────────────────────────────────────────

pub fn band(arg: BandArg) -> Band {
    match arg {
        BandArg::TwoPointFour => Band::TwoPointFour,
        BandArg::Five => Band::Five,
    }
}

pub fn bands(selection: BandSelection) -> Vec<Band> {
    match selection {
        BandSelection::TwoPointFour => vec![Band::TwoPointFour],
        BandSelection::Five => vec![Band::Five],
        BandSelection::Both => vec![Band::TwoPointFour, Band::Five],
    }
}
