// apcommand-core: command composition and channel-change orchestration
// between apcommand-api and consumers (CLI, test harnesses). The Broadcom
// AP is driven through its web forms, the Atheros AP through its shell.

pub mod access_point;
pub mod atheros;
pub mod changer;
pub mod command;
pub mod config;
pub mod error;
pub mod payload;
pub mod policy;
pub mod session;
pub mod status;

// ── Primary re-exports ──────────────────────────────────────────────
pub use access_point::{AccessPoint, BandStatus, ChannelStatus};
pub use atheros::{AtherosAp, Interface, InterfaceStatus, Mode};
pub use changer::{AppliedChange, ChannelChanger};
pub use command::{
    Command, CommandCore, DisableInterface, EnableInterface, SetChannel, SetSideband, SetSsid,
};
pub use config::ApConfig;
pub use error::CoreError;
pub use policy::{Band, Channel, Page, Sideband};
pub use session::{ApSession, Transaction};
pub use status::{NOT_AVAILABLE, RadioStatusReader};
