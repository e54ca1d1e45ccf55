//! `channel` and `unset-channel`.
//!
//! A verified change is recorded per profile in the state file, so a
//! later invocation can undo it.

use tabled::Tabled;
use tracing::warn;

use apcommand_core::{AccessPoint, AppliedChange, Band, ChannelStatus};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ChannelRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "Sideband")]
    sideband: String,
    #[tabled(rename = "State")]
    state: String,
}

fn to_row(status: &ChannelStatus, color: bool) -> ChannelRow {
    ChannelRow {
        band: status.band.to_string(),
        channel: status.channel.clone(),
        sideband: status.sideband.clone().unwrap_or_else(|| "-".into()),
        state: output::paint_state(&status.state, color),
    }
}

fn plain(status: &ChannelStatus) -> String {
    match status.sideband {
        Some(ref sideband) => format!(
            "{} Channel: {} {sideband} ({})",
            status.band, status.channel, status.state
        ),
        None => format!("{} Channel: {} ({})", status.band, status.channel, status.state),
    }
}

pub async fn handle(
    access_point: &AccessPoint,
    channel: Option<u16>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(channel) = channel {
        let applied = access_point.set_channel(channel).await?;
        if let Some(change) = access_point.last_change() {
            remember(global, Some(change));
        }
        output::print_done(
            &format!("Channel set to {applied} ({})", applied.band()),
            global.quiet,
        );
        return Ok(());
    }

    let channels = access_point
        .channels(&[Band::TwoPointFour, Band::Five])
        .await?;
    let color = output::should_color(&global.color);
    let out = output::render_list(&global.output, &channels, |c| to_row(c, color), plain);
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn unset(access_point: &AccessPoint, global: &GlobalOpts) -> Result<(), CliError> {
    let profile = config::current_profile_name(global);
    let recorded = apcommand_config::last_change(&profile)?.ok_or(CliError::NothingToUndo)?;
    access_point.remember_change(recorded);

    let undo = access_point.unset_channel().await?;
    remember(global, None);
    output::print_done(&undo_message(&undo), global.quiet);
    Ok(())
}

fn undo_message(undo: &AppliedChange) -> String {
    match undo.prior_channel {
        Some(channel) => format!(
            "Enabled {}, disabled {} (back on channel {channel})",
            undo.disabled, undo.enabled
        ),
        None => format!("Enabled {}, disabled {}", undo.disabled, undo.enabled),
    }
}

/// Persist the undo record. The AP is already changed, so a failed write
/// only costs the ability to undo.
fn remember(global: &GlobalOpts, change: Option<AppliedChange>) {
    let profile = config::current_profile_name(global);
    if let Err(e) = apcommand_config::record_change(&profile, change) {
        warn!(%profile, error = %e, "could not update channel-change record");
    }
}
