//! `status`: one row per radio.

use std::fmt::Write as _;

use tabled::Tabled;

use apcommand_core::{AccessPoint, BandStatus};

use crate::cli::{BandSelection, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Sideband")]
    sideband: String,
    #[tabled(rename = "Bandwidth")]
    bandwidth: String,
    #[tabled(rename = "MAC")]
    mac_address: String,
}

fn to_row(status: &BandStatus, color: bool) -> StatusRow {
    StatusRow {
        band: status.band.to_string(),
        channel: status.channel.clone(),
        ssid: status.ssid.clone(),
        state: output::paint_state(&status.state, color),
        sideband: status.sideband.clone().unwrap_or_else(|| "-".into()),
        bandwidth: status.bandwidth.clone().unwrap_or_else(|| "-".into()),
        mac_address: status.mac_address.clone(),
    }
}

fn plain(status: &BandStatus) -> String {
    let mut out = format!("{}:\n", status.band);
    let _ = writeln!(out, "\tChannel: {}", status.channel);
    let _ = writeln!(out, "\tSSID: {}", status.ssid);
    let _ = writeln!(out, "\tState: {}", status.state);
    if let Some(ref sideband) = status.sideband {
        let _ = writeln!(out, "\tSideband: {sideband}");
    }
    let _ = write!(out, "\tMAC: {}", status.mac_address);
    out
}

pub async fn handle(
    access_point: &AccessPoint,
    selection: BandSelection,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let statuses = access_point.status(&super::bands(selection)).await?;
    let color = output::should_color(&global.color);
    let out = output::render_list(&global.output, &statuses, |s| to_row(s, color), plain);
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
mod tests {
    use apcommand_core::Band;

    use super::*;

    #[test]
    fn plain_lists_fields_per_band() {
        let status = BandStatus {
            band: Band::Five,
            channel: "44".into(),
            ssid: "lab".into(),
            state: "Enabled".into(),
            sideband: Some("Lower".into()),
            mac_address: "(00:90:4C:13:11:03)".into(),
            bandwidth: None,
        };
        assert_eq!(
            plain(&status),
            "5GHz:\n\tChannel: 44\n\tSSID: lab\n\tState: Enabled\n\tSideband: Lower\n\tMAC: (00:90:4C:13:11:03)"
        );
    }
}
