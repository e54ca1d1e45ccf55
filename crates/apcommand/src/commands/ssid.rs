//! `ssid`: query or rename networks.

use serde::Serialize;
use tabled::Tabled;

use apcommand_core::{AccessPoint, Band};

use crate::cli::{BandArg, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct BandSsid {
    band: Band,
    ssid: String,
}

#[derive(Tabled)]
struct SsidRow {
    #[tabled(rename = "Band")]
    band: String,
    #[tabled(rename = "SSID")]
    ssid: String,
}

pub async fn handle(
    access_point: &AccessPoint,
    ssid: Option<String>,
    band: Option<BandArg>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let bands = band.map_or_else(|| vec![Band::TwoPointFour, Band::Five], |b| vec![super::band(b)]);

    if let Some(ssid) = ssid {
        validate(&ssid)?;
        for band in bands {
            access_point.set_ssid(band, &ssid).await?;
            output::print_done(&format!("SSID on {band} set to '{ssid}'"), global.quiet);
        }
        return Ok(());
    }

    let mut ssids = Vec::with_capacity(bands.len());
    for band in bands {
        ssids.push(BandSsid {
            band,
            ssid: access_point.ssid(band).await?,
        });
    }

    let out = output::render_list(
        &global.output,
        &ssids,
        |s| SsidRow {
            band: s.band.to_string(),
            ssid: s.ssid.clone(),
        },
        |s| s.ssid.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

/// 802.11 limits an SSID to 1-32 bytes.
fn validate(ssid: &str) -> Result<(), CliError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(CliError::Validation {
            field: "ssid".into(),
            reason: format!("must be 1-32 bytes, got {}", ssid.len()),
        });
    }
    Ok(())
}
