//! `atheros` subcommands: Atheros AR5K reference AP over telnet.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tabled::Tabled;

use apcommand_api::TelnetClient;
use apcommand_core::atheros::{DEFAULT_HOST, DEFAULT_PASSWORD, DEFAULT_USERNAME};
use apcommand_core::{AtherosAp, Interface, InterfaceStatus, Mode};

use crate::cli::{AtherosArgs, AtherosCommand, GlobalOpts, InterfaceArg, ModeArg};
use crate::error::CliError;
use crate::output;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Details")]
    details: String,
}

fn to_row(status: &InterfaceStatus, color: bool) -> InterfaceRow {
    InterfaceRow {
        interface: status.interface.clone(),
        state: output::paint_state(state(status), color),
        details: status
            .lines
            .iter()
            .map(|l| l.trim())
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn state(status: &InterfaceStatus) -> &'static str {
    if status.up { "Enabled" } else { "Disabled" }
}

fn plain(status: &InterfaceStatus) -> String {
    let mut out = format!("{} ({})", status.interface, state(status));
    for line in &status.lines {
        out.push_str("\n\t");
        out.push_str(line.trim());
    }
    out
}

/// Telnet client from the global flags, falling back to factory settings.
fn connect(args: &AtherosArgs, global: &GlobalOpts) -> AtherosAp {
    let host = global.host.as_deref().unwrap_or(DEFAULT_HOST);
    let username = global.username.as_deref().unwrap_or(DEFAULT_USERNAME);
    let password = global.password.as_deref().unwrap_or(DEFAULT_PASSWORD);
    let timeout = Duration::from_secs(global.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS));
    tracing::debug!(host, port = args.port, username, "connecting to Atheros AP");

    let client = TelnetClient::new(host, username, SecretString::from(password.to_owned()), timeout)
        .with_port(args.port);
    AtherosAp::new(Arc::new(client))
}

pub async fn handle(args: AtherosArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let ap = connect(&args, global);

    match args.command {
        AtherosCommand::Up => {
            ap.up().await?;
            output::print_done("AP up", global.quiet);
        }
        AtherosCommand::Down => {
            ap.down().await?;
            output::print_done("AP down", global.quiet);
        }
        AtherosCommand::Destroy { interface } => {
            ap.destroy(&interface).await?;
            output::print_done(&format!("{interface} destroyed"), global.quiet);
        }
        AtherosCommand::Status { interfaces } => {
            let names: Vec<&str> = interfaces.iter().map(String::as_str).collect();
            let statuses = ap.status(&names).await?;
            let color = output::should_color(&global.color);
            let out = output::render_list(&global.output, &statuses, |s| to_row(s, color), plain);
            output::print_output(&out, global.quiet);
        }
        AtherosCommand::Reset { interface } => {
            let interface = self::interface(interface);
            ap.reset(interface).await?;
            output::print_done(
                &format!("Configuration reset through {interface}"),
                global.quiet,
            );
        }
        AtherosCommand::Ssid { interface, ssid } => {
            let interface = self::interface(interface);
            ap.set_ssid(interface, &ssid).await?;
            output::print_done(&format!("{interface} SSID set to {ssid}"), global.quiet);
        }
        AtherosCommand::Channel { channel, mode } => {
            let interface = ap.set_channel(channel, mode.map(self::mode)).await?;
            output::print_done(
                &format!("Channel set to {channel} ({interface})"),
                global.quiet,
            );
        }
    }
    Ok(())
}

fn interface(arg: InterfaceArg) -> Interface {
    match arg {
        InterfaceArg::Ath0 => Interface::Ath0,
        InterfaceArg::Ath1 => Interface::Ath1,
    }
}

fn mode(arg: ModeArg) -> Mode {
    match arg {
        ModeArg::Na => Mode::Na,
        ModeArg::Ng => Mode::Ng,
        ModeArg::A => Mode::A,
        ModeArg::G => Mode::G,
    }
}
