// ── Atheros AR5K access point ──
//
// The Atheros reference AP is driven from its root shell rather than from
// web forms. Radio settings go through `cfg`, bracketed by a configure
// sequence on one interface (VAP):
//
//   enter   apdown, cfg -a AP_RADIO_ID=<n>
//   body    cfg -x, cfg -a AP_SSID=..., cfg -a AP_CHMODE..., ...
//   exit    cfg -c, apup, wlanconfig <other interface> destroy
//
// The exit half always runs, so a failed body never leaves the AP down.
// One lock covers a whole sequence.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use apcommand_api::LineTransport;
use serde::Serialize;
use strum::EnumIter;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::CoreError;

pub const DEFAULT_HOST: &str = "10.10.10.21";
pub const DEFAULT_USERNAME: &str = "root";
pub const DEFAULT_PASSWORD: &str = "5up";

pub const CHANNELS_ATH0: &[u16] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
pub const CHANNELS_ATH1: &[u16] = &[
    36, 40, 44, 48, 52, 56, 60, 64, // UNII-1/2
    100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, // UNII-2e
    149, 153, 157, 161, 165, // UNII-3
];
const CHANNELS_ANY: &[u16] = &[
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 36, 40, 44, 48, 52, 56, 60, 64, 100, 104, 108, 112, 116,
    120, 124, 128, 132, 136, 140, 149, 153, 157, 161, 165,
];

/// Output line markers that mean a command did not take.
const NO_SUCH_DEVICE: &str = "No such device";
const DEVICE_NOT_FOUND: &str = "Device not found";

// ── Interface ────────────────────────────────────────────────────────

/// One of the AP's two virtual access points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    /// 2.4GHz radio.
    Ath0,
    /// 5GHz radio.
    Ath1,
}

impl Interface {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ath0 => "ath0",
            Self::Ath1 => "ath1",
        }
    }

    /// Value for `AP_RADIO_ID`.
    pub fn radio_id(self) -> u8 {
        match self {
            Self::Ath0 => 0,
            Self::Ath1 => 1,
        }
    }

    /// The interface torn down when this one is configured.
    pub fn other(self) -> Self {
        match self {
            Self::Ath0 => Self::Ath1,
            Self::Ath1 => Self::Ath0,
        }
    }

    /// Suffix of this radio's `cfg` parameters (`AP_PRIMARY_CH_2`).
    fn parameter_suffix(self) -> &'static str {
        match self {
            Self::Ath0 => "",
            Self::Ath1 => "_2",
        }
    }

    pub fn default_mode(self) -> Mode {
        match self {
            Self::Ath0 => Mode::Ng,
            Self::Ath1 => Mode::Na,
        }
    }

    pub fn valid_channels(self) -> &'static [u16] {
        match self {
            Self::Ath0 => CHANNELS_ATH0,
            Self::Ath1 => CHANNELS_ATH1,
        }
    }

    /// Fails with `InvalidChannel` unless this radio can use `channel`.
    pub fn validate_channel(self, channel: u16) -> Result<(), CoreError> {
        if self.valid_channels().contains(&channel) {
            Ok(())
        } else {
            Err(CoreError::InvalidChannel {
                channel,
                interface: self.name(),
                valid: self.valid_channels(),
            })
        }
    }

    /// The radio that carries `channel`. Channel sets do not overlap.
    pub fn for_channel(channel: u16) -> Option<Self> {
        [Self::Ath0, Self::Ath1]
            .into_iter()
            .find(|iface| iface.valid_channels().contains(&channel))
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Interface {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ath0" => Ok(Self::Ath0),
            "ath1" => Ok(Self::Ath1),
            _ => Err(CoreError::InvalidInterface {
                input: s.to_owned(),
            }),
        }
    }
}

// ── Mode ─────────────────────────────────────────────────────────────

/// 802.11 mode written to `AP_CHMODE` (always with `HT20`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, EnumIter)]
pub enum Mode {
    #[serde(rename = "11na")]
    Na,
    #[serde(rename = "11ng")]
    Ng,
    #[serde(rename = "11a")]
    A,
    #[serde(rename = "11g")]
    G,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Na => "11na",
            Self::Ng => "11ng",
            Self::A => "11a",
            Self::G => "11g",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "11na" => Ok(Self::Na),
            "11ng" => Ok(Self::Ng),
            "11a" => Ok(Self::A),
            "11g" => Ok(Self::G),
            _ => Err(CoreError::Config {
                message: format!("invalid mode '{s}' (expected 11na, 11ng, 11a or 11g)"),
            }),
        }
    }
}

// ── Status ───────────────────────────────────────────────────────────

/// What `iwconfig`, `ifconfig` and `iwlist` say about one interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceStatus {
    pub interface: String,
    /// `false` when a query reported the device missing.
    pub up: bool,
    /// Every non-empty output line, in query order.
    pub lines: Vec<String>,
}

// ── Access point ─────────────────────────────────────────────────────

/// An Atheros AR5K reference access point reached over its shell.
pub struct AtherosAp {
    transport: Arc<dyn LineTransport>,
    lock: Mutex<()>,
}

impl AtherosAp {
    pub fn new(transport: Arc<dyn LineTransport>) -> Self {
        Self {
            transport,
            lock: Mutex::new(()),
        }
    }

    /// Bring the AP up (`apup`).
    pub async fn up(&self) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;
        info!("bringing AP up");
        self.run("apup", None).await?;
        Ok(())
    }

    /// Take the AP down (`apdown`).
    pub async fn down(&self) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;
        info!("taking AP down");
        self.run("apdown", None).await?;
        Ok(())
    }

    /// Tear down a VAP. Fails if the AP has no such device.
    pub async fn destroy(&self, interface: &str) -> Result<(), CoreError> {
        let interface = vap_name(interface)?;
        let _guard = self.lock.lock().await;
        info!(interface, "destroying VAP");
        self.run(&format!("wlanconfig {interface} destroy"), Some(NO_SUCH_DEVICE))
            .await?;
        Ok(())
    }

    /// Query each interface; both radios when `interfaces` is empty.
    pub async fn status(&self, interfaces: &[&str]) -> Result<Vec<InterfaceStatus>, CoreError> {
        let names: Vec<&str> = if interfaces.is_empty() {
            vec![Interface::Ath0.name(), Interface::Ath1.name()]
        } else {
            interfaces.to_vec()
        };

        let _guard = self.lock.lock().await;
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let name = vap_name(name)?;
            out.push(self.interface_status(name).await?);
        }
        Ok(out)
    }

    /// Factory-reset the configuration (`cfg -x`) through `interface`.
    /// Both radios are reset; only the other VAP is torn down.
    pub async fn reset(&self, interface: Interface) -> Result<(), CoreError> {
        info!(%interface, "resetting AP configuration");
        self.configure(interface, &["cfg -x".to_owned()]).await
    }

    pub async fn set_ssid(&self, interface: Interface, ssid: &str) -> Result<(), CoreError> {
        let ssid = shell_value(ssid)?;
        info!(%interface, %ssid, "setting SSID");
        self.configure(interface, &[format!("cfg -a AP_SSID={ssid}")])
            .await
    }

    /// Move the AP to `channel` on the radio that carries it, with
    /// `mode` or that radio's default. Returns the radio used.
    pub async fn set_channel(
        &self,
        channel: u16,
        mode: Option<Mode>,
    ) -> Result<Interface, CoreError> {
        let interface = Interface::for_channel(channel).ok_or(CoreError::InvalidChannel {
            channel,
            interface: "ath0 or ath1",
            valid: CHANNELS_ANY,
        })?;
        self.set_channel_on(interface, channel, mode).await?;
        Ok(interface)
    }

    /// Set `channel` on `interface`, validating it against that radio.
    pub async fn set_channel_on(
        &self,
        interface: Interface,
        channel: u16,
        mode: Option<Mode>,
    ) -> Result<(), CoreError> {
        interface.validate_channel(channel)?;
        let mode = mode.unwrap_or_else(|| interface.default_mode());
        let suffix = interface.parameter_suffix();
        info!(%interface, channel, %mode, "changing channel");
        self.configure(
            interface,
            &[
                format!("cfg -a AP_CHMODE{suffix}={mode}HT20"),
                format!("cfg -a AP_PRIMARY_CH{suffix}={channel}"),
            ],
        )
        .await
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn configure(&self, interface: Interface, settings: &[String]) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;

        let body = self.configure_body(interface, settings).await;
        let exit = self.configure_exit(interface).await;
        match body {
            Err(e) => {
                if let Err(exit_err) = exit {
                    warn!(%interface, error = %exit_err, "could not bring AP back up");
                }
                Err(e)
            }
            Ok(()) => exit,
        }
    }

    async fn configure_body(&self, interface: Interface, settings: &[String]) -> Result<(), CoreError> {
        self.run("apdown", None).await?;
        self.run(&format!("cfg -a AP_RADIO_ID={}", interface.radio_id()), None)
            .await?;
        for setting in settings {
            self.run(setting, None).await?;
        }
        Ok(())
    }

    async fn configure_exit(&self, interface: Interface) -> Result<(), CoreError> {
        self.run("cfg -c", None).await?;
        self.run("apup", None).await?;
        self.run(&format!("wlanconfig {} destroy", interface.other()), None)
            .await?;
        Ok(())
    }

    async fn interface_status(&self, name: &str) -> Result<InterfaceStatus, CoreError> {
        let queries = [
            (format!("iwconfig {name}"), Some(NO_SUCH_DEVICE)),
            (format!("ifconfig {name} | grep 'inet addr'"), Some(DEVICE_NOT_FOUND)),
            (format!("iwlist {name} channel | grep Current"), None),
        ];

        let mut lines = Vec::new();
        for (line, failure) in &queries {
            match self.run(line, *failure).await {
                Ok(output) => lines.extend(output),
                Err(CoreError::CommandFailed { output, .. }) => {
                    info!(interface = name, "interface seems to be down");
                    lines.push(output);
                    return Ok(InterfaceStatus {
                        interface: name.to_owned(),
                        up: false,
                        lines,
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(InterfaceStatus {
            interface: name.to_owned(),
            up: true,
            lines,
        })
    }

    /// Run one shell line. Returns its non-empty output lines; a line
    /// containing `failure` turns into `CommandFailed`.
    async fn run(&self, line: &str, failure: Option<&str>) -> Result<Vec<String>, CoreError> {
        let result = self.transport.exec(line).await?;
        for err in result.error.iter().filter(|l| !l.trim().is_empty()) {
            warn!(command = line, "{}", err.trim_end());
        }

        let mut out = Vec::with_capacity(result.output.len());
        for output in result.output.iter().map(|l| l.trim_end()) {
            if output.is_empty() {
                continue;
            }
            if failure.is_some_and(|marker| output.contains(marker)) {
                return Err(CoreError::CommandFailed {
                    command: line.to_owned(),
                    output: output.to_owned(),
                });
            }
            debug!(command = line, "{output}");
            out.push(output.to_owned());
        }
        Ok(out)
    }
}

/// Interface names go into shell lines unquoted.
fn vap_name(name: &str) -> Result<&str, CoreError> {
    let name = name.trim();
    if !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(name)
    } else {
        Err(CoreError::InvalidInterface {
            input: name.to_owned(),
        })
    }
}

/// SSIDs are 1-32 bytes; anything beyond plain words is single-quoted.
fn shell_value(ssid: &str) -> Result<String, CoreError> {
    let invalid = |reason: &str| CoreError::Config {
        message: format!("invalid SSID '{ssid}': {reason}"),
    };
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(invalid("must be 1-32 bytes"));
    }
    if ssid.contains('\'') || ssid.chars().any(char::is_control) {
        return Err(invalid("quotes and control characters are not allowed"));
    }
    if ssid
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(ssid.to_owned())
    } else {
        Ok(format!("'{ssid}'"))
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn channel_sets_follow_regulatory_steps() {
        assert_eq!(CHANNELS_ATH1.len(), 24);
        assert!(CHANNELS_ATH1.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Interface::for_channel(11), Some(Interface::Ath0));
        assert_eq!(Interface::for_channel(165), Some(Interface::Ath1));
        assert_eq!(Interface::for_channel(12), None);
        assert_eq!(Interface::for_channel(38), None);
    }

    #[test]
    fn combined_channel_list_covers_both_radios() {
        let mut both = [CHANNELS_ATH0, CHANNELS_ATH1].concat();
        both.sort_unstable();
        assert_eq!(both, CHANNELS_ANY);
    }

    #[test]
    fn interfaces_pair_up() {
        for iface in Interface::iter() {
            assert_eq!(iface.other().other(), iface);
            assert_eq!(iface.name().parse::<Interface>().unwrap(), iface);
        }
        assert!(matches!(
            "ath2".parse::<Interface>(),
            Err(CoreError::InvalidInterface { .. })
        ));
    }

    #[test]
    fn validate_channel_names_the_channel() {
        let err = Interface::Ath0.validate_channel(36).unwrap_err();
        assert!(err.to_string().starts_with("Invalid Channel: 36"), "{err}");
        Interface::Ath1.validate_channel(100).unwrap();
    }

    #[test]
    fn modes_parse_case_insensitively() {
        for mode in Mode::iter() {
            assert_eq!(mode.as_str().to_uppercase().parse::<Mode>().unwrap(), mode);
        }
        assert!("11ac".parse::<Mode>().is_err());
    }

    #[test]
    fn ssids_are_quoted_only_when_needed() {
        assert_eq!(shell_value("lab-5").unwrap(), "lab-5");
        assert_eq!(shell_value("my lab").unwrap(), "'my lab'");
        assert!(shell_value("").is_err());
        assert!(shell_value("it's").is_err());
        assert!(shell_value(&"x".repeat(33)).is_err());
    }

    #[test]
    fn vap_names_reject_shell_syntax() {
        assert_eq!(vap_name(" ath2 ").unwrap(), "ath2");
        assert!(vap_name("ath0; reboot").is_err());
        assert!(vap_name("").is_err());
    }
}
