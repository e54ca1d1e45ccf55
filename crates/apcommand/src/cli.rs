//! Clap derive structures for the `apcommand` CLI.
//!
//! Defines the command tree, global flags and shared value types. Kept
//! free of workspace crates so `build.rs` can include it for man pages.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// apcommand -- script Broadcom and Atheros reference access points
#[derive(Debug, Parser)]
#[command(
    name = "apcommand",
    version,
    about = "Configure Wi-Fi access points from the command line",
    long_about = "Drives the web-administration forms of a Broadcom BCM94718NR \
        reference access point.\n\n\
        Bring radios up or down, move the AP between bands and channels, \
        rename networks and read back status without a browser.\n\n\
        The `atheros` subcommands drive an Atheros AR5K reference AP \
        through its telnet shell instead.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Access point profile to use
    #[arg(long, short = 'p', env = "APCOMMAND_PROFILE", global = true)]
    pub profile: Option<String>,

    /// AP address or URL (overrides profile)
    #[arg(long, env = "APCOMMAND_HOST", global = true)]
    pub host: Option<String>,

    /// Basic-auth username (overrides profile)
    #[arg(long, short = 'u', env = "APCOMMAND_USERNAME", global = true)]
    pub username: Option<String>,

    /// Basic-auth password (overrides profile and keyring)
    #[arg(long, env = "APCOMMAND_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Pause after every AP request, in milliseconds
    #[arg(long, env = "APCOMMAND_SETTLE_MS", global = true)]
    pub settle_ms: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, env = "APCOMMAND_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "APCOMMAND_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Band selection ───────────────────────────────────────────────────

/// A single radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BandArg {
    /// 2.4GHz radio (unit 0)
    #[value(name = "2.4", alias = "2", alias = "2.4ghz")]
    TwoPointFour,
    /// 5GHz radio (unit 1)
    #[value(name = "5", alias = "5ghz")]
    Five,
}

/// A radio, or both of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BandSelection {
    /// 2.4GHz radio only
    #[value(name = "2.4", alias = "2", alias = "2.4ghz")]
    TwoPointFour,
    /// 5GHz radio only
    #[value(name = "5", alias = "5ghz")]
    Five,
    /// Both radios
    Both,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show channel, SSID, state, sideband and MAC per radio
    #[command(alias = "st")]
    Status {
        /// Radio to report on
        #[arg(default_value = "both")]
        band: BandSelection,
    },

    /// Show the current channels, or move the AP to CHANNEL
    ///
    /// Setting a channel enables its band, disables the other one and
    /// verifies the AP applied the change. Valid channels: 1-11 (2.4GHz),
    /// 36, 44, 149, 157 (5GHz).
    #[command(alias = "ch")]
    Channel {
        /// Channel to switch to; omit to query both radios
        channel: Option<u16>,
    },

    /// Undo the last channel change recorded for this profile
    UnsetChannel,

    /// Show or set the network name
    Ssid {
        /// New SSID; omit to query
        ssid: Option<String>,

        /// Radio to address (default: both)
        #[arg(long, short = 'b')]
        band: Option<BandArg>,
    },

    /// Bring a radio up
    Enable {
        /// Radio to enable
        band: BandArg,
    },

    /// Take a radio down
    Disable {
        /// Radio to disable
        band: BandArg,
    },

    /// Drive an Atheros AR5K reference AP over telnet
    ///
    /// Uses --host, --username and --password when given, otherwise the
    /// factory settings (10.10.10.21, root, 5up).
    Atheros(AtherosArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ATHEROS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AtherosArgs {
    /// Telnet port
    #[arg(long, default_value_t = 23)]
    pub port: u16,

    #[command(subcommand)]
    pub command: AtherosCommand,
}

#[derive(Debug, Subcommand)]
pub enum AtherosCommand {
    /// Bring the AP up (apup)
    Up,

    /// Take the AP down (apdown)
    Down,

    /// Tear down a virtual AP
    Destroy {
        /// VAP name, e.g. ath0
        interface: String,
    },

    /// Show iwconfig, ifconfig and current channel per interface
    Status {
        /// Interfaces to query (default: ath0 ath1)
        interfaces: Vec<String>,
    },

    /// Restore the factory configuration
    Reset {
        /// Interface to configure through; the other one is torn down
        interface: InterfaceArg,
    },

    /// Set the network name
    Ssid {
        /// Interface to configure
        interface: InterfaceArg,
        /// New SSID
        ssid: String,
    },

    /// Move the AP to CHANNEL on the radio that carries it
    ///
    /// Valid channels: 1-11 (ath0), 36-64, 100-140 and 149-165 in steps
    /// of 4 (ath1).
    Channel {
        /// Channel to switch to
        channel: u16,

        /// 802.11 mode (default: 11ng on ath0, 11na on ath1)
        #[arg(long, short = 'm')]
        mode: Option<ModeArg>,
    },
}

/// An Atheros virtual AP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InterfaceArg {
    /// 2.4GHz interface
    Ath0,
    /// 5GHz interface
    Ath1,
}

/// 802.11 mode for an Atheros channel change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    #[value(name = "11na")]
    Na,
    #[value(name = "11ng")]
    Ng,
    #[value(name = "11a")]
    A,
    #[value(name = "11g")]
    G,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (passwords masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store an AP password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
