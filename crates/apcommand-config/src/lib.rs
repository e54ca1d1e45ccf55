//! Shared configuration for apcommand.
//!
//! TOML profiles (one per access point), password resolution (env +
//! keyring + plaintext) and translation to `apcommand_core::ApConfig`.
//! The CLI layers its flag overrides on top.
//!
//! A small state file next to the config remembers each profile's last
//! channel change so a later `unset-channel` run can undo it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use apcommand_core::{ApConfig, AppliedChange};

/// Keyring service name for stored AP passwords.
pub const KEYRING_SERVICE: &str = "apcommand";

/// Password of the reference firmware when nothing else is configured.
pub const FACTORY_PASSWORD: &str = "admin";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named access point profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Option<(&str, &Profile)> {
        let name = name.or(self.default_profile.as_deref())?;
        self.profiles
            .get_key_value(name)
            .map(|(name, profile)| (name.as_str(), profile))
    }

    /// Profile names in sorted order.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Settle delay in milliseconds.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            settle_ms: default_settle_ms(),
            timeout: default_timeout(),
            retries: default_retries(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_settle_ms() -> u64 {
    100
}
fn default_timeout() -> u64 {
    10
}
fn default_retries() -> u32 {
    2
}

/// A named access point.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// AP address: a bare host ("192.168.1.1") or a URL.
    pub host: String,

    /// Basic-auth user; the reference firmware uses an empty one.
    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Override settle delay (milliseconds).
    pub settle_ms: Option<u64>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Override retry count.
    pub retries: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "apcommand", "apcommand").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("apcommand");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path`, layering defaults, file and `APCOMMAND_`
/// environment variables (`APCOMMAND_DEFAULTS__TIMEOUT=5`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("APCOMMAND_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Persisted state ─────────────────────────────────────────────────

/// Runtime state kept between invocations, separate from user config.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct State {
    /// Last verified channel change per profile.
    #[serde(default)]
    pub last_change: HashMap<String, AppliedChange>,
}

/// `state.toml`, in the same directory as the config file.
pub fn state_path() -> PathBuf {
    config_path().with_file_name("state.toml")
}

/// Load state from `path`; a missing file is an empty state.
pub fn load_state_from(path: &Path) -> Result<State, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(State::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&text).map_err(|e| ConfigError::Validation {
        field: "state".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

pub fn save_state_to(path: &Path, state: &State) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(state)?)?;
    Ok(())
}

/// The change recorded for `profile` at the canonical state path.
pub fn last_change(profile: &str) -> Result<Option<AppliedChange>, ConfigError> {
    last_change_in(&state_path(), profile)
}

pub fn last_change_in(path: &Path, profile: &str) -> Result<Option<AppliedChange>, ConfigError> {
    Ok(load_state_from(path)?.last_change.get(profile).copied())
}

/// Record (`Some`) or forget (`None`) the last change for `profile`.
pub fn record_change(profile: &str, change: Option<AppliedChange>) -> Result<(), ConfigError> {
    record_change_in(&state_path(), profile, change)
}

pub fn record_change_in(
    path: &Path,
    profile: &str,
    change: Option<AppliedChange>,
) -> Result<(), ConfigError> {
    let mut state = load_state_from(path)?;
    match change {
        Some(change) => {
            state.last_change.insert(profile.to_owned(), change);
        }
        None => {
            state.last_change.remove(profile);
        }
    }
    save_state_to(path, &state)
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/password"),
    )?)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(password)?;
    Ok(())
}

/// Resolve the AP password: profile's `password_env`, then
/// `APCOMMAND_PASSWORD`, then the keyring, then plaintext, then the
/// factory default.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> SecretString {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return SecretString::from(val);
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var("APCOMMAND_PASSWORD") {
        return SecretString::from(val);
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return SecretString::from(secret);
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return SecretString::from(pw.clone());
    }

    SecretString::from(FACTORY_PASSWORD)
}

/// Parse a profile host into the AP root URL. Bare hosts get `http://`.
pub fn host_url(host: &str) -> Result<Url, ConfigError> {
    let host = host.trim();
    let candidate = if host.contains("://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    };
    Url::parse(&candidate).map_err(|e| ConfigError::Validation {
        field: "host".into(),
        reason: format!("invalid URL '{host}': {e}"),
    })
}

/// Build an `ApConfig` from a profile and the global defaults.
pub fn profile_to_ap_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ApConfig, ConfigError> {
    let url = host_url(&profile.host)?;

    let settle_ms = profile.settle_ms.unwrap_or(defaults.settle_ms);
    if settle_ms == 0 {
        return Err(ConfigError::Validation {
            field: "settle_ms".into(),
            reason: "must be greater than zero".into(),
        });
    }

    Ok(ApConfig {
        url,
        username: profile.username.clone().unwrap_or_default(),
        password: resolve_password(profile, profile_name),
        settle: Duration::from_millis(settle_ms),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        retries: profile.retries.unwrap_or(defaults.retries),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use apcommand_core::{Band, Sideband};
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
settle_ms = 250
timeout = 5

[profiles.lab]
host = "192.168.1.1"
password = "hunter2"

[profiles.bench]
host = "https://10.0.0.2:8443"
username = "root"
settle_ms = 50
retries = 0
"#;

    fn load_sample() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let config = load_sample();

        assert_eq!(config.default_profile.as_deref(), Some("lab"));
        assert_eq!(config.defaults.settle_ms, 250);
        assert_eq!(config.defaults.timeout, 5);
        assert_eq!(config.defaults.retries, 2);
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.profile_names(), ["bench", "lab"]);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert!(config.profiles.is_empty());
        assert_eq!(config.defaults.settle_ms, 100);
    }

    #[test]
    fn profile_lookup_falls_back_to_default() {
        let config = load_sample();

        assert_eq!(config.profile(None).map(|(name, _)| name), Some("lab"));
        assert_eq!(
            config.profile(Some("bench")).map(|(_, p)| p.host.as_str()),
            Some("https://10.0.0.2:8443")
        );
        assert!(config.profile(Some("nope")).is_none());
    }

    #[test]
    fn profile_overrides_defaults() {
        let config = load_sample();
        let (name, bench) = config.profile(Some("bench")).unwrap();

        let ap = profile_to_ap_config(bench, name, &config.defaults).unwrap();
        assert_eq!(ap.url.as_str(), "https://10.0.0.2:8443/");
        assert_eq!(ap.username, "root");
        assert_eq!(ap.settle, Duration::from_millis(50));
        assert_eq!(ap.timeout, Duration::from_secs(5));
        assert_eq!(ap.retries, 0);
    }

    #[test]
    fn bare_host_gets_http_scheme() {
        assert_eq!(host_url("192.168.1.1").unwrap().as_str(), "http://192.168.1.1/");
        assert!(matches!(
            host_url("http://[bad"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn zero_settle_is_rejected() {
        let profile = Profile {
            host: "192.168.1.1".into(),
            settle_ms: Some(0),
            ..Profile::default()
        };
        let result = profile_to_ap_config(&profile, "zero", &Defaults::default());
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                host: "192.168.2.1".into(),
                timeout: Some(3),
                ..Profile::default()
            },
        );
        save_config_to(&path, &config).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (_, profile) = loaded.profile(None).unwrap();
        assert_eq!(profile.host, "192.168.2.1");
        assert_eq!(profile.timeout, Some(3));
    }

    #[test]
    fn recorded_change_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apcommand").join("state.toml");
        let change = AppliedChange {
            enabled: Band::Five,
            disabled: Band::TwoPointFour,
            prior_channel: Some(36),
            prior_sideband: Some(Sideband::Upper),
        };

        assert_eq!(last_change_in(&path, "lab").unwrap(), None);
        record_change_in(&path, "lab", Some(change)).unwrap();
        record_change_in(&path, "bench", Some(change)).unwrap();

        assert_eq!(last_change_in(&path, "lab").unwrap(), Some(change));

        record_change_in(&path, "lab", None).unwrap();
        assert_eq!(last_change_in(&path, "lab").unwrap(), None);
        assert_eq!(last_change_in(&path, "bench").unwrap(), Some(change));
    }

    #[test]
    fn state_without_prior_channel_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(
            &path,
            "[last_change.lab]\nenabled = \"2.4GHz\"\ndisabled = \"5GHz\"\n",
        )
        .unwrap();

        let change = last_change_in(&path, "lab").unwrap().unwrap();
        assert_eq!(change.enabled, Band::TwoPointFour);
        assert_eq!(change.prior_channel, None);
        assert_eq!(change.prior_sideband, None);
    }

    #[test]
    fn corrupt_state_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "last_change = 3").unwrap();

        assert!(matches!(
            load_state_from(&path),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn state_lives_next_to_config() {
        assert_eq!(state_path().parent(), config_path().parent());
    }
}
