//! CLI configuration: thin wrapper around `apcommand_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--host, --password, etc.).

use secrecy::SecretString;

use apcommand_core::ApConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use apcommand_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Profile name this invocation runs under, as used for keyring entries
/// and the channel-change record.
pub fn current_profile_name(global: &GlobalOpts) -> String {
    active_profile_name(global, &load_config_or_default())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    let names = config.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build the `ApConfig` for this invocation.
///
/// Flag (and flag env var) > profile > `[defaults]`. Without a matching
/// profile, `--host` alone is enough.
pub fn resolve_ap_config(global: &GlobalOpts) -> Result<ApConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => {
            let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
                path: config_path().display().to_string(),
            })?;
            Profile {
                host,
                ..Profile::default()
            }
        }
    };

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(settle_ms) = global.settle_ms {
        profile.settle_ms = Some(settle_ms);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let mut ap = apcommand_config::profile_to_ap_config(&profile, &profile_name, &cfg.defaults)?;
    if let Some(ref password) = global.password {
        ap.password = SecretString::from(password.clone());
    }
    Ok(ap)
}
