// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Configuration Management
//
// Loads trust-store agent and build directory settings from TOML files.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gpg::AgentConfig;
use crate::process::Interrupt;

/// Main configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysConfig {
    /// gpg binary used for keyring queries and imports
    #[serde(default = "default_gpg_bin")]
    pub gpg_bin: String,

    /// Extra gpg flags, e.g. "--homedir ~/.gnupg-aur"
    #[serde(default)]
    pub gpg_flags: String,

    /// Key server to import from (gpg default when unset)
    #[serde(default)]
    pub keyserver: Option<String>,

    /// Directory holding one checkout per package base
    #[serde(default)]
    pub build_dir: Option<PathBuf>,

    /// Upper bound for a single gpg call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Import without asking
    #[serde(default)]
    pub noconfirm: bool,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            gpg_bin: default_gpg_bin(),
            gpg_flags: String::new(),
            keyserver: None,
            build_dir: None,
            timeout_secs: default_timeout_secs(),
            noconfirm: false,
        }
    }
}

fn default_gpg_bin() -> String {
    "gpg".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Standard config file locations (in priority order)
const CONFIG_PATHS: &[&str] = &[
    "/etc/ghostbrew-keys/config.toml",
    "~/.config/ghostbrew-keys/config.toml",
];

impl KeysConfig {
    /// Load configuration from standard paths
    pub fn load() -> Result<Self> {
        for path in CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            let path = PathBuf::from(expanded.as_ref());

            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: KeysConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        info!("Loaded config from {:?}", path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// gpg flags split on whitespace, each with `~` expanded
    pub fn gpg_flag_list(&self) -> Vec<String> {
        self.gpg_flags
            .split_whitespace()
            .map(|flag| shellexpand::tilde(flag).into_owned())
            .collect()
    }

    /// Configured build directory, or the per-user cache default
    pub fn build_dir(&self) -> PathBuf {
        match &self.build_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(&dir.to_string_lossy()).as_ref()),
            None => dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("/tmp"))
                .join("ghostbrew-keys"),
        }
    }

    /// Agent settings for the keyring
    pub fn agent_config(&self, interrupt: Interrupt) -> AgentConfig {
        AgentConfig {
            binary: self.gpg_bin.clone(),
            flags: self.gpg_flag_list(),
            keyserver: self.keyserver.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            interrupt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KeysConfig::default();
        assert_eq!(config.gpg_bin, "gpg");
        assert!(config.gpg_flag_list().is_empty());
        assert_eq!(config.timeout_secs, 120);
        assert!(!config.noconfirm);
        assert!(config.build_dir().ends_with("ghostbrew-keys"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
gpg_bin = "/usr/bin/gpg2"
gpg_flags = "--homedir /var/lib/aur/gnupg --batch"
keyserver = "hkps://keyserver.ubuntu.com"
timeout_secs = 30
"#;
        let config: KeysConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gpg_bin, "/usr/bin/gpg2");
        assert_eq!(
            config.gpg_flag_list(),
            vec!["--homedir", "/var/lib/aur/gnupg", "--batch"]
        );

        let agent = config.agent_config(Interrupt::new());
        assert_eq!(agent.binary, "/usr/bin/gpg2");
        assert_eq!(agent.keyserver.as_deref(), Some("hkps://keyserver.ubuntu.com"));
        assert_eq!(agent.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_tilde_in_flags() {
        let config = KeysConfig {
            gpg_flags: "--homedir ~/.gnupg-aur".to_string(),
            ..KeysConfig::default()
        };
        let flags = config.gpg_flag_list();
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[0], "--homedir");
        if let Some(home) = dirs::home_dir() {
            assert!(flags[1].starts_with(&*home.to_string_lossy()));
            assert!(flags[1].ends_with(".gnupg-aur"));
        }
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "noconfirm = true\nbuild_dir = \"/srv/aur\"\n").unwrap();

        let config = KeysConfig::load_from_path(&path).unwrap();
        assert!(config.noconfirm);
        assert_eq!(config.build_dir(), PathBuf::from("/srv/aur"));

        fs::write(&path, "timeout_secs = \"soon\"\n").unwrap();
        assert!(KeysConfig::load_from_path(&path).is_err());
    }
}
