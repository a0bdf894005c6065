// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - GnuPG Keyring
//
// Trust store backed by the gpg binary: `--list-keys` for presence,
// `--recv-keys` for import. Only the exit status is consumed.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use log::{debug, info, warn};
use std::time::Duration;

use crate::error::{KeyError, Result};
use crate::keyring::TrustStore;
use crate::process::{Interrupt, Output, run_agent};

/// How to reach the trust-store agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// gpg binary (name or path)
    pub binary: String,
    /// Extra flags placed before every command, e.g. `--homedir <dir>`
    pub flags: Vec<String>,
    /// Key server for imports; gpg's own default when unset
    pub keyserver: Option<String>,
    /// Upper bound for a single agent call
    pub timeout: Duration,
    pub interrupt: Interrupt,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            binary: "gpg".to_string(),
            flags: Vec::new(),
            keyserver: None,
            timeout: Duration::from_secs(120),
            interrupt: Interrupt::new(),
        }
    }
}

impl AgentConfig {
    /// Point the agent at an alternate keyring home
    pub fn with_homedir(mut self, dir: &std::path::Path) -> Self {
        self.flags.push("--homedir".to_string());
        self.flags.push(dir.to_string_lossy().into_owned());
        self
    }
}

pub struct GpgKeyring {
    config: AgentConfig,
}

impl GpgKeyring {
    pub fn new(config: AgentConfig) -> Self {
        Self { config }
    }

    fn list_keys_args(&self, key: &str) -> Vec<String> {
        let mut args = self.config.flags.clone();
        args.push("--list-keys".to_string());
        args.push(key.to_string());
        args
    }

    fn recv_keys_args(&self, keys: &[String]) -> Vec<String> {
        let mut args = self.config.flags.clone();
        if let Some(server) = &self.config.keyserver {
            args.push("--keyserver".to_string());
            args.push(server.clone());
        }
        args.push("--recv-keys".to_string());
        args.extend(keys.iter().cloned());
        args
    }
}

impl TrustStore for GpgKeyring {
    fn contains(&self, key: &str) -> Result<bool> {
        let status = run_agent(
            &self.config.binary,
            &self.list_keys_args(key),
            self.config.timeout,
            &self.config.interrupt,
            Output::Quiet,
        )?;
        let present = status.success();
        debug!(
            "Key {} {}",
            key,
            if present { "is present" } else { "is missing" }
        );
        Ok(present)
    }

    fn import(&self, keys: &[String]) -> Result<()> {
        println!(":: Importing keys with gpg...");
        let status = run_agent(
            &self.config.binary,
            &self.recv_keys_args(keys),
            self.config.timeout,
            &self.config.interrupt,
            Output::Inherit,
        )?;

        if status.success() {
            info!("Imported {} key(s)", keys.len());
            Ok(())
        } else {
            warn!("{} --recv-keys failed with {}", self.config.binary, status);
            Err(KeyError::ImportFailed {
                keys: keys.to_vec(),
            })
        }
    }
}
