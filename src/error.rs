// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Error Types
//
// Every failure of the PGP check is terminal to the caller; nothing here is
// retried internally.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T, E = KeyError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum KeyError {
    /// A requested package base has no build metadata registered
    #[error("no build metadata for package base \"{base}\"")]
    MissingMetadata { base: String },

    /// The prompt formatter was called with nothing to import
    #[error("no keys to import")]
    EmptyKeySet,

    /// The trust-store agent could not be started
    #[error("failed to run {binary}: {source}")]
    AgentUnavailable {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("{binary} did not finish within {}s", .timeout.as_secs())]
    AgentTimeout { binary: String, timeout: Duration },

    #[error("interrupted")]
    Interrupted,

    /// One or more keys could not be fetched or imported
    #[error("problem importing keys: {}", .keys.join(" "))]
    ImportFailed { keys: Vec<String> },

    #[error("import of PGP keys declined")]
    ImportDeclined,

    #[error("failed to read confirmation: {0}")]
    Prompt(#[source] io::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Srcinfo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_failed_lists_keys() {
        let err = KeyError::ImportFailed {
            keys: vec!["KEY-1".to_string(), "KEY-2".to_string()],
        };
        assert_eq!(err.to_string(), "problem importing keys: KEY-1 KEY-2");
    }

    #[test]
    fn test_timeout_message() {
        let err = KeyError::AgentTimeout {
            binary: "gpg".to_string(),
            timeout: Duration::from_secs(120),
        };
        assert_eq!(err.to_string(), "gpg did not finish within 120s");
    }
}
