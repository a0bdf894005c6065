// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Trust Store Interface
//
// The local keyring is an external resource. Presence queries are read
// only; imports are the only mutation and succeed only when every key in
// the batch was imported.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use log::info;

use crate::error::Result;

/// A local PGP trust store driven through an external agent
pub trait TrustStore {
    /// Whether `key` is already in the keyring.
    ///
    /// Agent failures are errors, not "absent".
    fn contains(&self, key: &str) -> Result<bool>;

    /// Fetch and import all `keys`. Keys imported before a failure stay
    /// imported; the call still fails as a whole.
    fn import(&self, keys: &[String]) -> Result<()>;
}

/// Import `keys` in one batch. An empty list is a no-op.
pub fn import_keys<S: TrustStore + ?Sized>(store: &S, keys: &[String]) -> Result<()> {
    if keys.is_empty() {
        return Ok(());
    }
    info!("Importing {} PGP key(s)", keys.len());
    store.import(keys)
}
