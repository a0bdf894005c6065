// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - PGP Check
//
// Entry point used before building: find missing validpgpkeys, ask once,
// import them all.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use log::info;
use std::collections::HashMap;

use crate::error::{KeyError, Result};
use crate::keyring::{TrustStore, import_keys};
use crate::keyset::collect_missing_keys;
use crate::package::{BaseGroups, Package};
use crate::prompt::{Confirm, format_keys_to_import};
use crate::srcinfo::BuildMetadata;

/// Make sure every key declared by `packages` is in `store`.
///
/// Succeeds without prompting when nothing is missing. A declined prompt is
/// an error so the build cannot continue past unverified sources.
pub fn check_pgp_keys<S, C>(
    packages: &[Package],
    bases: &BaseGroups,
    metadata: &HashMap<String, BuildMetadata>,
    store: &S,
    confirm: &C,
) -> Result<()>
where
    S: TrustStore + ?Sized,
    C: Confirm + ?Sized,
{
    let missing = collect_missing_keys(packages, metadata, store)?;
    if missing.is_empty() {
        info!("All PGP keys are present");
        return Ok(());
    }

    let question = format_keys_to_import(&missing, bases)?;
    if !confirm.confirm(&question)? {
        return Err(KeyError::ImportDeclined);
    }

    import_keys(store, &missing.keys())
}
