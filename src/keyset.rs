// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Missing Key Aggregation
//
// Builds the set of signing keys that requested packages declare but the
// local keyring does not have, mapped to the package bases needing them.
// Presence is queried fresh on every run.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::keyring::TrustStore;
use crate::package::Package;
use crate::srcinfo::{BuildMetadata, required_keys};

/// Key ID -> packages requiring it.
///
/// Keys compare case-insensitively; the first spelling seen is kept.
/// Requirer lists are stored exactly as inserted. Iteration happens to
/// follow insertion order, but no order across keys is guaranteed and
/// callers must not rely on one.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    entries: Vec<(String, Vec<Package>)>,
    /// Uppercased key -> position in `entries`
    index: HashMap<String, usize>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `pkg` requires `key`
    pub fn insert(&mut self, key: &str, pkg: Package) {
        let normalized = key.to_uppercase();
        let idx = match self.index.get(&normalized) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.to_string(), Vec::new()));
                self.index.insert(normalized, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[idx].1.push(pkg);
    }

    pub fn get(&self, key: &str) -> Option<&[Package]> {
        self.index
            .get(&key.to_uppercase())
            .map(|&idx| self.entries[idx].1.as_slice())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&key.to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Package])> {
        self.entries
            .iter()
            .map(|(key, pkgs)| (key.as_str(), pkgs.as_slice()))
    }

    /// All keys, each once
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Vec<Package>)> for KeySet {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Package>)>>(iter: I) -> Self {
        let mut set = KeySet::new();
        for (key, pkgs) in iter {
            for pkg in pkgs {
                set.insert(key.as_ref(), pkg);
            }
        }
        set
    }
}

/// Serialized as `{ "KEY": ["base", ...] }`
impl Serialize for KeySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, pkgs) in &self.entries {
            let bases: Vec<&str> = pkgs.iter().map(|p| p.base.as_str()).collect();
            map.serialize_entry(key, &bases)?;
        }
        map.end()
    }
}

/// Collect the keys declared by `packages` that `store` does not have.
///
/// Each base is checked once, however many of its split packages were
/// requested, and is recorded under a key at most once. Fails if a base has
/// no metadata or the keyring cannot be queried.
pub fn collect_missing_keys<S: TrustStore + ?Sized>(
    packages: &[Package],
    metadata: &HashMap<String, BuildMetadata>,
    store: &S,
) -> Result<KeySet> {
    let mut missing = KeySet::new();
    let mut seen_bases = HashSet::new();
    let mut present_cache: HashMap<String, bool> = HashMap::new();

    for pkg in packages {
        if !seen_bases.insert(pkg.base.as_str()) {
            continue;
        }

        for key in required_keys(&pkg.base, metadata)? {
            let normalized = key.to_uppercase();
            let present = match present_cache.get(&normalized) {
                Some(&present) => present,
                None => {
                    let present = store.contains(key)?;
                    present_cache.insert(normalized, present);
                    present
                }
            };

            if present {
                continue;
            }

            let already_listed = missing
                .get(key)
                .is_some_and(|pkgs| pkgs.iter().any(|p| p.base == pkg.base));
            if !already_listed {
                missing.insert(key, Package::new(pkg.base.clone()));
            }
        }
    }

    debug!(
        "{} missing key(s) across {} base(s)",
        missing.len(),
        seen_bases.len()
    );
    Ok(missing)
}
