// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Package Model
//
// Installable packages and the package-base groups they are built from.
// Several split packages can share one build recipe (package base).
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use std::collections::HashMap;

/// A buildable unit: installable name plus the recipe it comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub base: String,
}

impl Package {
    /// A package whose name equals its base
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            name: base.clone(),
            base,
        }
    }

    /// A split package built from `base`
    pub fn split(base: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
        }
    }
}

/// Base name -> member packages, in recipe order
#[derive(Debug, Clone, Default)]
pub struct BaseGroups {
    groups: HashMap<String, Vec<Package>>,
}

impl BaseGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group packages by base, keeping the order they were given in
    pub fn from_packages<'a>(packages: impl IntoIterator<Item = &'a Package>) -> Self {
        let mut groups = Self::new();
        for pkg in packages {
            groups.push(pkg.clone());
        }
        groups
    }

    /// Append a member to its base's group; a member already listed is kept once
    pub fn push(&mut self, pkg: Package) {
        let members = self.groups.entry(pkg.base.clone()).or_default();
        if !members.contains(&pkg) {
            members.push(pkg);
        }
    }

    /// Replace the whole group for `base`
    pub fn insert(&mut self, base: impl Into<String>, members: Vec<Package>) {
        self.groups.insert(base.into(), members);
    }

    pub fn get(&self, base: &str) -> Option<&[Package]> {
        self.groups.get(base).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
