// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Build Recipe Metadata
//
// Reads the parts of a .SRCINFO needed for PGP checks: the package base,
// its split package names and the declared validpgpkeys.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{KeyError, Result};
use crate::package::Package;

pub const SRCINFO_FILE: &str = ".SRCINFO";

/// Per-base metadata produced from a build recipe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildMetadata {
    pub pkgbase: String,
    /// Split package names in recipe order
    pub pkgnames: Vec<String>,
    pub validpgpkeys: Vec<String>,
}

impl BuildMetadata {
    pub fn new(pkgbase: impl Into<String>, validpgpkeys: Vec<String>) -> Self {
        let pkgbase = pkgbase.into();
        Self {
            pkgnames: vec![pkgbase.clone()],
            pkgbase,
            validpgpkeys,
        }
    }

    /// Packages produced by this recipe, in recipe order
    pub fn packages(&self) -> Vec<Package> {
        if self.pkgnames.is_empty() {
            return vec![Package::new(self.pkgbase.clone())];
        }
        self.pkgnames
            .iter()
            .map(|name| Package::split(self.pkgbase.clone(), name.clone()))
            .collect()
    }
}

/// Declared signing keys for `base`.
///
/// Every base handed to the PGP check must have metadata; a missing entry
/// is reported instead of being treated as "no keys".
pub fn required_keys<'a>(
    base: &str,
    metadata: &'a HashMap<String, BuildMetadata>,
) -> Result<&'a [String]> {
    metadata
        .get(base)
        .map(|m| m.validpgpkeys.as_slice())
        .ok_or_else(|| KeyError::MissingMetadata {
            base: base.to_string(),
        })
}

/// Parse `<dir>/.SRCINFO`
pub fn parse_srcinfo(dir: &Path) -> Result<BuildMetadata> {
    let path = dir.join(SRCINFO_FILE);
    let content = fs::read_to_string(&path).map_err(|source| KeyError::Srcinfo {
        path: path.clone(),
        source,
    })?;

    let mut metadata = parse_srcinfo_str(&content);
    if metadata.pkgbase.is_empty() {
        if let Some(name) = dir.file_name() {
            metadata.pkgbase = name.to_string_lossy().into_owned();
        }
    }

    debug!(
        "{}: base {} with {} package(s), {} key(s)",
        path.display(),
        metadata.pkgbase,
        metadata.pkgnames.len(),
        metadata.validpgpkeys.len()
    );
    Ok(metadata)
}

/// Parse .SRCINFO content
pub fn parse_srcinfo_str(content: &str) -> BuildMetadata {
    let mut metadata = BuildMetadata::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        // Inline comments: "value # comment"
        let value = value.split('#').next().unwrap_or("").trim();
        if value.is_empty() {
            continue;
        }

        match key.trim() {
            "pkgbase" => metadata.pkgbase = value.to_string(),
            "pkgname" => metadata.pkgnames.push(value.to_string()),
            "validpgpkeys" => metadata.validpgpkeys.push(value.to_string()),
            _ => {}
        }
    }

    metadata
}

/// Load `<build_dir>/<dir>/.SRCINFO` for each requested checkout, in order.
///
/// Recipes are identified by their declared pkgbase, not the checkout
/// directory name. A pkgbase seen twice is loaded once.
pub fn load_build_metadata(build_dir: &Path, dirs: &[String]) -> Result<Vec<BuildMetadata>> {
    let mut recipes: Vec<BuildMetadata> = Vec::new();
    for dir in dirs {
        let metadata = parse_srcinfo(&build_dir.join(dir))?;
        if metadata.pkgbase != *dir {
            debug!("{}/{} declares pkgbase {}", build_dir.display(), dir, metadata.pkgbase);
        }
        if recipes.iter().any(|r| r.pkgbase == metadata.pkgbase) {
            debug!("Skipping {}: pkgbase {} already loaded", dir, metadata.pkgbase);
            continue;
        }
        recipes.push(metadata);
    }
    Ok(recipes)
}

/// Index recipes by pkgbase
pub fn metadata_by_base(recipes: Vec<BuildMetadata>) -> HashMap<String, BuildMetadata> {
    recipes
        .into_iter()
        .map(|metadata| (metadata.pkgbase.clone(), metadata))
        .collect()
}

/// Package bases with a .SRCINFO directly under `build_dir`, sorted
pub fn discover_bases(build_dir: &Path) -> Vec<String> {
    let pattern = format!(
        "{}/*/{}",
        glob::Pattern::escape(&build_dir.to_string_lossy()),
        SRCINFO_FILE
    );

    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            warn!("Invalid build directory pattern {}: {}", pattern, e);
            return Vec::new();
        }
    };

    let mut bases: Vec<String> = paths
        .filter_map(|entry| entry.ok())
        .filter_map(|path: PathBuf| {
            path.parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
        })
        .collect();
    bases.sort();
    bases
}
