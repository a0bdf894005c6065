// SPDX-License-Identifier: GPL-2.0
//
// GhostBrew Keys - Aggregation and Prompt Benchmarks
//
// Criterion-based benchmarks over synthetic recipe sets.
//
// Copyright (C) 2025-2026 ghostkellz <ckelley@ghostkellz.sh>

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::collections::HashMap;

use ghostbrew_keys::{
    BaseGroups, BuildMetadata, KeySet, Package, Result, TrustStore, collect_missing_keys,
    format_keys_to_import,
};

/// Keyring where every even-numbered key is already present
struct HalfKeyring;

impl TrustStore for HalfKeyring {
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(key.ends_with(['0', '2', '4', '6', '8']))
    }

    fn import(&self, _keys: &[String]) -> Result<()> {
        Ok(())
    }
}

/// `nr_bases` recipes with three split packages and four keys each,
/// keys shared between neighbouring bases
fn recipes(nr_bases: usize) -> (Vec<Package>, BaseGroups, HashMap<String, BuildMetadata>) {
    let mut packages = Vec::new();
    let mut metadata = HashMap::new();

    for i in 0..nr_bases {
        let base = format!("pkg-{}", i);
        let keys = (0..4).map(|k| format!("{:040X}", i / 2 * 4 + k)).collect();
        let meta = BuildMetadata {
            pkgbase: base.clone(),
            pkgnames: vec![base.clone(), format!("{}-docs", base), format!("{}-headers", base)],
            validpgpkeys: keys,
        };
        packages.extend(meta.packages());
        metadata.insert(base, meta);
    }

    let bases = BaseGroups::from_packages(&packages);
    (packages, bases, metadata)
}

fn bench_collect_missing(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_missing_keys");

    for &nr_bases in &[1usize, 10, 100] {
        let (packages, _, metadata) = recipes(nr_bases);
        group.bench_with_input(
            BenchmarkId::new("bases", nr_bases),
            &nr_bases,
            |b, _| {
                b.iter(|| {
                    black_box(collect_missing_keys(&packages, &metadata, &HalfKeyring).ok())
                });
            },
        );
    }

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_keys_to_import");

    for &nr_bases in &[1usize, 10, 100] {
        let (packages, bases, metadata) = recipes(nr_bases);
        let missing: KeySet = match collect_missing_keys(&packages, &metadata, &HalfKeyring) {
            Ok(set) => set,
            Err(e) => panic!("aggregation failed: {}", e),
        };
        group.bench_with_input(
            BenchmarkId::new("bases", nr_bases),
            &missing,
            |b, missing| {
                b.iter(|| black_box(format_keys_to_import(missing, &bases).ok()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_collect_missing, bench_format);
criterion_main!(benches);
