//! Version chain runner
//!
//! This module provides the `chain` subcommand. It builds the versions
//! `T0..TN`, where `Ti` is `T(i-1)` with `i -> i` inserted, and then checks
//! that every version still holds exactly the keys `1..=i`.

use anyhow::{Result, bail};
use clap::Args;
use persistent_treap::persistent::PersistentTreap;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Arguments for the chain subcommand
#[derive(Args, Debug)]
pub struct ChainArgs {
    /// Number of versions to build after the empty one
    #[arg(long, short = 'n')]
    pub count: u32,

    /// Random seed for the priority source (fresh entropy if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

fn priority_source(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}

/// Returns the first problem found in `version`, which should hold `1..=index`.
fn check_version(version: &PersistentTreap<u32, u32>, index: u32, count: u32) -> Option<String> {
    if version.len() != index as usize {
        return Some(format!("T{index} has size {} instead of {index}", version.len()));
    }
    if let Some(key) = (1..=index).find(|key| version.get(key) != Some(key)) {
        return Some(format!("T{index} lost key {key}"));
    }
    if let Some(key) = (index + 1..=count).find(|key| version.contains_key(key)) {
        return Some(format!("T{index} contains key {key} inserted later"));
    }
    version
        .validate()
        .err()
        .map(|violation| format!("T{index} is malformed: {violation}"))
}

/// Run the chain check
///
/// # Errors
///
/// Fails if any version does not hold exactly the keys inserted up to it.
pub fn run(args: &ChainArgs) -> Result<()> {
    let mut priorities = priority_source(args.seed);

    tracing::info!(count = args.count, seed = ?args.seed, "building version chain");
    let mut versions = Vec::with_capacity(args.count as usize + 1);
    versions.push(PersistentTreap::new());
    for key in 1..=args.count {
        let next = versions[versions.len() - 1].insert(key, key, &mut priorities);
        versions.push(next);
    }

    let mut failures = 0_usize;
    for (index, version) in (0..=args.count).zip(&versions) {
        if let Some(problem) = check_version(version, index, args.count) {
            tracing::error!("{problem}");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} versions failed the isolation check", versions.len());
    }

    let deepest = versions.last().map_or(0, PersistentTreap::depth);
    tracing::info!(versions = versions.len(), depth = deepest, "all versions isolated");
    Ok(())
}
