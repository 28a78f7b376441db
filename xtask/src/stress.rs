//! Differential stress runner
//!
//! This module provides the `stress` subcommand. It applies random inserts,
//! removes and lookups to a persistent treap and a `BTreeMap` side by side,
//! keeps evenly spaced snapshots of both, and re-checks every snapshot
//! before it is dropped. The number of snapshots alive at once is capped,
//! so memory stays bounded however long the run is.

use anyhow::{Context, Result, bail};
use clap::Args;
use persistent_treap::persistent::PersistentTreap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Arguments for the stress subcommand
#[derive(Args, Debug)]
pub struct StressArgs {
    /// Scenario YAML file supplying defaults
    #[arg(long, short = 's')]
    pub scenario: Option<PathBuf>,

    /// Override number of operations
    #[arg(long)]
    pub operations: Option<u64>,

    /// Override key range; keys are drawn from `0..key_range`
    #[arg(long)]
    pub key_range: Option<u32>,

    /// Override random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override snapshot interval in operations
    #[arg(long)]
    pub snapshot_every: Option<u64>,

    /// Override the number of snapshots kept alive at once
    #[arg(long)]
    pub max_snapshots: Option<usize>,
}

/// Scenario configuration from YAML
#[derive(Debug, Default, Deserialize)]
struct ScenarioConfig {
    name: Option<String>,
    operations: Option<u64>,
    key_range: Option<u32>,
    seed: Option<u64>,
    snapshot_every: Option<u64>,
    max_snapshots: Option<usize>,
    /// Percentages of inserts and removes; the rest are lookups
    mix: Option<OperationMix>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct OperationMix {
    insert: u32,
    remove: u32,
}

impl Default for OperationMix {
    fn default() -> Self {
        Self {
            insert: 60,
            remove: 20,
        }
    }
}

/// Settings after merging the scenario with CLI overrides
#[derive(Debug)]
struct StressConfig {
    name: String,
    operations: u64,
    key_range: u32,
    seed: u64,
    snapshot_every: u64,
    max_snapshots: usize,
    mix: OperationMix,
}

impl StressConfig {
    /// Priority: CLI > Scenario YAML > Default
    fn from_args_and_scenario(args: &StressArgs, scenario: ScenarioConfig) -> Result<Self> {
        let config = Self {
            name: scenario.name.unwrap_or_else(|| "default".to_string()),
            operations: args.operations.or(scenario.operations).unwrap_or(100_000),
            key_range: args.key_range.or(scenario.key_range).unwrap_or(100_000),
            seed: args.seed.or(scenario.seed).unwrap_or(2022),
            snapshot_every: args
                .snapshot_every
                .or(scenario.snapshot_every)
                .unwrap_or(100),
            max_snapshots: args
                .max_snapshots
                .or(scenario.max_snapshots)
                .unwrap_or(32),
            mix: scenario.mix.unwrap_or_default(),
        };

        if config.key_range == 0 {
            bail!("key range must be positive");
        }
        if config.snapshot_every == 0 {
            bail!("snapshot interval must be positive");
        }
        if config.max_snapshots < 2 {
            bail!("at least two snapshots must be kept");
        }
        if config.mix.insert + config.mix.remove > 100 {
            bail!(
                "operation mix exceeds 100%: insert {} + remove {}",
                config.mix.insert,
                config.mix.remove
            );
        }
        Ok(config)
    }
}

fn load_scenario(path: Option<&PathBuf>) -> Result<ScenarioConfig> {
    let Some(path) = path else {
        return Ok(ScenarioConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    serde_yaml::from_str(&content).context("Failed to parse scenario YAML")
}

/// What a run observed
#[derive(Debug, PartialEq, Eq)]
struct StressReport {
    final_size: usize,
    max_depth: usize,
    snapshots_taken: usize,
    /// Snapshots still alive at the end and checked there
    snapshots_verified: usize,
}

type Snapshot = (PersistentTreap<u32, u64>, BTreeMap<u32, u64>);

fn verify_snapshot(step: u64, (version, frozen): &Snapshot) -> Result<()> {
    if !version.all_entries().into_iter().eq(frozen.iter()) {
        bail!("snapshot from step {step} no longer matches its BTreeMap copy");
    }
    version
        .validate()
        .with_context(|| format!("snapshot from step {step} is malformed"))
}

/// Snapshots taken every `interval` steps, at most `capacity` alive at once.
///
/// When full, every second snapshot is checked and dropped and the interval
/// doubles, so the survivors stay evenly spaced over the whole run.
struct SpacedSnapshots {
    interval: u64,
    capacity: usize,
    taken: usize,
    kept: Vec<(u64, Snapshot)>,
}

impl SpacedSnapshots {
    const fn new(interval: u64, capacity: usize) -> Self {
        Self {
            interval,
            capacity,
            taken: 0,
            kept: Vec::new(),
        }
    }

    fn is_due(&self, step: u64) -> bool {
        step % self.interval == 0
    }

    fn push(&mut self, step: u64, snapshot: Snapshot) -> Result<()> {
        if self.kept.len() == self.capacity {
            self.thin()?;
            if !self.is_due(step) {
                return Ok(());
            }
        }
        self.kept.push((step, snapshot));
        self.taken += 1;
        Ok(())
    }

    fn thin(&mut self) -> Result<()> {
        let mut retained = Vec::with_capacity(self.capacity);
        for (index, (step, snapshot)) in self.kept.drain(..).enumerate() {
            if index % 2 == 0 {
                retained.push((step, snapshot));
            } else {
                verify_snapshot(step, &snapshot)?;
            }
        }
        self.kept = retained;
        self.interval *= 2;
        tracing::debug!(interval = self.interval, "snapshots thinned");
        Ok(())
    }

    /// Checks every surviving snapshot and returns how many there were.
    fn verify_all(&self) -> Result<usize> {
        for (step, snapshot) in &self.kept {
            verify_snapshot(*step, snapshot)?;
        }
        Ok(self.kept.len())
    }
}

fn execute(config: &StressConfig) -> Result<StressReport> {
    let mut driver = StdRng::seed_from_u64(config.seed);
    let mut priorities = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let mut treap = PersistentTreap::new();
    let mut reference = BTreeMap::new();
    let mut snapshots = SpacedSnapshots::new(config.snapshot_every, config.max_snapshots);
    let mut max_depth = 0;

    for step in 0..config.operations {
        let roll = driver.random_range(0..100);
        let key = driver.random_range(0..config.key_range);

        if roll < config.mix.insert {
            let value: u64 = driver.random();
            treap = treap.insert(key, value, &mut priorities);
            reference.insert(key, value);
        } else if roll < config.mix.insert + config.mix.remove {
            treap = treap.remove(&key, &mut priorities);
            reference.remove(&key);
        } else if treap.get(&key) != reference.get(&key) {
            bail!("step {step}: lookup of {key} disagrees with BTreeMap");
        }

        if treap.len() != reference.len() {
            bail!(
                "step {step}: size {} disagrees with BTreeMap size {}",
                treap.len(),
                reference.len()
            );
        }

        if snapshots.is_due(step) {
            max_depth = max_depth.max(treap.depth());
            snapshots.push(step, (treap.clone(), reference.clone()))?;
            tracing::debug!(step, size = treap.len(), "snapshot taken");
        }
    }

    let snapshots_verified = snapshots.verify_all()?;
    Ok(StressReport {
        final_size: treap.len(),
        max_depth: max_depth.max(treap.depth()),
        snapshots_taken: snapshots.taken,
        snapshots_verified,
    })
}

/// Run the stress test
///
/// # Errors
///
/// Fails if the scenario cannot be loaded or the treap ever disagrees with
/// the reference map.
pub fn run(args: &StressArgs) -> Result<()> {
    let scenario = load_scenario(args.scenario.as_ref())?;
    let config = StressConfig::from_args_and_scenario(args, scenario)?;

    tracing::info!(
        scenario = %config.name,
        operations = config.operations,
        key_range = config.key_range,
        seed = config.seed,
        snapshot_every = config.snapshot_every,
        max_snapshots = config.max_snapshots,
        "starting stress run"
    );

    let report = execute(&config)?;

    tracing::info!(
        final_size = report.final_size,
        max_depth = report.max_depth,
        snapshots_taken = report.snapshots_taken,
        snapshots_verified = report.snapshots_verified,
        "stress run complete"
    );
    Ok(())
}
