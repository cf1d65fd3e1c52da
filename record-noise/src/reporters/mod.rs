// record-noise/src/reporters/mod.rs
//! Run reports: what was applied, what was skipped

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::NoiseResult;
use crate::mutators::MutationKind;

/// Reason recorded for values a mutator could not interpret
pub const FIELD_FORMAT: &str = "field_format";

/// Summary of one corruption pass over one dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoiseReport {
    /// Input the dataset came from, if any
    pub source: Option<String>,
    pub seed: u64,
    pub records: usize,
    /// Field name -> mutation name -> count
    pub applied: BTreeMap<String, BTreeMap<String, u64>>,
    /// Field name -> reason -> fields left unchanged
    pub skipped: BTreeMap<String, BTreeMap<String, u64>>,
    pub name_swaps: u64,
    pub swap_triggers: u64,
    pub encoding_swaps: u64,
    /// Triggers that found no partner (dataset smaller than two records)
    pub unpaired_triggers: u64,
    pub rng_draws: u64,
}

impl NoiseReport {
    pub fn new(seed: u64, records: usize) -> Self {
        Self {
            seed,
            records,
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn record_applied(&mut self, field: &str, kind: MutationKind) {
        *self
            .applied
            .entry(field.to_string())
            .or_default()
            .entry(kind.name().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_skipped(&mut self, field: &str, reason: &str) {
        *self
            .skipped
            .entry(field.to_string())
            .or_default()
            .entry(reason.to_string())
            .or_insert(0) += 1;
    }

    pub fn skipped_count(&self, field: &str, reason: &str) -> u64 {
        self.skipped
            .get(field)
            .and_then(|reasons| reasons.get(reason))
            .copied()
            .unwrap_or(0)
    }

    pub fn applied_count(&self, field: &str, kind: MutationKind) -> u64 {
        self.applied
            .get(field)
            .and_then(|kinds| kinds.get(kind.name()))
            .copied()
            .unwrap_or(0)
    }

    /// Count of a mutation kind across every field
    pub fn total_applied(&self, kind: MutationKind) -> u64 {
        self.applied
            .values()
            .filter_map(|kinds| kinds.get(kind.name()))
            .sum()
    }

    /// All field-level mutations applied to one field
    pub fn field_total(&self, field: &str) -> u64 {
        self.applied.get(field).map(|kinds| kinds.values().sum()).unwrap_or(0)
    }

    pub fn skipped_total(&self) -> u64 {
        self.skipped.values().flat_map(|reasons| reasons.values()).sum()
    }

    /// Print the summary through the log facade
    pub fn log_summary(&self) {
        info!("=== Noise Injection Results ===");
        if let Some(source) = &self.source {
            info!("Source: {}", source);
        }
        info!("Seed: {}, records: {}", self.seed, self.records);

        for (field, kinds) in &self.applied {
            for (kind, count) in kinds {
                info!("  {}.{}: {}", field, kind, count);
            }
        }

        if !self.skipped.is_empty() {
            info!("Skipped fields:");
            for (field, reasons) in &self.skipped {
                for (reason, count) in reasons {
                    info!("  {}.{}: {}", field, reason, count);
                }
            }
        }

        info!(
            "Name swaps: {}, swap triggers: {}, encoding swaps: {}, unpaired triggers: {}",
            self.name_swaps, self.swap_triggers, self.encoding_swaps, self.unpaired_triggers
        );
        info!("Random draws: {}", self.rng_draws);
    }
}

/// Write reports as pretty JSON, creating parent directories as needed
pub fn write_reports(reports: &[NoiseReport], path: &Path) -> NoiseResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(reports)?;
    fs::write(path, json)?;
    Ok(())
}
