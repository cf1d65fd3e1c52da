// Settings module for configuration
//
// This module defines the settings structure and loading/saving functions
// for noise injection runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{self, probabilities};
use crate::errors::{NoiseError, NoiseResult};
use crate::mutators::MutationKind;

/// How date candidates combine within one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateDiscipline {
    /// Same as names: first successful draw wins
    #[default]
    FirstSuccess,
    /// Each candidate drawn on its own; shift and format may stack,
    /// a text token overrides both
    Independent,
}

/// Complete settings for a noise injection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    /// Seed of the shared random stream
    pub seed: u64,
    /// Multiplier applied to the default probabilities
    pub noise_level: f64,
    /// Width of the date shift window; derived from the noise level when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_date_shift_days: Option<u32>,
    /// Explicit probabilities keyed by mutation name, used verbatim
    pub overrides: BTreeMap<String, f64>,
    /// Whether date mutations stop at the first success
    pub date_discipline: DateDiscipline,
    /// Also mutate plaintext columns other than names and dates
    pub mutate_other_fields: bool,
    /// Where to write the JSON run report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            seed: constants::DEFAULT_SEED,
            noise_level: constants::DEFAULT_NOISE_LEVEL,
            max_date_shift_days: None,
            overrides: BTreeMap::new(),
            date_discipline: DateDiscipline::default(),
            mutate_other_fields: false,
            report_path: None,
        }
    }
}

/// Default probability of a mutation kind at noise level 1.0
pub fn default_probability(kind: MutationKind) -> f64 {
    match kind {
        MutationKind::Missing => probabilities::MISSING,
        MutationKind::Typo => probabilities::TYPO,
        MutationKind::CaseChange => probabilities::CASE_CHANGE,
        MutationKind::CharSwap => probabilities::CHAR_SWAP,
        MutationKind::Whitespace => probabilities::WHITESPACE,
        MutationKind::Suffix => probabilities::SUFFIX,
        MutationKind::DateShift => probabilities::DATE_SHIFT,
        MutationKind::DateFormat => probabilities::DATE_FORMAT,
        MutationKind::DateTextToken => probabilities::DATE_TEXT_TOKEN,
        MutationKind::NameSwap => probabilities::NAME_SWAP,
        MutationKind::EncodingSwap => probabilities::ENCODING_SWAP,
    }
}

impl NoiseSettings {
    /// Effective probability of a mutation kind.
    ///
    /// An override is used as given. Otherwise the default is scaled by the
    /// noise level and clamped to `[0, MAX_SCALED_PROBABILITY]`.
    pub fn probability(&self, kind: MutationKind) -> f64 {
        if let Some(p) = self.overrides.get(kind.name()) {
            return *p;
        }
        (default_probability(kind) * self.noise_level).clamp(0.0, constants::MAX_SCALED_PROBABILITY)
    }

    pub fn max_date_shift_days(&self) -> u32 {
        self.max_date_shift_days.unwrap_or_else(|| {
            let base = f64::from(constants::BASE_MAX_DATE_SHIFT_DAYS);
            let scaled = (base * self.noise_level).floor();
            (scaled as u32).max(1)
        })
    }

    /// Set an override by mutation kind
    pub fn set_probability(&mut self, kind: MutationKind, p: f64) {
        self.overrides.insert(kind.name().to_string(), p);
    }

    /// Reject settings that would make a run meaningless. Called before any
    /// mutation starts.
    pub fn validate(&self) -> NoiseResult<()> {
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(NoiseError::Config(format!(
                "noise_level must be a finite, non-negative number, got {}",
                self.noise_level
            )));
        }

        if self.max_date_shift_days == Some(0) {
            return Err(NoiseError::Config("max_date_shift_days must be at least 1".to_string()));
        }

        for (name, p) in &self.overrides {
            name.parse::<MutationKind>()?;
            if !p.is_finite() || !(0.0..=1.0).contains(p) {
                return Err(NoiseError::Config(format!(
                    "probability for '{}' must lie in [0, 1], got {}",
                    name, p
                )));
            }
        }

        Ok(())
    }
}

/// Load settings from a TOML file
pub fn load(path: impl AsRef<Path>) -> NoiseResult<NoiseSettings> {
    let config_str = fs::read_to_string(&path)?;
    let settings: NoiseSettings = toml::from_str(&config_str)?;
    Ok(settings)
}

/// Save settings to a TOML file
pub fn save(settings: &NoiseSettings, path: impl AsRef<Path>) -> NoiseResult<()> {
    let config_str = toml::to_string_pretty(settings)
        .map_err(|e| NoiseError::Config(format!("Failed to serialize settings: {}", e)))?;

    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, config_str)?;
    Ok(())
}
