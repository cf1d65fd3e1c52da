// Configuration module for noise injection runs
//
// This module handles loading and validating the settings that drive
// the corruption pass.

mod settings;

pub use settings::{default_probability, DateDiscipline, NoiseSettings};

use std::path::Path;

use crate::errors::{NoiseError, NoiseResult};

/// Load configuration from a file, or the defaults when no path is given.
/// The returned settings are already validated.
pub fn load_config(path: Option<&Path>) -> NoiseResult<NoiseSettings> {
    let settings = match path {
        Some(path) => settings::load(path).map_err(|e| match e {
            NoiseError::Io(io) => NoiseError::Config(format!(
                "Failed to read config {}: {}",
                path.display(),
                io
            )),
            other => other,
        })?,
        None => NoiseSettings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

/// Save configuration to a file
pub fn save_config(config: &NoiseSettings, path: &Path) -> NoiseResult<()> {
    settings::save(config, path)
}
