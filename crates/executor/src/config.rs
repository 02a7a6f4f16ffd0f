use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use std::path::Path;

use super::error::Error;

/// Default location, relative to the workspace root.
pub const DEFAULT_CONFIG_PATH: &str = "crates/executor/Config.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PathsConfig {
    pub default_length: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SweepConfig {
    pub max_concurrency: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulatorConfig {
    pub trials: usize,
    pub participants: usize,
    pub probability: f64,
    pub threshold: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub paths: PathsConfig,
    pub sweep: SweepConfig,
    pub simulator: SimulatorConfig,
}

/// Loads configuration from built-in defaults, a TOML file and environment variables.
///
/// The file is optional unless `required` is set (an explicit `--config`).
/// Environment variables use the `NEGCYCLE` prefix with `__` between
/// section and key, e.g. `NEGCYCLE__SWEEP__MAX_CONCURRENCY=8`.
pub fn load_config(path: &Path, required: bool) -> Result<Config, Error> {
    if required && !path.exists() {
        return Err(Error::ConfigLoadError(format!(
            "Configuration file not found at: {}",
            path.display()
        )));
    }

    let s = ConfigLoader::builder()
        .set_default("paths.default_length", 6)
        .and_then(|b| b.set_default("sweep.max_concurrency", 4))
        .and_then(|b| b.set_default("simulator.trials", 10_000))
        .and_then(|b| b.set_default("simulator.participants", 12))
        .and_then(|b| b.set_default("simulator.probability", 0.85))
        .and_then(|b| b.set_default("simulator.threshold", 11))
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?
        .add_source(File::from(path).required(required))
        .add_source(
            Environment::with_prefix("NEGCYCLE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| Error::ConfigLoadError(e.to_string()))?;

    let app_config: Config = s
        .try_deserialize()
        .map_err(|e| Error::ConfigLoadError(format!("Failed to deserialize config: {}", e)))?;

    if app_config.sweep.max_concurrency == 0 {
        return Err(Error::ConfigLoadError(
            "sweep.max_concurrency must be at least 1".into(),
        ));
    }

    Ok(app_config)
}
