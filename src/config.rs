//! # Configuration Management

//! This module handles the configuration loading for the plant simulator.
//! It leverages the `config` crate to layer the application settings from:

//! * YAML configuration files (default.yaml, then an optional file named after `RUN_MODE`)
//! * Environment variables prefixed with `APP`

//! The PLC fleet manifest is a separate declarative document. Its absence is not an error: it simply leaves PLC
//! simulation disabled for the process.

use serde::{Deserialize, Serialize};
use config::{Config, Environment, File};
use indexmap::IndexMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::errors::{SimulatorError, SimulatorResult};

/// Represents the complete set of configuration settings for the plant simulator.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Settings for application logging
    pub logging: LoggingSettings,
    /// Settings for the sensor and PLC simulation engine
    pub simulator: SimulatorSettings,
}

/// Holds the configuration settings for application logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    /// The logging level used when `RUST_LOG` is not set (e.g., "info", "debug")
    pub level: String,
    /// The directory path where log files will be stored (optional)
    pub path: Option<PathBuf>,
}

/// Holds the configuration settings of the simulation engine
#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorSettings {
    /// Seed for every random generator in the engine; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Path to the PLC fleet manifest (optional)
    pub plc_manifest: Option<PathBuf>,
    /// How often the built-in poller reads every sensor, in milliseconds
    pub poll_interval_ms: u64,
    /// How often the poller logs a quality summary, in seconds
    pub report_interval_secs: u64,
}

impl Settings {
    /// Loads and constructs the application settings from various configuration sources.
    ///
    /// Sources, in order of precedence (later wins):
    ///
    /// 1. Built-in defaults
    /// 2. `default.yaml` in `CONFIG_DIR` (optional)
    /// 3. `{RUN_MODE}.yaml` in `CONFIG_DIR` (optional, `RUN_MODE` defaults to "development")
    /// 4. Environment variables prefixed with `APP` (e.g., `APP__SIMULATOR__SEED`)
    ///
    /// `CONFIG_DIR` defaults to "config".
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)`: If the settings were loaded and constructed successfully
    /// * `Err(SimulatorError)`: If a source could not be read or deserialized
    pub fn new() -> SimulatorResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        debug!("Run Mode: {:?}, Config Dir: {:?}", run_mode, config_dir);

        let s = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("simulator.poll_interval_ms", 1000)?
            .set_default("simulator.report_interval_secs", 30)?
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut s: Self = s.try_deserialize::<Settings>()
            .map_err(SimulatorError::from)?;

        if let Some(ref mut path) = s.logging.path {
            *path = env::current_dir()?.join(path.clone());
        }

        Ok(s)
    }
}

/// Global switches applied to every PLC in the fleet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobalPlcSettings {
    pub enable_simulation: bool,
    pub simulate_scan_delays: bool,
    pub simulate_quality_issues: bool,
    pub quality_issue_probability: f64,
    pub simulate_comm_failures: bool,
    pub comm_failure_probability: f64,
    pub allow_forcing: bool,
}

impl Default for GlobalPlcSettings {
    fn default() -> Self {
        Self {
            enable_simulation: false,
            simulate_scan_delays: false,
            simulate_quality_issues: false,
            quality_issue_probability: 0.0,
            simulate_comm_failures: false,
            comm_failure_probability: 0.0,
            allow_forcing: true,
        }
    }
}

/// One controller declared in the fleet manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlcEntryConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Vendor tag, validated at load time so a bad entry fails alone
    pub vendor: String,
    pub model: String,
    #[serde(default)]
    pub industries: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

/// The declarative PLC fleet manifest. Entries keep their document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlcFleetConfig {
    #[serde(default)]
    pub global_settings: GlobalPlcSettings,
    #[serde(default)]
    pub plcs: IndexMap<String, PlcEntryConfig>,
}

impl PlcFleetConfig {
    /// Reads a fleet manifest, choosing the parser from the file extension (`.yaml`, `.yml` or `.json`).
    pub fn from_path(path: &Path) -> SimulatorResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
            Some("json") => Ok(serde_json::from_str(&contents)?),
            _ => Err(SimulatorError::ConfigError(format!(
                "unsupported PLC manifest format: {}",
                path.display()
            ))),
        }
    }

    /// Loads the manifest if one is configured and present on disk.
    ///
    /// A missing path or file yields `Ok(None)`; a file that exists but cannot be parsed is an error.
    pub fn load_optional(path: Option<&Path>) -> SimulatorResult<Option<Self>> {
        match path {
            Some(path) if path.exists() => Self::from_path(path).map(Some),
            Some(path) => {
                debug!("PLC manifest {:?} not found, PLC simulation stays disabled", path);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn yaml_manifest_keeps_entry_order() -> SimulatorResult<()> {
        let mut file = Builder::new().suffix(".yaml").tempfile()?;
        writeln!(
            file,
            "global_settings:\n  enable_simulation: true\n  allow_forcing: false\nplcs:\n  PLC_B:\n    vendor: siemens\n    model: S7-1500\n    industries: [utilities]\n  PLC_A:\n    enabled: false\n    vendor: rockwell\n    model: ControlLogix5580\n    industries: [mining]"
        )?;
        file.flush()?;

        let manifest = PlcFleetConfig::from_path(file.path())?;
        assert!(manifest.global_settings.enable_simulation);
        assert!(!manifest.global_settings.allow_forcing);
        assert_eq!(manifest.global_settings.comm_failure_probability, 0.0);
        let names: Vec<&String> = manifest.plcs.keys().collect();
        assert_eq!(names, vec!["PLC_B", "PLC_A"]);
        assert!(manifest.plcs["PLC_B"].enabled);
        assert!(!manifest.plcs["PLC_A"].enabled);
        Ok(())
    }

    #[test]
    fn json_manifest_is_accepted() -> SimulatorResult<()> {
        let mut file = Builder::new().suffix(".json").tempfile()?;
        write!(
            file,
            r#"{{"global_settings":{{"enable_simulation":true}},"plcs":{{"PLC_MINING":{{"vendor":"rockwell","model":"ControlLogix5580","industries":["mining"]}}}}}}"#
        )?;
        file.flush()?;

        let manifest = PlcFleetConfig::from_path(file.path())?;
        assert_eq!(manifest.plcs.len(), 1);
        assert_eq!(manifest.plcs["PLC_MINING"].industries, vec!["mining".to_string()]);
        Ok(())
    }

    #[test]
    fn missing_manifest_is_not_an_error() -> SimulatorResult<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("absent.yaml");
        assert!(PlcFleetConfig::load_optional(Some(&path))?.is_none());
        assert!(PlcFleetConfig::load_optional(None)?.is_none());
        Ok(())
    }

    #[test]
    fn unknown_extension_is_rejected() -> SimulatorResult<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "plcs = {{}}")?;
        assert!(matches!(
            PlcFleetConfig::from_path(file.path()),
            Err(SimulatorError::ConfigError(_))
        ));
        Ok(())
    }
}
