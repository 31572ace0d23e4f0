use std::collections::{BTreeSet, HashMap};
use indexmap::IndexMap;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use crate::config::{GlobalPlcSettings, PlcEntryConfig, PlcFleetConfig};
use crate::errors::{SimulatorError, SimulatorResult};
use crate::models::{local_now, PlcDiagnostics, PlcInfo, PlcReading, PlcVendor, RunMode};
use crate::services::plc::capabilities::{DiagnosticsAccess, Forcing};
use crate::services::plc::plc_instance::{PlcConfig, PlcFaultSettings, PlcInstance};
use crate::services::plc::plc_models::lookup_model;
use crate::simulation::{industry_of, SensorSource};

/// What happened to one manifest entry during `load_config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryOutcome {
    Loaded,
    /// The entry was declared with `enabled: false`
    Disabled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryLoadResult {
    pub plc_name: String,
    pub outcome: EntryOutcome,
}

/// Per-entry account of a fleet load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Whether PLC simulation ended up active
    pub enabled: bool,
    pub entries: Vec<EntryLoadResult>,
}

impl LoadReport {
    pub fn loaded(&self) -> Vec<&str> {
        self.names_where(|outcome| matches!(outcome, EntryOutcome::Loaded))
    }

    pub fn failed(&self) -> Vec<&str> {
        self.names_where(|outcome| matches!(outcome, EntryOutcome::Failed(_)))
    }

    fn names_where(&self, predicate: impl Fn(&EntryOutcome) -> bool) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.outcome))
            .map(|entry| entry.plc_name.as_str())
            .collect()
    }
}

/// # PlcManager
///
/// Owns the simulated PLC fleet and dispatches every sensor path to the controller that owns its industry.
///
/// The fleet is built once by [`load_config`](Self::load_config) and never changes afterwards; all per-read
/// mutation happens inside the `PlcInstance`s, so the manager can be shared read-only across adapter tasks.
#[derive(Debug)]
pub struct PlcManager {
    plcs: IndexMap<String, PlcInstance>,
    industry_map: HashMap<String, String>,
    global_settings: GlobalPlcSettings,
    enabled: bool,
    seed: Option<u64>,
}

impl PlcManager {
    /// Creates an empty, disabled manager. `seed` makes every controller's fault trials reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            plcs: IndexMap::new(),
            industry_map: HashMap::new(),
            global_settings: GlobalPlcSettings::default(),
            enabled: false,
            seed,
        }
    }

    /// Builds the fleet from a manifest.
    ///
    /// Entries are processed in manifest order. A disabled entry is skipped; an entry with an invalid vendor or an
    /// unknown model fails on its own with a warning while the rest keep loading. When two entries claim the same
    /// industry, the later one owns it.
    ///
    /// The manager is enabled only for a manifest with `enable_simulation: true`, at least one entry and at least
    /// one controller that loaded. A missing manifest leaves PLC simulation off.
    ///
    /// # Arguments
    ///
    /// * `manifest`: The fleet manifest, if one was found
    /// * `source`: The plant behind the fleet, whose paths decide which sensors each controller serves
    pub fn load_config(&mut self, manifest: Option<&PlcFleetConfig>, source: &dyn SensorSource) -> LoadReport {
        self.plcs.clear();
        self.industry_map.clear();
        self.enabled = false;

        let manifest = match manifest {
            Some(manifest) if !manifest.is_empty() => manifest,
            _ => {
                info!("No PLC manifest entries, PLC simulation disabled");
                return LoadReport::default();
            }
        };

        self.global_settings = manifest.global_settings.clone();
        if !self.global_settings.enable_simulation {
            info!("PLC simulation disabled by global settings");
            return LoadReport::default();
        }

        let faults = PlcFaultSettings::from_global(&self.global_settings);
        let sensor_paths = source.sensor_paths();
        let mut report = LoadReport::default();

        for (index, (plc_name, entry)) in manifest.plcs.iter().enumerate() {
            if !entry.enabled {
                info!("Skipping disabled PLC {}", plc_name);
                report.entries.push(EntryLoadResult { plc_name: plc_name.clone(), outcome: EntryOutcome::Disabled });
                continue;
            }

            match self.build_instance(plc_name, entry, faults, &sensor_paths, index as u64) {
                Ok(instance) => {
                    for industry in &instance.config().industries {
                        self.industry_map.insert(industry.clone(), plc_name.clone());
                    }
                    info!(
                        "Loaded PLC {} ({} {}) serving {} sensors",
                        plc_name, instance.config().vendor, instance.config().model, instance.sensors().count()
                    );
                    self.plcs.insert(plc_name.clone(), instance);
                    report.entries.push(EntryLoadResult { plc_name: plc_name.clone(), outcome: EntryOutcome::Loaded });
                }
                Err(e) => {
                    warn!("Skipping PLC {}: {}", plc_name, e);
                    report.entries.push(EntryLoadResult {
                        plc_name: plc_name.clone(),
                        outcome: EntryOutcome::Failed(e.to_string()),
                    });
                }
            }
        }

        self.enabled = !self.plcs.is_empty();
        report.enabled = self.enabled;
        info!("PLC fleet loaded: {} active, enabled = {}", self.plcs.len(), self.enabled);
        report
    }

    fn build_instance(
        &self,
        plc_name: &str,
        entry: &PlcEntryConfig,
        faults: PlcFaultSettings,
        sensor_paths: &[String],
        index: u64,
    ) -> SimulatorResult<PlcInstance> {
        let vendor: PlcVendor = entry.vendor.parse()?;
        let model = lookup_model(vendor, &entry.model)?;

        let mut industries: Vec<String> = Vec::new();
        for industry in &entry.industries {
            if !industries.contains(industry) {
                industries.push(industry.clone());
            }
        }

        let sensors: BTreeSet<String> = sensor_paths
            .iter()
            .filter(|path| industries.iter().any(|industry| industry == industry_of(path)))
            .cloned()
            .collect();

        let forcing = Forcing::new(self.global_settings.allow_forcing && model.supports_forcing);
        let diagnostics = DiagnosticsAccess::new(model.supports_diagnostics);
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index)),
            None => StdRng::from_entropy(),
        };

        Ok(PlcInstance::new(
            plc_name,
            PlcConfig::from_model(model, industries, faults),
            sensors,
            forcing,
            diagnostics,
            rng,
        ))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Name of the controller owning `industry`, if any.
    pub fn plc_for_industry(&self, industry: &str) -> Option<&str> {
        self.industry_map.get(industry).map(String::as_str)
    }

    /// Resolves the controller owning the industry of `path`. `None` means the sensor is unmanaged.
    pub fn get_plc_for_sensor(&self, path: &str) -> Option<&PlcInstance> {
        self.industry_map
            .get(industry_of(path))
            .and_then(|plc_name| self.plcs.get(plc_name))
    }

    pub fn get_plc(&self, plc_name: &str) -> Option<&PlcInstance> {
        self.plcs.get(plc_name)
    }

    /// Reads `path` through its owning controller, or straight from `source` when no controller claims it.
    pub fn read_sensor_value(&self, path: &str, source: &dyn SensorSource) -> SimulatorResult<PlcReading> {
        match self.get_plc_for_sensor(path) {
            Some(plc) => plc.read_input(path, source),
            None => {
                let value = source.live_value(path)?;
                Ok(PlcReading::unmanaged(path, value, local_now()))
            }
        }
    }

    pub fn force_value(&self, path: &str, value: f64) -> bool {
        self.get_plc_for_sensor(path)
            .and_then(PlcInstance::forcing)
            .map_or(false, |handle| handle.force(path, value))
    }

    pub fn unforce_value(&self, path: &str) -> bool {
        self.get_plc_for_sensor(path)
            .and_then(PlcInstance::forcing)
            .map_or(false, |handle| handle.unforce(path))
    }

    /// Per-scan latency of the controller owning `path`, when scan delays are simulated.
    pub fn scan_delay_for(&self, path: &str) -> Option<std::time::Duration> {
        self.get_plc_for_sensor(path).and_then(PlcInstance::scan_delay)
    }

    pub fn set_run_mode(&self, plc_name: &str, mode: RunMode) -> SimulatorResult<()> {
        let plc = self.plcs
            .get(plc_name)
            .ok_or_else(|| SimulatorError::PlcNotFound(plc_name.to_string()))?;
        plc.set_run_mode(mode);
        Ok(())
    }

    pub fn get_all_plcs(&self) -> IndexMap<String, PlcInfo> {
        self.plcs
            .iter()
            .map(|(name, plc)| (name.clone(), plc.info()))
            .collect()
    }

    pub fn get_plc_diagnostics(&self, plc_name: &str) -> Option<PlcDiagnostics> {
        self.plcs.get(plc_name).and_then(PlcInstance::diagnostics)
    }

    /// Diagnostics of every controller that exposes them.
    pub fn get_all_diagnostics(&self) -> IndexMap<String, PlcDiagnostics> {
        self.plcs
            .iter()
            .filter_map(|(name, plc)| plc.diagnostics().map(|diagnostics| (name.clone(), diagnostics)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quality;

    struct FixedSource;

    impl SensorSource for FixedSource {
        fn live_value(&self, path: &str) -> SimulatorResult<f64> {
            if self.sensor_paths().iter().any(|known| known == path) {
                Ok(10.0)
            } else {
                Err(SimulatorError::SensorNotFound(path.to_string()))
            }
        }

        fn sensor_paths(&self) -> Vec<String> {
            vec![
                "mining/crusher_1_motor_power".to_string(),
                "utilities/grid_voltage".to_string(),
                "oil_gas/wellhead_pressure".to_string(),
            ]
        }
    }

    fn entry(vendor: &str, model: &str, industries: &[&str]) -> PlcEntryConfig {
        PlcEntryConfig {
            enabled: true,
            vendor: vendor.to_string(),
            model: model.to_string(),
            industries: industries.iter().map(|i| i.to_string()).collect(),
        }
    }

    fn create_mock_manifest() -> PlcFleetConfig {
        let mut manifest = PlcFleetConfig {
            global_settings: GlobalPlcSettings { enable_simulation: true, ..Default::default() },
            ..Default::default()
        };
        manifest.plcs.insert("PLC_MINING".to_string(), entry("rockwell", "ControlLogix5580", &["mining"]));
        manifest.plcs.insert("PLC_UTILITIES".to_string(), entry("siemens", "S7-1500", &["utilities"]));
        manifest
    }

    #[test]
    fn loads_every_valid_entry() {
        let mut manager = PlcManager::new(Some(1));
        let report = manager.load_config(Some(&create_mock_manifest()), &FixedSource);

        assert!(report.enabled);
        assert_eq!(report.loaded(), vec!["PLC_MINING", "PLC_UTILITIES"]);
        assert_eq!(manager.plc_for_industry("mining"), Some("PLC_MINING"));
        assert_eq!(manager.get_plc("PLC_MINING").unwrap().sensors().count(), 1);
    }

    #[test]
    fn disabled_global_switch_loads_nothing() {
        let mut manifest = create_mock_manifest();
        manifest.global_settings.enable_simulation = false;
        let mut manager = PlcManager::new(Some(1));
        let report = manager.load_config(Some(&manifest), &FixedSource);

        assert!(!report.enabled);
        assert!(report.entries.is_empty());
        assert!(manager.get_all_plcs().is_empty());
    }

    #[test]
    fn disabled_entries_are_reported_not_loaded() {
        let mut manifest = create_mock_manifest();
        manifest.plcs["PLC_UTILITIES"].enabled = false;
        let mut manager = PlcManager::new(Some(1));
        let report = manager.load_config(Some(&manifest), &FixedSource);

        assert_eq!(report.entries[1].outcome, EntryOutcome::Disabled);
        assert!(manager.get_plc("PLC_UTILITIES").is_none());
        assert!(manager.get_plc_for_sensor("utilities/grid_voltage").is_none());
    }

    #[test]
    fn unknown_model_fails_only_its_entry() {
        let mut manifest = create_mock_manifest();
        manifest.plcs.insert("PLC_OIL".to_string(), entry("abb", "AC9000", &["oil_gas"]));
        let mut manager = PlcManager::new(Some(1));
        let report = manager.load_config(Some(&manifest), &FixedSource);

        assert!(report.enabled);
        assert_eq!(report.failed(), vec!["PLC_OIL"]);
        assert_eq!(manager.get_all_plcs().len(), 2);
    }

    #[test]
    fn all_entries_failing_leaves_manager_disabled() {
        let mut manifest = PlcFleetConfig {
            global_settings: GlobalPlcSettings { enable_simulation: true, ..Default::default() },
            ..Default::default()
        };
        manifest.plcs.insert("PLC_X".to_string(), entry("beckhoff", "CX5140", &["mining"]));
        let mut manager = PlcManager::new(None);
        let report = manager.load_config(Some(&manifest), &FixedSource);

        assert!(!report.enabled);
        assert!(!manager.is_enabled());
        assert_eq!(report.failed(), vec!["PLC_X"]);
    }

    #[test]
    fn forcing_needs_global_permission_and_model_support() {
        let mut manifest = create_mock_manifest();
        manifest.plcs.insert("PLC_OIL".to_string(), entry("mitsubishi", "FX5U", &["oil_gas"]));
        let mut manager = PlcManager::new(Some(1));
        manager.load_config(Some(&manifest), &FixedSource);

        assert!(manager.force_value("mining/crusher_1_motor_power", 1.0));
        assert!(!manager.force_value("oil_gas/wellhead_pressure", 1.0));
        assert!(!manager.get_all_plcs()["PLC_OIL"].supports_forcing);

        manifest.global_settings.allow_forcing = false;
        manager.load_config(Some(&manifest), &FixedSource);
        assert!(!manager.force_value("mining/crusher_1_motor_power", 1.0));
        assert!(!manager.get_all_plcs()["PLC_MINING"].supports_forcing);
    }

    #[test]
    fn unmanaged_path_reads_live_value_without_plc() {
        let mut manager = PlcManager::new(Some(1));
        manager.load_config(Some(&create_mock_manifest()), &FixedSource);

        let reading = manager.read_sensor_value("oil_gas/wellhead_pressure", &FixedSource).unwrap();
        assert_eq!(reading.value, Some(10.0));
        assert_eq!(reading.quality, Quality::Good);
        assert_eq!(reading.plc_name, None);
        assert!(!manager.force_value("oil_gas/wellhead_pressure", 3.0));
        assert!(!manager.unforce_value("oil_gas/wellhead_pressure"));
    }

    #[test]
    fn run_mode_of_unknown_plc_is_an_error() {
        let mut manager = PlcManager::new(Some(1));
        manager.load_config(Some(&create_mock_manifest()), &FixedSource);

        manager.set_run_mode("PLC_MINING", RunMode::Fault).unwrap();
        assert_eq!(manager.get_all_plcs()["PLC_MINING"].run_mode, RunMode::Fault);
        assert!(matches!(manager.set_run_mode("PLC_NOPE", RunMode::Run), Err(SimulatorError::PlcNotFound(_))));
    }
}
