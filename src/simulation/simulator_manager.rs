use std::time::Instant;
use chrono::Duration;
use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, info};
use crate::config::PlcFleetConfig;
use crate::errors::{SimulatorError, SimulatorResult};
use crate::models::{local_now, PlcDiagnostics, PlcInfo, PlcReading, RunMode, SensorConfig, SensorSnapshot};
use crate::services::plc::{LoadReport, PlcManager};
use crate::simulation::catalog::sensor_catalog;
use crate::simulation::fault_table::{FaultEntry, FaultTable};
use crate::simulation::sensor_instance::SensorInstance;
use crate::simulation::source::{industry_of, SensorSource};

/// The single source of truth for sensor state and the API surface consumed by protocol adapters and the UI.
///
/// Holds one [`SensorInstance`] per `{industry}/{sensor}` path, a fault table that is independent of each sensor's
/// own fault, and optionally the PLC fleet that mediates reads. The sensor map is fixed after construction; each
/// sensor sits behind its own lock so concurrent adapters only contend on the same path.
#[derive(Debug)]
pub struct SimulatorManager {
    sensors: IndexMap<String, Mutex<SensorInstance>>,
    faults: FaultTable,
    plc_manager: Option<PlcManager>,
    seed: Option<u64>,
}

impl SimulatorManager {
    /// Builds every sensor of the static catalog. `seed` makes all trajectories reproducible.
    pub fn new(seed: Option<u64>) -> Self {
        Self::from_catalog(sensor_catalog(), seed)
    }

    /// Builds one sensor per `(industry, config)` pair. A repeated path keeps its first definition.
    pub fn from_catalog<I, S>(catalog: I, seed: Option<u64>) -> Self
    where
        I: IntoIterator<Item = (S, Vec<SensorConfig>)>,
        S: AsRef<str>,
    {
        let mut sensors = IndexMap::new();
        for (industry, configs) in catalog {
            for config in configs {
                let path = format!("{}/{}", industry.as_ref(), config.name);
                if sensors.contains_key(&path) {
                    continue;
                }
                let sensor_seed = match seed {
                    Some(seed) => seed.wrapping_add(sensors.len() as u64),
                    None => rand::random(),
                };
                sensors.insert(path, Mutex::new(SensorInstance::new(config, sensor_seed)));
            }
        }
        info!("Simulator initialized with {} sensors", sensors.len());

        Self {
            sensors,
            faults: FaultTable::new(),
            plc_manager: None,
            seed,
        }
    }

    /// Loads the PLC fleet from `manifest` and attaches it. A missing or empty manifest leaves PLC simulation off.
    pub fn load_plc_config(&mut self, manifest: Option<&PlcFleetConfig>) -> LoadReport {
        let mut plc_manager = PlcManager::new(self.seed);
        let report = plc_manager.load_config(manifest, &*self);
        self.plc_manager = Some(plc_manager);
        report
    }

    pub fn plc_manager(&self) -> Option<&PlcManager> {
        self.plc_manager.as_ref()
    }

    pub fn is_plc_simulation_enabled(&self) -> bool {
        self.active_plc_manager().is_some()
    }

    fn active_plc_manager(&self) -> Option<&PlcManager> {
        self.plc_manager.as_ref().filter(|manager| manager.is_enabled())
    }

    fn sensor(&self, path: &str) -> SimulatorResult<&Mutex<SensorInstance>> {
        self.sensors
            .get(path)
            .ok_or_else(|| SimulatorError::SensorNotFound(path.to_string()))
    }

    /// Reads the current value of `path`.
    ///
    /// An active fault-table entry wins; otherwise the sensor advances one tick. Reading is what moves the
    /// trajectory, so two polls never return the same sample twice.
    pub fn get_sensor_value(&self, path: &str) -> SimulatorResult<f64> {
        self.get_sensor_value_at(path, Instant::now())
    }

    /// Same as [`get_sensor_value`](Self::get_sensor_value) with an explicit monotonic clock reading.
    pub fn get_sensor_value_at(&self, path: &str, now: Instant) -> SimulatorResult<f64> {
        let sensor = self.sensor(path)?;
        if let Some(value) = self.faults.active_override(path, now) {
            return Ok(value);
        }
        Ok(sensor.lock().update_at(now))
    }

    /// Installs a fault-table entry for `path` that reads as `0.0` for `duration`, replacing any earlier entry.
    ///
    /// The window is timed on the monotonic clock. A zero or negative duration is already expired; one too large
    /// for the clock never expires.
    pub fn inject_fault(&self, path: &str, duration: Duration) -> SimulatorResult<()> {
        self.inject_fault_at(path, duration, Instant::now())
    }

    pub fn inject_fault_at(&self, path: &str, duration: Duration, now: Instant) -> SimulatorResult<()> {
        self.sensor(path)?;
        self.faults.inject(path, duration, now);
        info!("Injected fault on {} for {}s", path, duration.num_seconds());
        Ok(())
    }

    /// Arms the sensor's own fault, the one protocol adapters trigger. See [`SensorInstance::inject_fault`].
    pub fn inject_intrinsic_fault(&self, path: &str, duration: Duration) -> SimulatorResult<()> {
        self.inject_intrinsic_fault_at(path, duration, Instant::now())
    }

    pub fn inject_intrinsic_fault_at(&self, path: &str, duration: Duration, now: Instant) -> SimulatorResult<()> {
        self.sensor(path)?.lock().inject_fault_at(duration, now);
        info!("Armed intrinsic fault on {} for {}s", path, duration.num_seconds());
        Ok(())
    }

    /// Reads `path` in the shape every adapter expects.
    ///
    /// With PLC simulation active the read goes through the owning controller; otherwise the live value is
    /// wrapped as a Good, unforced reading with no PLC metadata.
    pub fn get_sensor_value_with_plc(&self, path: &str) -> SimulatorResult<PlcReading> {
        self.sensor(path)?;
        match self.active_plc_manager() {
            Some(plc_manager) => plc_manager.read_sensor_value(path, self),
            None => {
                let value = self.get_sensor_value(path)?;
                Ok(PlcReading::unmanaged(path, value, local_now()))
            }
        }
    }

    /// Like [`get_sensor_value_with_plc`](Self::get_sensor_value_with_plc), then waits out the owning
    /// controller's scan cycle when scan delays are simulated. The wait never holds a lock.
    pub async fn read_with_plc_paced(&self, path: &str) -> SimulatorResult<PlcReading> {
        let reading = self.get_sensor_value_with_plc(path)?;
        if let Some(delay) = self.active_plc_manager().and_then(|manager| manager.scan_delay_for(path)) {
            tokio::time::sleep(delay).await;
        }
        Ok(reading)
    }

    /// Forces `path` through its owning controller. False when PLC simulation is off or forcing is unavailable.
    pub fn force_sensor_value(&self, path: &str, value: f64) -> bool {
        let forced = self.active_plc_manager()
            .map_or(false, |manager| manager.force_value(path, value));
        if !forced {
            debug!("Force request on {} rejected", path);
        }
        forced
    }

    pub fn unforce_sensor_value(&self, path: &str) -> bool {
        self.active_plc_manager()
            .map_or(false, |manager| manager.unforce_value(path))
    }

    pub fn get_all_plcs(&self) -> IndexMap<String, PlcInfo> {
        self.active_plc_manager()
            .map(PlcManager::get_all_plcs)
            .unwrap_or_default()
    }

    pub fn get_plc_diagnostics(&self, plc_name: &str) -> Option<PlcDiagnostics> {
        self.active_plc_manager()
            .and_then(|manager| manager.get_plc_diagnostics(plc_name))
    }

    pub fn get_all_diagnostics(&self) -> IndexMap<String, PlcDiagnostics> {
        self.active_plc_manager()
            .map(PlcManager::get_all_diagnostics)
            .unwrap_or_default()
    }

    pub fn set_plc_run_mode(&self, plc_name: &str, mode: RunMode) -> SimulatorResult<()> {
        self.active_plc_manager()
            .ok_or_else(|| SimulatorError::PlcNotFound(plc_name.to_string()))?
            .set_run_mode(plc_name, mode)
    }

    /// Every registered path, in catalog order.
    pub fn sensor_paths(&self) -> Vec<String> {
        self.sensors.keys().cloned().collect()
    }

    /// Every industry with at least one sensor, in catalog order.
    pub fn industries(&self) -> Vec<String> {
        let mut industries: Vec<String> = Vec::new();
        for path in self.sensors.keys() {
            let industry = industry_of(path);
            if !industries.iter().any(|known| known == industry) {
                industries.push(industry.to_string());
            }
        }
        industries
    }

    pub fn sensor_config(&self, path: &str) -> SimulatorResult<SensorConfig> {
        Ok(self.sensor(path)?.lock().config().clone())
    }

    /// Current state of `path` without advancing its trajectory or touching the fault table.
    pub fn sensor_snapshot(&self, path: &str) -> SimulatorResult<SensorSnapshot> {
        let sensor = self.sensor(path)?.lock();
        Ok(SensorSnapshot {
            path: path.to_string(),
            config: sensor.config().clone(),
            current_value: sensor.value(),
            intrinsic_fault_active: sensor.is_faulted(),
            intrinsic_fault_remaining_ms: sensor.fault_until().map(|until| {
                until
                    .remaining(Instant::now())
                    .map_or(u64::MAX, |left| u64::try_from(left.as_millis()).unwrap_or(u64::MAX))
            }),
        })
    }

    /// Fault-table entries still held, including expired ones no read has observed yet.
    pub fn active_faults(&self) -> Vec<(String, FaultEntry)> {
        self.faults.entries()
    }
}

impl SensorSource for SimulatorManager {
    fn live_value(&self, path: &str) -> SimulatorResult<f64> {
        self.get_sensor_value(path)
    }

    fn sensor_paths(&self) -> Vec<String> {
        SimulatorManager::sensor_paths(self)
    }
}
