use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::{Mutex, RwLock};
use rand::prelude::*;
use tracing::{debug, info};
use crate::config::GlobalPlcSettings;
use crate::errors::SimulatorResult;
use crate::models::{local_now, PlcDiagnostics, PlcInfo, PlcReading, PlcVendor, Quality, RunMode};
use crate::services::plc::capabilities::{DiagnosticsAccess, ForceTable, Forcing};
use crate::services::plc::plc_models::PlcModelProfile;
use crate::simulation::SensorSource;

/// Fault-injection switches a PLC takes from the fleet's global settings
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlcFaultSettings {
    pub simulate_scan_delays: bool,
    pub simulate_quality_issues: bool,
    pub quality_issue_probability: f64,
    pub simulate_comm_failures: bool,
    pub comm_failure_probability: f64,
}

impl PlcFaultSettings {
    /// Takes the named subset of global overrides. Probabilities are clamped to `[0, 1]`; NaN becomes 0.
    pub fn from_global(global: &GlobalPlcSettings) -> Self {
        Self {
            simulate_scan_delays: global.simulate_scan_delays,
            simulate_quality_issues: global.simulate_quality_issues,
            quality_issue_probability: clamp_probability(global.quality_issue_probability),
            simulate_comm_failures: global.simulate_comm_failures,
            comm_failure_probability: clamp_probability(global.comm_failure_probability),
        }
    }
}

fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// Static configuration of one simulated controller
#[derive(Debug, Clone, PartialEq)]
pub struct PlcConfig {
    pub vendor: PlcVendor,
    pub model: String,
    pub industries: Vec<String>,
    pub scan_cycle_ms: u64,
    pub rack: u16,
    pub slot: u16,
    pub faults: PlcFaultSettings,
}

impl PlcConfig {
    pub fn from_model(profile: &PlcModelProfile, industries: Vec<String>, faults: PlcFaultSettings) -> Self {
        Self {
            vendor: profile.vendor,
            model: profile.model.to_string(),
            industries,
            scan_cycle_ms: profile.scan_cycle_ms,
            rack: profile.rack,
            slot: profile.slot,
            faults,
        }
    }
}

/// Monotonic diagnostic counters
#[derive(Debug, Default)]
struct ScanCounters {
    total_scans: AtomicU64,
    forced_reads: AtomicU64,
    quality_issues: AtomicU64,
    comm_failures: AtomicU64,
}

/// # PlcInstance
///
/// A virtual controller mediating scan-based access to the sensors of its industries.
///
/// Each read is one scan: forced values short-circuit the live path, everything else is fetched from the
/// [`SensorSource`] and then exposed to two independent Bernoulli trials, one degrading quality and one dropping
/// the scan entirely. All state is interior so reads can come from several adapter tasks at once.
#[derive(Debug)]
pub struct PlcInstance {
    name: String,
    config: PlcConfig,
    sensors: BTreeSet<String>,
    forcing: Forcing,
    diagnostics: DiagnosticsAccess,
    run_mode: RwLock<RunMode>,
    counters: ScanCounters,
    rng: Mutex<StdRng>,
}

impl PlcInstance {
    pub fn new(
        name: &str,
        config: PlcConfig,
        sensors: BTreeSet<String>,
        forcing: Forcing,
        diagnostics: DiagnosticsAccess,
        rng: StdRng,
    ) -> Self {
        Self {
            name: name.to_string(),
            config,
            sensors,
            forcing,
            diagnostics,
            run_mode: RwLock::new(RunMode::default()),
            counters: ScanCounters::default(),
            rng: Mutex::new(rng),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PlcConfig {
        &self.config
    }

    pub fn serves(&self, path: &str) -> bool {
        self.sensors.contains(path)
    }

    pub fn sensors(&self) -> impl Iterator<Item = &String> {
        self.sensors.iter()
    }

    /// Performs one scan of `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(PlcReading)`: forced, live, degraded or dropped (value `None`, quality Bad)
    /// * `Err(SimulatorError)`: the source does not know the path
    pub fn read_input(&self, path: &str, source: &dyn SensorSource) -> SimulatorResult<PlcReading> {
        self.counters.total_scans.fetch_add(1, Ordering::Relaxed);

        if let Some(forced) = self.forcing.table().and_then(|table| table.get(path)) {
            self.counters.forced_reads.fetch_add(1, Ordering::Relaxed);
            return Ok(self.reading(path, Some(forced), Quality::Good, true));
        }

        let live = source.live_value(path)?;
        let faults = &self.config.faults;
        let (quality_issue, degraded, comm_failure) = {
            let mut rng = self.rng.lock();
            let quality_issue = faults.simulate_quality_issues
                && rng.gen_bool(faults.quality_issue_probability);
            let degraded = if rng.gen_bool(0.5) { Quality::Uncertain } else { Quality::Bad };
            let comm_failure = faults.simulate_comm_failures
                && rng.gen_bool(faults.comm_failure_probability);
            (quality_issue, degraded, comm_failure)
        };

        let mut quality = Quality::Good;
        if quality_issue {
            self.counters.quality_issues.fetch_add(1, Ordering::Relaxed);
            quality = degraded;
            debug!("{}: quality issue on {} ({})", self.name, path, quality);
        }

        if comm_failure {
            self.counters.comm_failures.fetch_add(1, Ordering::Relaxed);
            debug!("{}: communication failure on {}", self.name, path);
            return Ok(self.reading(path, None, Quality::Bad, false));
        }

        Ok(self.reading(path, Some(live), quality, false))
    }

    /// Latency a caller should observe per scan when scan-delay simulation is on.
    pub fn scan_delay(&self) -> Option<std::time::Duration> {
        self.config.faults.simulate_scan_delays
            .then(|| std::time::Duration::from_millis(self.config.scan_cycle_ms))
    }

    /// Write access to the force table. `None` on a controller that cannot force, which is the only way in.
    pub fn forcing(&self) -> Option<ForceHandle<'_>> {
        self.forcing.table().map(|table| ForceHandle { plc: self, table })
    }

    pub fn supports_forcing(&self) -> bool {
        self.forcing.is_enabled()
    }

    pub fn supports_diagnostics(&self) -> bool {
        self.diagnostics.is_enabled()
    }

    pub fn run_mode(&self) -> RunMode {
        *self.run_mode.read()
    }

    pub fn set_run_mode(&self, mode: RunMode) {
        let mut run_mode = self.run_mode.write();
        if *run_mode != mode {
            info!("{}: run mode {} -> {}", self.name, *run_mode, mode);
            *run_mode = mode;
        }
    }

    pub fn info(&self) -> PlcInfo {
        PlcInfo {
            vendor: self.config.vendor,
            model: self.config.model.clone(),
            industries: self.config.industries.clone(),
            scan_cycle_ms: self.config.scan_cycle_ms,
            run_mode: self.run_mode(),
            supports_forcing: self.supports_forcing(),
            supports_diagnostics: self.supports_diagnostics(),
            rack: self.config.rack,
            slot: self.config.slot,
        }
    }

    /// Counter snapshot, or `None` when the model does not expose diagnostics.
    pub fn diagnostics(&self) -> Option<PlcDiagnostics> {
        if !self.diagnostics.is_enabled() {
            return None;
        }
        Some(PlcDiagnostics {
            plc_name: self.name.clone(),
            vendor: self.config.vendor,
            model: self.config.model.clone(),
            run_mode: self.run_mode(),
            scan_cycle_ms: self.config.scan_cycle_ms,
            rack: self.config.rack,
            slot: self.config.slot,
            total_scans: self.counters.total_scans.load(Ordering::Relaxed),
            forced_value_count: self.counters.forced_reads.load(Ordering::Relaxed),
            quality_issue_count: self.counters.quality_issues.load(Ordering::Relaxed),
            comm_failure_count: self.counters.comm_failures.load(Ordering::Relaxed),
            active_forces: self.forcing.table().map_or(0, |table| table.len()),
            sensor_count: self.sensors.len(),
        })
    }

    fn reading(&self, path: &str, value: Option<f64>, quality: Quality, forced: bool) -> PlcReading {
        PlcReading {
            path: path.to_string(),
            value,
            quality,
            timestamp: local_now(),
            plc_name: Some(self.name.clone()),
            plc_model: Some(self.config.model.clone()),
            forced,
        }
    }
}

/// Force operations of a forcing-capable controller, limited to the paths it serves
pub struct ForceHandle<'a> {
    plc: &'a PlcInstance,
    table: &'a ForceTable,
}

impl ForceHandle<'_> {
    /// Forces `path` to `value`. Returns false when the controller does not serve `path`.
    pub fn force(&self, path: &str, value: f64) -> bool {
        if !self.plc.serves(path) {
            return false;
        }
        self.table.force(path, value);
        info!("{}: forced {} to {}", self.plc.name, path, value);
        true
    }

    /// Clears a forced value. Returns whether one was present.
    pub fn unforce(&self, path: &str) -> bool {
        let removed = self.table.unforce(path);
        if removed {
            info!("{}: released force on {}", self.plc.name, path);
        }
        removed
    }

    pub fn value(&self, path: &str) -> Option<f64> {
        self.table.get(path)
    }
}
