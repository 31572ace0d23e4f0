use std::sync::Arc;
use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use crate::config::{PlcFleetConfig, Settings};
use crate::controllers::SensorPoller;
use crate::services::plc::LoadReport;
use crate::simulation::SimulatorManager;
use crate::utils::logging;

/// Everything the process owns. Registries live here and are handed to tasks explicitly.
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub simulator: Arc<SimulatorManager>,
    pub sensor_poller: SensorPoller,
    pub plc_load_report: LoadReport,
    /// Keeps the file log writer alive
    pub _log_guard: Option<WorkerGuard>,
}

pub fn initialize() -> Result<AppContext> {
    let settings = Arc::new(Settings::new()?);
    let log_guard = logging::init_logger(&settings.logging)?;

    let mut simulator = SimulatorManager::new(settings.simulator.seed);

    let manifest = PlcFleetConfig::load_optional(settings.simulator.plc_manifest.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load PLC manifest: {}", e))?;
    let plc_load_report = simulator.load_plc_config(manifest.as_ref());
    for name in plc_load_report.failed() {
        warn!("PLC {} was not loaded", name);
    }
    info!(
        "PLC simulation {}",
        if plc_load_report.enabled { "enabled" } else { "disabled" }
    );

    let simulator = Arc::new(simulator);
    let sensor_poller = SensorPoller::new(Arc::clone(&simulator));

    Ok(AppContext {
        settings,
        simulator,
        sensor_poller,
        plc_load_report,
        _log_guard: log_guard,
    })
}
