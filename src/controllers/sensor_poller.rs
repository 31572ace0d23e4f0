use std::sync::Arc;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::Quality;
use crate::simulation::SimulatorManager;

/// Outcome of one pass over every sensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollSummary {
    pub good: usize,
    pub uncertain: usize,
    pub bad: usize,
    pub forced: usize,
    /// Scans that came back without a value
    pub dropped: usize,
    pub errors: usize,
}

impl PollSummary {
    pub fn total(&self) -> usize {
        self.good + self.uncertain + self.bad + self.errors
    }

    pub fn merge(&mut self, other: &PollSummary) {
        self.good += other.good;
        self.uncertain += other.uncertain;
        self.bad += other.bad;
        self.forced += other.forced;
        self.dropped += other.dropped;
        self.errors += other.errors;
    }
}

/// Built-in consumer of the simulator: polls every sensor the way a protocol adapter would
pub struct SensorPoller {
    /// The simulator shared with every other adapter task
    pub simulator: Arc<SimulatorManager>,
}

impl SensorPoller {
    pub fn new(simulator: Arc<SimulatorManager>) -> Self {
        info!("Initializing sensor poller");
        Self { simulator }
    }

    /// Executes a single polling cycle over every registered sensor
    ///
    /// All reads are issued concurrently so that simulated scan delays of different controllers overlap instead
    /// of adding up.
    pub async fn run_polling_cycle(&self) -> PollSummary {
        let paths = self.simulator.sensor_paths();
        let reads = paths.iter().map(|path| self.simulator.read_with_plc_paced(path));
        let results = join_all(reads).await;

        let mut summary = PollSummary::default();
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(reading) => {
                    match reading.quality {
                        Quality::Good => summary.good += 1,
                        Quality::Uncertain => summary.uncertain += 1,
                        Quality::Bad => summary.bad += 1,
                    }
                    if reading.forced {
                        summary.forced += 1;
                    }
                    if reading.value.is_none() {
                        summary.dropped += 1;
                    }
                }
                Err(e) => {
                    warn!("Error reading sensor {}: {}", path, e);
                    summary.errors += 1;
                }
            }
        }
        debug!("Polling cycle complete: {:?}", summary);
        summary
    }

    /// Logs a quality summary and the counters of every PLC that exposes diagnostics
    pub fn report(&self, summary: &PollSummary) {
        info!(
            "Reads: {} good, {} uncertain, {} bad ({} dropped, {} forced, {} errors)",
            summary.good, summary.uncertain, summary.bad, summary.dropped, summary.forced, summary.errors
        );
        for (name, diagnostics) in self.simulator.get_all_diagnostics() {
            info!(
                "{} [{} {} {}]: scans={} forced={} quality_issues={} comm_failures={}",
                name,
                diagnostics.vendor,
                diagnostics.model,
                diagnostics.run_mode,
                diagnostics.total_scans,
                diagnostics.forced_value_count,
                diagnostics.quality_issue_count,
                diagnostics.comm_failure_count
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn polling_cycle_reads_every_sensor() {
        let simulator = Arc::new(SimulatorManager::new(Some(4)));
        let poller = SensorPoller::new(Arc::clone(&simulator));

        let summary = poller.run_polling_cycle().await;
        assert_eq!(summary.total(), simulator.sensor_paths().len());
        assert_eq!(summary.good, summary.total());
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn summaries_merge_field_by_field() {
        let mut total = PollSummary { good: 2, bad: 1, ..Default::default() };
        total.merge(&PollSummary { good: 1, uncertain: 1, dropped: 1, bad: 1, ..Default::default() });
        assert_eq!(total, PollSummary { good: 3, uncertain: 1, bad: 2, dropped: 1, ..Default::default() });
    }
}
