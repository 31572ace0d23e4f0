use std::time::Duration;
use anyhow::Result;
use tracing::info;
use tokio::signal::ctrl_c;
use tokio::time::interval;
use plant_sim::controllers::PollSummary;
use plant_sim::init;

/// The main entry point of the plant simulator
///
/// This function initializes the simulator and runs the polling loop until a shutdown signal is received
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}


/// The core logic of the plant simulator
///
/// 1. Loads settings, initializes logging, builds the simulator and its PLC fleet
/// 2. Polls every sensor at `poll_interval_ms`, the way a protocol adapter would
/// 3. Logs a quality and diagnostics summary every `report_interval_secs`
/// 4. Stops on Ctrl-C
async fn run() -> Result<()> {
    let context = init::initialize()?;
    let simulator_settings = &context.settings.simulator;

    let mut polling_interval = interval(Duration::from_millis(simulator_settings.poll_interval_ms.max(1)));
    let mut report_interval = interval(Duration::from_secs(simulator_settings.report_interval_secs.max(1)));
    let mut since_last_report = PollSummary::default();

    loop {
        tokio::select! {
            _ = polling_interval.tick() => {
                let summary = context.sensor_poller.run_polling_cycle().await;
                since_last_report.merge(&summary);
            }
            _ = report_interval.tick() => {
                context.sensor_poller.report(&since_last_report);
                since_last_report = PollSummary::default();
            }
            _ = ctrl_c() => {
                info!("Received shutdown signal. Shutting down gracefully...");
                break;
            }
        }
    }
    Ok(())
}
