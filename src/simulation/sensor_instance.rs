use std::f64::consts::PI;
use std::time::Instant;
use chrono::Duration;
use rand::prelude::*;
use rand_distr::StandardNormal;
use crate::models::SensorConfig;
use crate::simulation::deadline::Deadline;

/// Standard deviation of the per-tick noise, as a fraction of the sensor span
const NOISE_FRACTION: f64 = 0.01;
/// How much of the accumulated drift survives each tick
const DRIFT_RETENTION: f64 = 0.9;
/// Amplitude of the periodic component of cyclic sensors, as a fraction of the span
const CYCLE_AMPLITUDE: f64 = 0.1;
/// A cyclic sensor completes one period per this many seconds of samples
const CYCLE_PERIOD_SECS: f64 = 60.0;
const MIN_CYCLE_TICKS: f64 = 8.0;
/// How far above `max_value` a sensor with an armed intrinsic fault reads, as a fraction of the span
const INTRINSIC_FAULT_OVERSHOOT: f64 = 0.25;

/// One sensor's simulated trajectory.
///
/// Reading and advancing are the same operation: every `update` moves the trajectory one tick.
/// The sensor also carries its own time-boxed fault, independent of the simulator-level fault table.
#[derive(Debug)]
pub struct SensorInstance {
    config: SensorConfig,
    current_value: f64,
    tick: u64,
    drift: f64,
    rng: StdRng,
    fault_active: bool,
    fault_until: Option<Deadline>,
}

impl SensorInstance {
    pub fn new(config: SensorConfig, seed: u64) -> Self {
        Self {
            current_value: config.nominal_value,
            config,
            tick: 0,
            drift: 0.0,
            rng: StdRng::seed_from_u64(seed),
            fault_active: false,
            fault_until: None,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Advances the trajectory by one tick and returns the new value.
    pub fn update(&mut self) -> f64 {
        self.update_at(Instant::now())
    }

    /// Same as [`update`](Self::update) with an explicit clock reading.
    ///
    /// The trajectory advances even while the intrinsic fault is armed, so the live signal picks up where it
    /// would have been once the fault clears. The fault flag clears itself on the first update at or after expiry.
    pub fn update_at(&mut self, now: Instant) -> f64 {
        self.tick += 1;
        let live = self.next_live_value();

        if self.fault_active {
            match self.fault_until {
                Some(until) if !until.has_passed(now) => {
                    self.current_value = self.intrinsic_fault_value();
                    return self.current_value;
                }
                _ => self.clear_fault(),
            }
        }

        self.current_value = live;
        self.current_value
    }

    /// Returns the last computed value without advancing the trajectory.
    pub fn value(&self) -> f64 {
        self.current_value
    }

    /// Arms the intrinsic fault for `duration`, replacing any fault already armed.
    pub fn inject_fault(&mut self, duration: Duration) {
        self.inject_fault_at(duration, Instant::now());
    }

    /// A duration too large for the monotonic clock arms a fault that never expires.
    pub fn inject_fault_at(&mut self, duration: Duration, now: Instant) {
        self.fault_active = true;
        self.fault_until = Some(Deadline::after(now, duration));
    }

    /// Whether the intrinsic fault is armed. An expired fault stays armed until the next update observes it.
    pub fn is_faulted(&self) -> bool {
        self.fault_active
    }

    pub fn fault_until(&self) -> Option<Deadline> {
        self.fault_until
    }

    /// The value reported while the intrinsic fault is armed: an out-of-range spike above `max_value`.
    pub fn intrinsic_fault_value(&self) -> f64 {
        self.config.max_value + self.config.span() * INTRINSIC_FAULT_OVERSHOOT
    }

    fn clear_fault(&mut self) {
        self.fault_active = false;
        self.fault_until = None;
    }

    fn next_live_value(&mut self) -> f64 {
        let span = self.config.span();
        let noise: f64 = self.rng.sample(StandardNormal);
        self.drift = self.drift * DRIFT_RETENTION + noise * span * NOISE_FRACTION;

        let cyclic = if self.config.cyclic {
            let period = (self.config.update_frequency_hz * CYCLE_PERIOD_SECS).max(MIN_CYCLE_TICKS);
            span * CYCLE_AMPLITUDE * (2.0 * PI * self.tick as f64 / period).sin()
        } else {
            0.0
        };

        let raw = self.config.nominal_value + cyclic + self.drift;
        if self.config.min_value <= self.config.max_value {
            raw.clamp(self.config.min_value, self.config.max_value)
        } else {
            self.config.nominal_value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SensorType;

    fn motor_power() -> SensorConfig {
        SensorConfig::new("crusher_1_motor_power", SensorType::Power, "kW", 0.0, 1000.0, 750.0, 1.0, true)
    }

    #[test]
    fn trajectory_stays_inside_engineering_range() {
        let mut sensor = SensorInstance::new(motor_power(), 7);
        for _ in 0..2_000 {
            let value = sensor.update();
            assert!((0.0..=1000.0).contains(&value), "value {} escaped the range", value);
        }
    }

    #[test]
    fn value_does_not_advance_the_trajectory() {
        let mut sensor = SensorInstance::new(motor_power(), 7);
        assert_eq!(sensor.value(), 750.0);
        let produced = sensor.update();
        assert_eq!(sensor.value(), produced);
        assert_eq!(sensor.value(), produced);
    }

    #[test]
    fn same_seed_produces_same_trajectory() {
        let mut a = SensorInstance::new(motor_power(), 42);
        let mut b = SensorInstance::new(motor_power(), 42);
        let now = Instant::now();
        for _ in 0..50 {
            assert_eq!(a.update_at(now), b.update_at(now));
        }
    }

    #[test]
    fn trajectory_moves_between_polls() {
        let mut sensor = SensorInstance::new(motor_power(), 3);
        let values: Vec<f64> = (0..20).map(|_| sensor.update()).collect();
        assert!(values.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn intrinsic_fault_reports_spike_until_expiry() {
        let mut sensor = SensorInstance::new(motor_power(), 11);
        let t0 = Instant::now();
        sensor.inject_fault_at(Duration::seconds(10), t0);
        assert!(sensor.is_faulted());

        assert_eq!(sensor.update_at(t0), 1250.0);
        assert_eq!(sensor.update_at(t0 + std::time::Duration::from_secs(9)), 1250.0);
        assert_eq!(sensor.value(), 1250.0);

        let after = sensor.update_at(t0 + std::time::Duration::from_secs(10));
        assert!((0.0..=1000.0).contains(&after));
        assert!(!sensor.is_faulted());
        assert!(sensor.fault_until().is_none());
    }

    #[test]
    fn zero_span_sensor_holds_nominal() {
        let config = SensorConfig::new("setpoint", SensorType::Position, "%", 50.0, 50.0, 50.0, 1.0, true);
        let mut sensor = SensorInstance::new(config, 1);
        for _ in 0..10 {
            assert_eq!(sensor.update(), 50.0);
        }
    }

    #[test]
    fn oversized_intrinsic_fault_stays_armed() {
        let mut sensor = SensorInstance::new(motor_power(), 11);
        let t0 = Instant::now();
        sensor.inject_fault_at(Duration::weeks(100_000_000), t0);

        assert_eq!(sensor.update_at(t0 + std::time::Duration::from_secs(86_400 * 365)), 1250.0);
        assert!(sensor.is_faulted());
    }

    #[test]
    fn zero_duration_intrinsic_fault_clears_on_next_update() {
        let mut sensor = SensorInstance::new(motor_power(), 11);
        let t0 = Instant::now();
        sensor.inject_fault_at(Duration::zero(), t0);

        assert!((0.0..=1000.0).contains(&sensor.update_at(t0)));
        assert!(!sensor.is_faulted());
    }
}
