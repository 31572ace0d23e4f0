use crate::errors::SimulatorResult;

/// Anything that can stand in for the plant behind a PLC.
///
/// Every simulator-like component implements all of these, so orchestration code never checks for them at runtime.
pub trait SensorSource: Send + Sync {
    /// Reads the live value of `path`, advancing its trajectory.
    fn live_value(&self, path: &str) -> SimulatorResult<f64>;

    /// Every path this source can serve.
    fn sensor_paths(&self) -> Vec<String>;
}

/// Industry segment of a `{industry}/{sensor}` path.
pub fn industry_of(path: &str) -> &str {
    path.split('/').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn industry_is_the_leading_segment() {
        assert_eq!(industry_of("mining/crusher_1_motor_power"), "mining");
        assert_eq!(industry_of("orphan"), "orphan");
        assert_eq!(industry_of(""), "");
    }
}
