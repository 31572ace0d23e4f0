//! # Sensor Representation

//! This module defines the `SensorConfig` struct and the `SensorType` enum, which together describe a simulated
//! plant sensor: what it measures, its engineering range and how its trajectory evolves over time.

use serde::{Deserialize, Serialize};

/// Provides a type-safe representation of the different sensor types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    Temperature,
    Pressure,
    Flow,
    Level,
    Vibration,
    Power,
    Speed,
    Current,
    Voltage,
    Position,
    Analyzer,
}

/// Static description of one simulated sensor. Immutable once the catalog is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorConfig {
    /// The sensor name, unique within its industry
    pub name: String,
    /// What the sensor measures
    pub sensor_type: SensorType,
    /// Engineering unit of the reported value
    pub unit: String,
    pub min_value: f64,
    pub max_value: f64,
    /// The value the trajectory reverts towards
    pub nominal_value: f64,
    /// How often the sensor is expected to be sampled, in Hz
    pub update_frequency_hz: f64,
    /// Whether the trajectory carries a periodic component (pumps, compressors, duty cycles)
    pub cyclic: bool,
}

impl SensorConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        sensor_type: SensorType,
        unit: &str,
        min_value: f64,
        max_value: f64,
        nominal_value: f64,
        update_frequency_hz: f64,
        cyclic: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            sensor_type,
            unit: unit.to_string(),
            min_value,
            max_value,
            nominal_value,
            update_frequency_hz,
            cyclic,
        }
    }

    /// Width of the engineering range. Never negative.
    pub fn span(&self) -> f64 {
        (self.max_value - self.min_value).max(0.0)
    }
}

/// Point-in-time view of a sensor taken without advancing its trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorSnapshot {
    /// The `{industry}/{sensor}` path of the sensor
    pub path: String,
    pub config: SensorConfig,
    /// The last value produced by the trajectory
    pub current_value: f64,
    /// Whether the sensor's own fault is armed
    pub intrinsic_fault_active: bool,
    /// Milliseconds left on the sensor's own fault. `u64::MAX` for a fault that never expires
    pub intrinsic_fault_remaining_ms: Option<u64>,
}
