//! Static sensor catalog.
//!
//! Every industry groups the sensors of one simulated plant. The simulator builds exactly one sensor instance per
//! entry, addressed as `{industry}/{sensor}`.

use crate::models::{SensorConfig, SensorType};

pub const MINING: &str = "mining";
pub const UTILITIES: &str = "utilities";
pub const MANUFACTURING: &str = "manufacturing";
pub const OIL_GAS: &str = "oil_gas";
pub const WATER_TREATMENT: &str = "water_treatment";

/// The full catalog, one `(industry, sensors)` pair per plant.
pub fn sensor_catalog() -> Vec<(&'static str, Vec<SensorConfig>)> {
    vec![
        (MINING, mining_sensors()),
        (UTILITIES, utilities_sensors()),
        (MANUFACTURING, manufacturing_sensors()),
        (OIL_GAS, oil_gas_sensors()),
        (WATER_TREATMENT, water_treatment_sensors()),
    ]
}

fn mining_sensors() -> Vec<SensorConfig> {
    vec![
        SensorConfig::new("crusher_1_motor_power", SensorType::Power, "kW", 200.0, 1200.0, 850.0, 1.0, true),
        SensorConfig::new("crusher_1_bearing_temp", SensorType::Temperature, "°C", 20.0, 110.0, 65.0, 0.5, false),
        SensorConfig::new("crusher_1_vibration", SensorType::Vibration, "mm/s", 0.0, 25.0, 4.5, 2.0, true),
        SensorConfig::new("conveyor_belt_speed", SensorType::Speed, "m/s", 0.0, 6.0, 4.2, 1.0, false),
        SensorConfig::new("conveyor_motor_current", SensorType::Current, "A", 0.0, 400.0, 260.0, 1.0, true),
        SensorConfig::new("slurry_pump_pressure", SensorType::Pressure, "bar", 0.0, 40.0, 22.0, 1.0, true),
        SensorConfig::new("ore_bin_level", SensorType::Level, "%", 0.0, 100.0, 60.0, 0.2, false),
    ]
}

fn utilities_sensors() -> Vec<SensorConfig> {
    vec![
        SensorConfig::new("grid_voltage", SensorType::Voltage, "kV", 10.5, 11.5, 11.0, 1.0, true),
        SensorConfig::new("transformer_1_oil_temp", SensorType::Temperature, "°C", 20.0, 105.0, 68.0, 0.2, false),
        SensorConfig::new("feeder_1_current", SensorType::Current, "A", 0.0, 800.0, 420.0, 1.0, true),
        SensorConfig::new("turbine_1_speed", SensorType::Speed, "rpm", 2900.0, 3100.0, 3000.0, 2.0, false),
        SensorConfig::new("turbine_1_power_output", SensorType::Power, "MW", 0.0, 250.0, 180.0, 1.0, true),
        SensorConfig::new("boiler_steam_pressure", SensorType::Pressure, "bar", 100.0, 180.0, 160.0, 1.0, false),
    ]
}

fn manufacturing_sensors() -> Vec<SensorConfig> {
    vec![
        SensorConfig::new("press_1_hydraulic_pressure", SensorType::Pressure, "bar", 0.0, 350.0, 210.0, 2.0, true),
        SensorConfig::new("spindle_motor_temp", SensorType::Temperature, "°C", 20.0, 95.0, 55.0, 0.5, false),
        SensorConfig::new("spindle_vibration", SensorType::Vibration, "g", 0.0, 5.0, 0.8, 5.0, true),
        SensorConfig::new("robot_arm_position", SensorType::Position, "deg", -180.0, 180.0, 0.0, 10.0, true),
        SensorConfig::new("compressed_air_flow", SensorType::Flow, "m³/h", 0.0, 600.0, 340.0, 1.0, false),
        SensorConfig::new("line_power_draw", SensorType::Power, "kW", 0.0, 900.0, 520.0, 1.0, true),
    ]
}

fn oil_gas_sensors() -> Vec<SensorConfig> {
    vec![
        SensorConfig::new("wellhead_pressure", SensorType::Pressure, "bar", 50.0, 350.0, 210.0, 1.0, false),
        SensorConfig::new("separator_level", SensorType::Level, "%", 0.0, 100.0, 50.0, 0.5, false),
        SensorConfig::new("compressor_1_discharge_temp", SensorType::Temperature, "°C", 30.0, 180.0, 120.0, 0.5, true),
        SensorConfig::new("compressor_1_vibration", SensorType::Vibration, "mm/s", 0.0, 20.0, 3.2, 2.0, true),
        SensorConfig::new("export_gas_flow", SensorType::Flow, "MMscfd", 0.0, 150.0, 95.0, 1.0, false),
        SensorConfig::new("h2s_concentration", SensorType::Analyzer, "ppm", 0.0, 50.0, 2.0, 0.2, false),
    ]
}

fn water_treatment_sensors() -> Vec<SensorConfig> {
    vec![
        SensorConfig::new("raw_water_flow", SensorType::Flow, "m³/h", 0.0, 2500.0, 1600.0, 1.0, true),
        SensorConfig::new("clarifier_turbidity", SensorType::Analyzer, "NTU", 0.0, 10.0, 1.2, 0.2, false),
        SensorConfig::new("chlorine_residual", SensorType::Analyzer, "mg/L", 0.0, 4.0, 1.5, 0.2, false),
        SensorConfig::new("filter_1_differential_pressure", SensorType::Pressure, "kPa", 0.0, 250.0, 90.0, 0.5, false),
        SensorConfig::new("clearwell_level", SensorType::Level, "%", 0.0, 100.0, 70.0, 0.2, true),
        SensorConfig::new("high_lift_pump_power", SensorType::Power, "kW", 0.0, 750.0, 480.0, 1.0, true),
    ]
}
