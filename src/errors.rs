/// # Simulator Errors
/// This module defines the `SimulatorError` enum, which encapsulates all potential errors that can occur within the plant simulator.
/// Most simulator operations are infallible by construction; the variants below cover lookups of unknown sensors,
/// configuration loading and logging setup.


use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum SimulatorError {
    /// Represents a lookup of a sensor path that is not registered in the catalog.
    #[error("Sensor not found: {0}")]
    SensorNotFound(String),

    /// Represents a lookup of a PLC name that is not part of the loaded fleet.
    #[error("PLC not found: {0}")]
    PlcNotFound(String),

    /// Represents errors arising from misconfigurations or invalid settings.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Represents a PLC manifest entry that names a vendor outside the supported set.
    #[error("Invalid PLC vendor: {0}")]
    InvalidVendor(String),

    /// Represents a PLC manifest entry whose model is not in the model registry.
    #[error("Unknown PLC model {model} for vendor {vendor}")]
    UnknownModel { vendor: String, model: String },

    /// Represents standard input/output errors.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Represents errors during the initialization of the logging system.
    #[error("Logging initialization error: {0}")]
    LoggingError(String),

    /// Represents errors that occur during serialization or deserialization of JSON data.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Represents errors that occur while parsing YAML manifests.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl From<config::ConfigError> for SimulatorError {
    fn from(err: config::ConfigError) -> Self {
        SimulatorError::ConfigError(err.to_string())
    }
}

pub type SimulatorResult<T> = Result<T, SimulatorError>;
