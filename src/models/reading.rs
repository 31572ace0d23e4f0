//! # PLC Reading Representation

//! This module defines the `PlcReading` struct, the record every protocol adapter receives when it polls a sensor,
//! and the `Quality` code attached to it. The record has the same shape whether or not PLC simulation is active.


use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};

/// Quality code attached to a reading, independent of the numeric value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Quality {
    Good,
    Uncertain,
    Bad,
}

/// Represents a value delivered to a protocol adapter.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlcReading {
    /// The `{industry}/{sensor}` path that was read.
    pub path: String,
    /// The value read, or `None` when the scan was dropped by a communication failure.
    pub value: Option<f64>,
    pub quality: Quality,
    /// The timestamp when the value was read.
    pub timestamp: NaiveDateTime,
    /// The PLC that mediated the read, if any.
    pub plc_name: Option<String>,
    pub plc_model: Option<String>,
    /// Whether the value is an operator-forced override.
    pub forced: bool,
}

impl PlcReading {
    /// Creates a reading that did not pass through any PLC.
    ///
    /// # Arguments
    ///
    /// * `path`: The sensor path.
    /// * `value`: The live sensor value.
    /// * `timestamp`: When the value was read.
    pub fn unmanaged(path: &str, value: f64, timestamp: NaiveDateTime) -> Self {
        PlcReading {
            path: path.to_string(),
            value: Some(value),
            quality: Quality::Good,
            timestamp,
            plc_name: None,
            plc_model: None,
            forced: false,
        }
    }
}
