//! # PLC Representation

//! Vendor and run-mode tags for simulated controllers, plus the read-only views (`PlcInfo`, `PlcDiagnostics`)
//! handed to the UI and browse-tree collaborators.

use serde::{Deserialize, Serialize};
use crate::errors::SimulatorError;

/// The fixed set of PLC vendors the fleet manifest may name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum PlcVendor {
    Siemens,
    Rockwell,
    Schneider,
    Abb,
    Mitsubishi,
    Omron,
}

impl std::str::FromStr for PlcVendor {
    type Err = SimulatorError;

    /// Parses a manifest vendor tag case-insensitively. `allen_bradley` is accepted as an alias for Rockwell.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "siemens" => Ok(PlcVendor::Siemens),
            "rockwell" | "allen_bradley" => Ok(PlcVendor::Rockwell),
            "schneider" => Ok(PlcVendor::Schneider),
            "abb" => Ok(PlcVendor::Abb),
            "mitsubishi" => Ok(PlcVendor::Mitsubishi),
            "omron" => Ok(PlcVendor::Omron),
            _ => Err(SimulatorError::InvalidVendor(s.to_string())),
        }
    }
}

/// Operating mode of a controller. Transitions are operator-driven only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RunMode {
    #[default]
    #[display("RUN")]
    Run,
    #[display("PROGRAM")]
    Program,
    #[display("FAULT")]
    Fault,
}

/// Static description of a loaded PLC, as shown in the browse tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlcInfo {
    pub vendor: PlcVendor,
    pub model: String,
    pub industries: Vec<String>,
    pub scan_cycle_ms: u64,
    pub run_mode: RunMode,
    pub supports_forcing: bool,
    pub supports_diagnostics: bool,
    pub rack: u16,
    pub slot: u16,
}

/// Counter snapshot of a PLC together with its configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlcDiagnostics {
    pub plc_name: String,
    pub vendor: PlcVendor,
    pub model: String,
    pub run_mode: RunMode,
    pub scan_cycle_ms: u64,
    pub rack: u16,
    pub slot: u16,
    /// Every `read_input` call, forced and dropped scans included
    pub total_scans: u64,
    /// Reads answered from a forced value
    pub forced_value_count: u64,
    pub quality_issue_count: u64,
    pub comm_failure_count: u64,
    /// Number of points currently forced
    pub active_forces: usize,
    pub sensor_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_tags_parse_with_aliases() {
        assert_eq!("Rockwell".parse::<PlcVendor>().ok(), Some(PlcVendor::Rockwell));
        assert_eq!("allen_bradley".parse::<PlcVendor>().ok(), Some(PlcVendor::Rockwell));
        assert_eq!(" siemens ".parse::<PlcVendor>().ok(), Some(PlcVendor::Siemens));
        assert!(matches!("beckhoff".parse::<PlcVendor>(), Err(SimulatorError::InvalidVendor(v)) if v == "beckhoff"));
    }

    #[test]
    fn run_mode_defaults_to_run() {
        assert_eq!(RunMode::default(), RunMode::Run);
        assert_eq!(RunMode::Program.to_string(), "PROGRAM");
    }
}
