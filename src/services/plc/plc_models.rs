use crate::errors::{SimulatorError, SimulatorResult};
use crate::models::PlcVendor;

/// # PlcModelProfile
///
/// Hardware profile of a controller model: its native scan cycle, default rack/slot addressing,
/// and which operator features the firmware exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlcModelProfile {
    pub vendor: PlcVendor,
    pub model: &'static str,
    pub scan_cycle_ms: u64,
    pub rack: u16,
    pub slot: u16,
    pub supports_forcing: bool,
    pub supports_diagnostics: bool,
}

const fn profile(
    vendor: PlcVendor,
    model: &'static str,
    scan_cycle_ms: u64,
    rack: u16,
    slot: u16,
    supports_forcing: bool,
    supports_diagnostics: bool,
) -> PlcModelProfile {
    PlcModelProfile { vendor, model, scan_cycle_ms, rack, slot, supports_forcing, supports_diagnostics }
}

/// Every model the simulator can instantiate.
pub const MODEL_REGISTRY: &[PlcModelProfile] = &[
    profile(PlcVendor::Siemens, "S7-1500", 10, 0, 1, true, true),
    profile(PlcVendor::Siemens, "S7-1200", 20, 0, 1, true, true),
    profile(PlcVendor::Siemens, "S7-300", 25, 0, 2, true, true),
    profile(PlcVendor::Siemens, "LOGO!8", 50, 0, 0, false, false),
    profile(PlcVendor::Rockwell, "ControlLogix5580", 10, 0, 0, true, true),
    profile(PlcVendor::Rockwell, "CompactLogix5380", 15, 0, 0, true, true),
    profile(PlcVendor::Rockwell, "Micro850", 30, 0, 0, false, true),
    profile(PlcVendor::Schneider, "M580", 10, 0, 0, true, true),
    profile(PlcVendor::Schneider, "M340", 20, 0, 0, true, true),
    profile(PlcVendor::Schneider, "M221", 40, 0, 0, false, false),
    profile(PlcVendor::Abb, "AC800M", 10, 0, 0, true, true),
    profile(PlcVendor::Abb, "AC500", 15, 0, 1, true, true),
    profile(PlcVendor::Mitsubishi, "iQ-R", 5, 0, 0, true, true),
    profile(PlcVendor::Mitsubishi, "FX5U", 25, 0, 0, false, true),
    profile(PlcVendor::Omron, "NX1P2", 10, 0, 0, true, true),
    profile(PlcVendor::Omron, "CJ2M", 20, 0, 0, true, true),
];

/// Resolves a vendor/model pair against the registry. Model names match case-insensitively.
pub fn lookup_model(vendor: PlcVendor, model: &str) -> SimulatorResult<&'static PlcModelProfile> {
    MODEL_REGISTRY
        .iter()
        .find(|profile| profile.vendor == vendor && profile.model.eq_ignore_ascii_case(model.trim()))
        .ok_or_else(|| SimulatorError::UnknownModel {
            vendor: vendor.to_string(),
            model: model.to_string(),
        })
}
