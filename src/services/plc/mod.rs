pub mod capabilities;
pub mod plc_instance;
pub mod plc_manager;
pub mod plc_models;

pub use plc_instance::{ForceHandle, PlcConfig, PlcFaultSettings, PlcInstance};
pub use plc_manager::{EntryLoadResult, EntryOutcome, LoadReport, PlcManager};
