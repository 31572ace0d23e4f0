pub mod plc;

pub use plc::PlcManager;
