pub mod catalog;
pub mod deadline;
pub mod fault_table;
pub mod sensor_instance;
pub mod simulator_manager;
pub mod source;

pub use deadline::Deadline;
pub use fault_table::{FaultEntry, FaultTable};
pub use sensor_instance::SensorInstance;
pub use simulator_manager::SimulatorManager;
pub use source::{industry_of, SensorSource};
