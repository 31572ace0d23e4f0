pub mod sensor_poller;

pub use sensor_poller::{PollSummary, SensorPoller};
