pub mod sensor;
pub mod reading;
pub mod plc;

pub use sensor::*;
pub use reading::*;
pub use plc::*;

use chrono::{Local, NaiveDateTime};

/// Wall-clock stamp for readings. Fault windows are timed on `std::time::Instant` instead.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
