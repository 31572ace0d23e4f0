//! Synthetic plant sensor data behind a simulated PLC fleet.
//!
//! [`simulation::SimulatorManager`] is the surface protocol adapters and dashboards call into; it owns every
//! sensor trajectory, the simulator-level fault table and, when a fleet manifest is present, the
//! [`services::PlcManager`] that mediates reads with scan counting, quality degradation and forcing.

pub mod config;
pub mod controllers;
pub mod errors;
pub mod init;
pub mod models;
pub mod services;
pub mod simulation;
pub mod utils;
