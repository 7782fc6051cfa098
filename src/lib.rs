//! Agent-based simulation of lithium and cobalt flows through EV battery
//! owners, manufacturers, and recyclers.

pub mod agents;
pub mod config;
pub mod error;
/// Export of year records.
pub mod io;
/// Simulation state, scheduling, runner, and reporting types.
pub mod sim;
