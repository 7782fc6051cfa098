/// Material ledger shared by manufacturers and recyclers.
pub mod ledger;
pub mod runner;
/// Randomized per-year agent activation.
pub mod scheduler;
pub mod state;
pub mod summary;
pub mod types;
