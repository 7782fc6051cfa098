//! Agents of the battery lifecycle: owners, manufacturers, and recyclers.

/// Battery manufacturer.
pub mod manufacturer;
/// EV owner and the end-of-life decision.
pub mod owner;
/// Battery recycling company.
pub mod recycler;
pub mod types;

// Re-export the main types for convenience
pub use manufacturer::Manufacturer;
pub use owner::{Owner, OwnerOutcome};
pub use recycler::Recycler;
pub use types::YearContext;
