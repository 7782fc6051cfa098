//! Shared context handed to agents while they act within one year.

use rand::rngs::StdRng;

use crate::sim::ledger::MaterialLedger;
use crate::sim::types::Parameters;

use super::{Manufacturer, Recycler};

/// Everything an owner may consult or mutate during its yearly step.
///
/// Borrowed from the [`SimulationState`](crate::sim::state::SimulationState)
/// for the duration of the year; agents never own any of it.
pub struct YearContext<'a> {
    /// Fixed run parameters.
    pub params: &'a Parameters,
    /// Recycling efficiency in force this year.
    pub recycling_efficiency: f64,
    /// Material ledger.
    pub ledger: &'a mut MaterialLedger,
    /// Manufacturers an owner can buy a replacement from.
    pub manufacturers: &'a mut [Manufacturer],
    /// Recyclers an owner can return a battery to.
    pub recyclers: &'a mut [Recycler],
    /// The run's seeded random source.
    pub rng: &'a mut StdRng,
}
