//! Material ledger: recycled pools, yearly demand, and lifetime totals.

use super::types::Materials;

/// Split of one production draw between recycled and virgin material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Draw {
    /// Taken from the recycled pool.
    pub recycled: Materials,
    /// Not covered by the pool; must be mined.
    pub virgin: Materials,
}

/// Single source of truth for material quantities in a run.
///
/// Only two operations change quantities: [`draw`](Self::draw) (production)
/// and [`deposit`](Self::deposit) (recovery). Pools can never go negative
/// because a draw takes at most what the pool holds.
#[derive(Debug, Clone, Default)]
pub struct MaterialLedger {
    recycled_pool: Materials,

    virgin_required_this_year: Materials,
    recycled_used_this_year: Materials,
    recovered_this_year: Materials,
    batteries_produced_this_year: usize,

    cumulative_virgin_required: Materials,
    cumulative_recycled_used: Materials,
    cumulative_recovered: Materials,
}

impl MaterialLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the per-year counters. Pools and lifetime totals carry over.
    pub fn begin_year(&mut self) {
        self.virgin_required_this_year = Materials::ZERO;
        self.recycled_used_this_year = Materials::ZERO;
        self.recovered_this_year = Materials::ZERO;
        self.batteries_produced_this_year = 0;
    }

    /// Covers `needed` for one battery, recycled material first.
    ///
    /// Each material is drawn independently: `recycled = min(pool, needed)`
    /// and the remainder is booked as virgin demand for the current year.
    pub fn draw(&mut self, needed: Materials) -> Draw {
        let recycled = self.recycled_pool.min(needed);
        let virgin = needed - recycled;

        self.recycled_pool -= recycled;
        self.recycled_used_this_year += recycled;
        self.cumulative_recycled_used += recycled;
        self.virgin_required_this_year += virgin;
        self.cumulative_virgin_required += virgin;
        self.batteries_produced_this_year += 1;

        Draw { recycled, virgin }
    }

    /// Adds recovered material to the recycled pool.
    pub fn deposit(&mut self, recovered: Materials) {
        self.recycled_pool += recovered;
        self.recovered_this_year += recovered;
        self.cumulative_recovered += recovered;
    }

    /// Recycled material currently available.
    pub fn recycled_pool(&self) -> Materials {
        self.recycled_pool
    }

    pub fn virgin_required_this_year(&self) -> Materials {
        self.virgin_required_this_year
    }

    pub fn recycled_used_this_year(&self) -> Materials {
        self.recycled_used_this_year
    }

    pub fn recovered_this_year(&self) -> Materials {
        self.recovered_this_year
    }

    pub fn batteries_produced_this_year(&self) -> usize {
        self.batteries_produced_this_year
    }

    pub fn cumulative_virgin_required(&self) -> Materials {
        self.cumulative_virgin_required
    }

    pub fn cumulative_recycled_used(&self) -> Materials {
        self.cumulative_recycled_used
    }

    pub fn cumulative_recovered(&self) -> Materials {
        self.cumulative_recovered
    }
}
