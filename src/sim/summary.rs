//! Post-hoc run summary and scenario comparison.

use std::fmt;

use crate::error::SimError;

use super::types::YearRecord;

/// Aggregate figures derived from a complete run.
///
/// Computed post-hoc from the year records so the summary can never
/// disagree with the per-year data.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Number of simulated years.
    pub years: usize,
    /// Last simulated year (0 for an empty run).
    pub final_year: i32,
    /// Fleet size in the last simulated year.
    pub final_fleet_size: usize,
    /// Recycling efficiency in the last simulated year.
    pub final_recycling_efficiency: f64,
    /// Virgin lithium demanded in the last simulated year (kg).
    pub final_virgin_lithium: f64,
    /// Virgin cobalt demanded in the last simulated year (kg).
    pub final_virgin_cobalt: f64,
    /// Replacement batteries built over the run.
    pub batteries_produced: usize,
    /// Batteries sent to recyclers over the run.
    pub batteries_recycled: usize,
    /// Batteries discarded over the run.
    pub batteries_discarded: usize,
    /// Virgin lithium over the run (kg).
    pub total_virgin_lithium: f64,
    /// Virgin cobalt over the run (kg).
    pub total_virgin_cobalt: f64,
    /// Recycled lithium consumed over the run (kg).
    pub total_recycled_lithium: f64,
    /// Recycled cobalt consumed over the run (kg).
    pub total_recycled_cobalt: f64,
}

impl RunSummary {
    /// Computes the summary from the complete record vector.
    pub fn from_records(records: &[YearRecord]) -> Self {
        let last = records.last();
        let mut summary = Self {
            years: records.len(),
            final_year: last.map_or(0, |r| r.year),
            final_fleet_size: last.map_or(0, |r| r.fleet_size),
            final_recycling_efficiency: last.map_or(0.0, |r| r.recycling_efficiency),
            final_virgin_lithium: last.map_or(0.0, |r| r.virgin_lithium_required),
            final_virgin_cobalt: last.map_or(0.0, |r| r.virgin_cobalt_required),
            batteries_produced: 0,
            batteries_recycled: 0,
            batteries_discarded: 0,
            total_virgin_lithium: 0.0,
            total_virgin_cobalt: 0.0,
            total_recycled_lithium: 0.0,
            total_recycled_cobalt: 0.0,
        };

        for r in records {
            summary.batteries_produced += r.batteries_produced;
            summary.batteries_recycled += r.batteries_recycled;
            summary.batteries_discarded += r.batteries_discarded;
            summary.total_virgin_lithium += r.virgin_lithium_required;
            summary.total_virgin_cobalt += r.virgin_cobalt_required;
            summary.total_recycled_lithium += r.recycled_lithium_used;
            summary.total_recycled_cobalt += r.recycled_cobalt_used;
        }

        summary
    }

    /// Share of lithium consumption met from recycled material (%).
    pub fn recycled_lithium_share_pct(&self) -> f64 {
        share_pct(self.total_recycled_lithium, self.total_virgin_lithium)
    }

    /// Share of cobalt consumption met from recycled material (%).
    pub fn recycled_cobalt_share_pct(&self) -> f64 {
        share_pct(self.total_recycled_cobalt, self.total_virgin_cobalt)
    }
}

fn share_pct(recycled: f64, virgin: f64) -> f64 {
    let total = recycled + virgin;
    if total > 0.0 {
        100.0 * recycled / total
    } else {
        0.0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Summary ---")?;
        writeln!(f, "Years simulated:       {} (to {})", self.years, self.final_year)?;
        writeln!(f, "Final fleet size:      {}", self.final_fleet_size)?;
        writeln!(
            f,
            "Final efficiency:      {:.1}%",
            self.final_recycling_efficiency * 100.0
        )?;
        writeln!(
            f,
            "Batteries:             {} built, {} recycled, {} discarded",
            self.batteries_produced, self.batteries_recycled, self.batteries_discarded
        )?;
        writeln!(
            f,
            "Virgin lithium:        {:.2} kg total, {:.2} kg final year",
            self.total_virgin_lithium, self.final_virgin_lithium
        )?;
        writeln!(
            f,
            "Virgin cobalt:         {:.2} kg total, {:.2} kg final year",
            self.total_virgin_cobalt, self.final_virgin_cobalt
        )?;
        writeln!(
            f,
            "Recycled lithium used: {:.2} kg ({:.1}%)",
            self.total_recycled_lithium,
            self.recycled_lithium_share_pct()
        )?;
        write!(
            f,
            "Recycled cobalt used:  {:.2} kg ({:.1}%)",
            self.total_recycled_cobalt,
            self.recycled_cobalt_share_pct()
        )
    }
}

/// Final-year virgin demand reduction of one run against a counterfactual.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandReduction {
    /// Year compared.
    pub year: i32,
    /// Lithium demand reduction (%).
    pub lithium_pct: f64,
    /// Cobalt demand reduction (%).
    pub cobalt_pct: f64,
}

impl DemandReduction {
    /// Compares final-year virgin demand of `with` against `without`.
    ///
    /// A counterfactual with zero demand yields a 0% reduction.
    ///
    /// # Errors
    ///
    /// Returns `SimError::YearMismatch` if the runs end in different years.
    pub fn between(with: &RunSummary, without: &RunSummary) -> Result<Self, SimError> {
        if with.final_year != without.final_year {
            return Err(SimError::YearMismatch {
                run: with.final_year,
                counterfactual: without.final_year,
            });
        }
        Ok(Self {
            year: with.final_year,
            lithium_pct: reduction_pct(with.final_virgin_lithium, without.final_virgin_lithium),
            cobalt_pct: reduction_pct(with.final_virgin_cobalt, without.final_virgin_cobalt),
        })
    }
}

fn reduction_pct(with: f64, without: f64) -> f64 {
    if without > 0.0 {
        (1.0 - with / without) * 100.0
    } else {
        0.0
    }
}

impl fmt::Display for DemandReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Demand Reduction ({}) ---", self.year)?;
        writeln!(f, "Lithium demand reduced by: {:.2}%", self.lithium_pct)?;
        write!(f, "Cobalt demand reduced by:  {:.2}%", self.cobalt_pct)
    }
}
