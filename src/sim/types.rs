//! Core simulation types: material quantities, fixed parameters, and year records.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::config::{GrowthConfig, ScenarioConfig};

/// A lithium/cobalt quantity pair in kilograms.
///
/// The two materials are always accounted independently; arithmetic is
/// component-wise.
///
/// # Examples
///
/// ```
/// use ev_recycling_sim::sim::types::Materials;
///
/// let per_battery = Materials::new(2.5, 6.0);
/// let recovered = per_battery * 0.5;
/// assert_eq!(recovered, Materials::new(1.25, 3.0));
/// assert_eq!(per_battery.min(Materials::new(1.0, 10.0)), Materials::new(1.0, 6.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Materials {
    /// Lithium (kg).
    pub lithium: f64,
    /// Cobalt (kg).
    pub cobalt: f64,
}

impl Materials {
    /// Zero of both materials.
    pub const ZERO: Self = Self {
        lithium: 0.0,
        cobalt: 0.0,
    };

    pub const fn new(lithium: f64, cobalt: f64) -> Self {
        Self { lithium, cobalt }
    }

    /// Component-wise minimum.
    pub fn min(self, other: Self) -> Self {
        Self {
            lithium: self.lithium.min(other.lithium),
            cobalt: self.cobalt.min(other.cobalt),
        }
    }
}

impl Add for Materials {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.lithium + rhs.lithium, self.cobalt + rhs.cobalt)
    }
}

impl AddAssign for Materials {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Materials {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.lithium - rhs.lithium, self.cobalt - rhs.cobalt)
    }
}

impl SubAssign for Materials {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Materials {
    type Output = Self;

    fn mul(self, factor: f64) -> Self {
        Self::new(self.lithium * factor, self.cobalt * factor)
    }
}

/// Fixed parameters shared by every agent for the whole run.
///
/// Derived once from a validated [`ScenarioConfig`]; never mutated.
#[derive(Debug, Clone)]
pub struct Parameters {
    /// Material content of one battery.
    pub per_battery: Materials,
    /// Battery age (years) at which the owner must replace it.
    pub battery_lifespan: u32,
    /// Owner recycle probability before network influence.
    pub base_recycling_probability: f64,
    /// Ceiling on the effective recycle probability.
    pub max_recycling_probability: f64,
    /// Network influence gained by each owner per year.
    pub influence_increase: f64,
    /// Ceiling on network influence.
    pub max_influence: f64,
    /// Geometric annual growth of recycling efficiency.
    pub efficiency_growth: f64,
    /// Ceiling on recycling efficiency.
    pub max_efficiency: f64,
    /// Fleet growth-rate schedule.
    pub growth: GrowthConfig,
}

impl Parameters {
    pub fn from_config(cfg: &ScenarioConfig) -> Self {
        Self {
            per_battery: Materials::new(cfg.battery.lithium_kg, cfg.battery.cobalt_kg),
            battery_lifespan: cfg.battery.lifespan_years,
            base_recycling_probability: cfg.recycling.base_recycling_probability,
            max_recycling_probability: cfg.recycling.max_recycling_probability,
            influence_increase: cfg.influence.annual_increase,
            max_influence: cfg.influence.max_influence,
            efficiency_growth: cfg.recycling.efficiency_growth,
            max_efficiency: cfg.recycling.max_efficiency,
            growth: cfg.growth.clone(),
        }
    }
}

/// Aggregate record of one simulated year.
///
/// `fleet_size` and `recycling_efficiency` are the values in force while the
/// year's agents acted; pools are the end-of-year balances.
#[derive(Debug, Clone, PartialEq)]
pub struct YearRecord {
    /// Calendar year.
    pub year: i32,
    /// Number of owners active during the year.
    pub fleet_size: usize,
    /// Recycling efficiency applied to batteries received this year.
    pub recycling_efficiency: f64,
    /// Virgin lithium needed to cover this year's production (kg).
    pub virgin_lithium_required: f64,
    /// Virgin cobalt needed to cover this year's production (kg).
    pub virgin_cobalt_required: f64,
    /// Recycled lithium available at year end (kg).
    pub recycled_lithium_pool: f64,
    /// Recycled cobalt available at year end (kg).
    pub recycled_cobalt_pool: f64,
    /// Lithium drawn from the recycled pool this year (kg).
    pub recycled_lithium_used: f64,
    /// Cobalt drawn from the recycled pool this year (kg).
    pub recycled_cobalt_used: f64,
    /// Lithium recovered by recyclers this year (kg).
    pub lithium_recovered: f64,
    /// Cobalt recovered by recyclers this year (kg).
    pub cobalt_recovered: f64,
    /// Replacement batteries built this year.
    pub batteries_produced: usize,
    /// End-of-life batteries sent to a recycler this year.
    pub batteries_recycled: usize,
    /// End-of-life batteries discarded this year.
    pub batteries_discarded: usize,
}

impl fmt::Display for YearRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | fleet={:>8}  eff={:>5.1}% | virgin Li={:>10.1} kg  Co={:>10.1} kg | \
             pool Li={:>9.1} kg  Co={:>9.1} kg | built={} recycled={} discarded={}",
            self.year,
            self.fleet_size,
            self.recycling_efficiency * 100.0,
            self.virgin_lithium_required,
            self.virgin_cobalt_required,
            self.recycled_lithium_pool,
            self.recycled_cobalt_pool,
            self.batteries_produced,
            self.batteries_recycled,
            self.batteries_discarded,
        )
    }
}
