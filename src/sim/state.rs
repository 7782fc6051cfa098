//! Simulation state: agent population, ledger, and the yearly protocol.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agents::{Manufacturer, Owner, OwnerOutcome, Recycler, YearContext};
use crate::config::ScenarioConfig;
use crate::error::SimError;

use super::ledger::MaterialLedger;
use super::scheduler::{Activation, RandomActivation};
use super::types::{Parameters, YearRecord};

/// Owns every agent, the material ledger, and the run's random source.
///
/// One call to [`step`](Self::step) simulates one calendar year:
///
/// 1. `begin_year` clears per-year counters.
/// 2. All agents are activated once in random order.
/// 3. The year's aggregate [`YearRecord`] is taken.
/// 4. Recycling efficiency grows, the fleet grows, and the year advances.
///
/// Two states built from the same configuration produce identical records.
pub struct SimulationState {
    params: Parameters,
    current_year: i32,
    end_year: i32,
    recycling_efficiency: f64,
    running: bool,
    ledger: MaterialLedger,
    owners: Vec<Owner>,
    manufacturers: Vec<Manufacturer>,
    recyclers: Vec<Recycler>,
    scheduler: RandomActivation,
    rng: StdRng,
}

impl SimulationState {
    /// Builds the initial population from a scenario.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfig` with every violation if the scenario
    /// fails validation.
    pub fn new(cfg: &ScenarioConfig) -> Result<Self, SimError> {
        let errors = cfg.validate();
        if !errors.is_empty() {
            return Err(SimError::InvalidConfig(errors));
        }

        let params = Parameters::from_config(cfg);
        let mut rng = StdRng::seed_from_u64(cfg.simulation.seed);

        let pop = &cfg.population;
        let owners = (0..pop.initial_fleet_size)
            .map(|_| {
                let age = if pop.randomize_initial_battery_age {
                    rng.random_range(0..=params.battery_lifespan)
                } else {
                    0
                };
                Owner::new(age)
            })
            .collect();

        Ok(Self {
            current_year: cfg.simulation.start_year,
            end_year: cfg.simulation.end_year,
            recycling_efficiency: cfg.recycling.efficiency_start,
            running: true,
            ledger: MaterialLedger::new(),
            owners,
            manufacturers: vec![Manufacturer::new(); pop.initial_manufacturer_count],
            recyclers: vec![Recycler::new(); pop.initial_recycler_count],
            scheduler: RandomActivation::new(),
            rng,
            params,
        })
    }

    /// Simulates `current_year` and returns its record.
    ///
    /// Returns `None` once the run has passed `end_year`.
    pub fn step(&mut self) -> Option<YearRecord> {
        if !self.running {
            return None;
        }

        self.begin_year();
        let (recycled, discarded) = self.activate_agents();
        let record = self.record(recycled, discarded);

        let before = self.recycling_efficiency;
        self.grow_recycling_efficiency();
        debug!(
            "year {}: efficiency {before:.4} -> {:.4}",
            self.current_year, self.recycling_efficiency
        );
        let added = self.grow_fleet();
        debug!(
            "year {}: fleet +{added} -> {}",
            self.current_year,
            self.fleet_size()
        );
        self.advance_year();

        Some(record)
    }

    /// Clears the per-year counters of the ledger and of every
    /// manufacturer and recycler.
    pub fn begin_year(&mut self) {
        self.ledger.begin_year();
        for m in &mut self.manufacturers {
            m.begin_year();
        }
        for r in &mut self.recyclers {
            r.begin_year();
        }
    }

    /// Multiplies efficiency by `1 + growth`, clamped to the ceiling.
    pub fn grow_recycling_efficiency(&mut self) {
        self.recycling_efficiency = (self.recycling_efficiency
            * (1.0 + self.params.efficiency_growth))
            .min(self.params.max_efficiency);
    }

    /// Adds `floor(fleet_size * rate(current_year))` owners on new
    /// batteries and returns how many were added.
    pub fn grow_fleet(&mut self) -> usize {
        let rate = self.params.growth.rate_for(self.current_year);
        let added = (self.owners.len() as f64 * rate).floor() as usize;
        self.owners.resize(self.owners.len() + added, Owner::new(0));
        added
    }

    /// Moves to the next year and stops the run once past `end_year`.
    pub fn advance_year(&mut self) {
        self.current_year += 1;
        if self.current_year > self.end_year {
            self.running = false;
        }
    }

    fn activate_agents(&mut self) -> (usize, usize) {
        let Self {
            params,
            recycling_efficiency,
            ledger,
            owners,
            manufacturers,
            recyclers,
            scheduler,
            rng,
            ..
        } = self;

        let order = scheduler.order(owners.len(), manufacturers.len(), recyclers.len(), rng);
        let mut ctx = YearContext {
            params,
            recycling_efficiency: *recycling_efficiency,
            ledger,
            manufacturers: manufacturers.as_mut_slice(),
            recyclers: recyclers.as_mut_slice(),
            rng,
        };

        let mut recycled = 0;
        let mut discarded = 0;
        for activation in order {
            match *activation {
                Activation::Owner(i) => match owners[i].step(&mut ctx) {
                    OwnerOutcome::InUse => {}
                    OwnerOutcome::Recycled => recycled += 1,
                    OwnerOutcome::Discarded => discarded += 1,
                },
                // Respond only to owner calls.
                Activation::Manufacturer(_) | Activation::Recycler(_) => {}
            }
        }
        (recycled, discarded)
    }

    fn record(&self, batteries_recycled: usize, batteries_discarded: usize) -> YearRecord {
        let l = &self.ledger;
        let virgin = l.virgin_required_this_year();
        let pool = l.recycled_pool();
        let used = l.recycled_used_this_year();
        let recovered = l.recovered_this_year();
        YearRecord {
            year: self.current_year,
            fleet_size: self.fleet_size(),
            recycling_efficiency: self.recycling_efficiency,
            virgin_lithium_required: virgin.lithium,
            virgin_cobalt_required: virgin.cobalt,
            recycled_lithium_pool: pool.lithium,
            recycled_cobalt_pool: pool.cobalt,
            recycled_lithium_used: used.lithium,
            recycled_cobalt_used: used.cobalt,
            lithium_recovered: recovered.lithium,
            cobalt_recovered: recovered.cobalt,
            batteries_produced: l.batteries_produced_this_year(),
            batteries_recycled,
            batteries_discarded,
        }
    }

    /// Whether another year remains to be simulated.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Year that the next [`step`](Self::step) will simulate.
    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    /// Number of owners; owners are never removed.
    pub fn fleet_size(&self) -> usize {
        self.owners.len()
    }

    pub fn recycling_efficiency(&self) -> f64 {
        self.recycling_efficiency
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn ledger(&self) -> &MaterialLedger {
        &self.ledger
    }

    pub fn owners(&self) -> &[Owner] {
        &self.owners
    }

    pub fn manufacturers(&self) -> &[Manufacturer] {
        &self.manufacturers
    }

    pub fn recyclers(&self) -> &[Recycler] {
        &self.recyclers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::Materials;

    fn state(cfg: &ScenarioConfig) -> SimulationState {
        SimulationState::new(cfg).expect("scenario should be valid")
    }

    #[test]
    fn initial_population_matches_config() {
        let s = state(&ScenarioConfig::baseline());
        assert_eq!(s.fleet_size(), 1000);
        assert_eq!(s.manufacturers().len(), 3);
        assert_eq!(s.recyclers().len(), 1);
        assert_eq!(s.current_year(), 2024);
        assert!(s.is_running());
        assert!(s.owners().iter().all(|o| o.battery_age == 0));
    }

    #[test]
    fn randomized_initial_ages_stay_within_lifespan() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.population.randomize_initial_battery_age = true;
        let s = state(&cfg);
        assert!(s.owners().iter().all(|o| o.battery_age <= 8));
        assert!(s.owners().iter().any(|o| o.battery_age > 0));
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.end_year = cfg.simulation.start_year - 1;
        assert!(matches!(
            SimulationState::new(&cfg),
            Err(SimError::InvalidConfig(_))
        ));
    }

    #[test]
    fn fleet_growth_truncates() {
        let mut s = state(&ScenarioConfig::baseline());
        // 2024 band: 10% of 1000.
        assert_eq!(s.grow_fleet(), 100);
        assert_eq!(s.fleet_size(), 1100);

        let mut cfg = ScenarioConfig::baseline();
        cfg.population.initial_fleet_size = 19;
        let mut s = state(&cfg);
        // 1.9 new owners -> 1.
        assert_eq!(s.grow_fleet(), 1);
        assert_eq!(s.fleet_size(), 20);
        assert_eq!(s.owners()[19].battery_age, 0);
    }

    #[test]
    fn efficiency_growth_is_geometric_and_clamped() {
        let mut s = state(&ScenarioConfig::baseline());
        s.grow_recycling_efficiency();
        assert!((s.recycling_efficiency() - 0.6 * 1.025).abs() < 1e-12);

        for _ in 0..200 {
            let before = s.recycling_efficiency();
            s.grow_recycling_efficiency();
            assert!(s.recycling_efficiency() >= before);
            assert!(s.recycling_efficiency() <= 0.98);
        }
        assert_eq!(s.recycling_efficiency(), 0.98);
    }

    #[test]
    fn running_stops_after_end_year() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.end_year = 2026;
        let mut s = state(&cfg);

        let years: Vec<i32> = std::iter::from_fn(|| s.step()).map(|r| r.year).collect();

        assert_eq!(years, vec![2024, 2025, 2026]);
        assert!(!s.is_running());
        assert_eq!(s.current_year(), 2027);
        assert!(s.step().is_none());
    }

    #[test]
    fn record_reflects_values_in_force_during_the_year() {
        let mut s = state(&ScenarioConfig::baseline());
        let first = s.step().expect("first year");
        assert_eq!(first.year, 2024);
        assert_eq!(first.fleet_size, 1000);
        assert_eq!(first.recycling_efficiency, 0.6);

        let second = s.step().expect("second year");
        assert_eq!(second.fleet_size, 1100);
        assert!((second.recycling_efficiency - 0.6 * 1.025).abs() < 1e-12);
    }

    #[test]
    fn begin_year_resets_agent_windows() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.population.randomize_initial_battery_age = true;
        let mut s = state(&cfg);
        s.step();
        assert!(s.manufacturers().iter().any(|m| m.batteries_produced > 0));

        s.begin_year();
        assert!(s.manufacturers().iter().all(|m| m.batteries_produced == 0));
        assert!(s.recyclers().iter().all(|r| r.batteries_received == 0));
        assert_eq!(s.ledger().virgin_required_this_year(), Materials::ZERO);
    }

    #[test]
    fn agent_counters_agree_with_ledger() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.population.randomize_initial_battery_age = true;
        let mut s = state(&cfg);
        let record = s.step().expect("one year");

        let produced: usize = s.manufacturers().iter().map(|m| m.batteries_produced).sum();
        let received: usize = s.recyclers().iter().map(|r| r.batteries_received).sum();
        assert_eq!(produced, record.batteries_produced);
        assert_eq!(received, record.batteries_recycled);
        assert_eq!(
            record.batteries_produced,
            record.batteries_recycled + record.batteries_discarded
        );
    }
}
