use rand::Rng;

use super::types::YearContext;

/// What happened to an owner's battery during one yearly step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerOutcome {
    /// Battery still in service.
    InUse,
    /// Battery reached end of life, went to a recycler, and was replaced.
    Recycled,
    /// Battery reached end of life, was discarded, and was replaced.
    Discarded,
}

/// An electric-vehicle owner holding one battery.
///
/// Each year the battery ages by one year and the owner's awareness of
/// recycling (`network_influence`) grows towards its ceiling. Once the
/// battery reaches the configured lifespan the owner makes a single
/// recycle-or-discard decision and buys a replacement either way.
#[derive(Debug, Clone, Default)]
pub struct Owner {
    /// Age of the current battery in years.
    pub battery_age: u32,
    /// Whether the current battery's end of life has been handled.
    pub has_recycled_this_cycle: bool,
    /// Scalar awareness bonus added to the base recycle probability.
    pub network_influence: f64,
}

/// Effective probability that an owner recycles.
///
/// # Examples
///
/// ```
/// use ev_recycling_sim::agents::owner::recycle_probability;
///
/// assert_eq!(recycle_probability(0.5, 0.1, 0.95), 0.6);
/// assert_eq!(recycle_probability(0.9, 0.5, 0.95), 0.95);
/// ```
pub fn recycle_probability(base: f64, influence: f64, cap: f64) -> f64 {
    (base + influence).min(cap)
}

impl Owner {
    /// Creates an owner whose battery is `battery_age` years old.
    pub fn new(battery_age: u32) -> Self {
        Self {
            battery_age,
            has_recycled_this_cycle: false,
            network_influence: 0.0,
        }
    }

    /// Advances this owner by one year.
    pub fn step(&mut self, ctx: &mut YearContext<'_>) -> OwnerOutcome {
        let params = ctx.params;

        self.battery_age += 1;
        self.network_influence =
            (self.network_influence + params.influence_increase).min(params.max_influence);

        if self.battery_age < params.battery_lifespan || self.has_recycled_this_cycle {
            return OwnerOutcome::InUse;
        }

        let p = recycle_probability(
            params.base_recycling_probability,
            self.network_influence,
            params.max_recycling_probability,
        );
        let outcome = if ctx.rng.random::<f64>() < p {
            self.recycle_battery(ctx);
            OwnerOutcome::Recycled
        } else {
            // Material is lost; nothing is booked.
            self.has_recycled_this_cycle = true;
            OwnerOutcome::Discarded
        };

        self.replace_battery(ctx);
        outcome
    }

    fn recycle_battery(&mut self, ctx: &mut YearContext<'_>) {
        if !ctx.recyclers.is_empty() {
            let idx = ctx.rng.random_range(0..ctx.recyclers.len());
            ctx.recyclers[idx].receive_battery(
                ctx.ledger,
                ctx.params.per_battery,
                ctx.recycling_efficiency,
            );
        }
        self.has_recycled_this_cycle = true;
    }

    fn replace_battery(&mut self, ctx: &mut YearContext<'_>) {
        if !ctx.manufacturers.is_empty() {
            let idx = ctx.rng.random_range(0..ctx.manufacturers.len());
            ctx.manufacturers[idx].produce_battery(ctx.ledger, ctx.params.per_battery);
        }
        self.battery_age = 0;
        self.has_recycled_this_cycle = false;
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::agents::{Manufacturer, Recycler};
    use crate::config::ScenarioConfig;
    use crate::sim::ledger::MaterialLedger;
    use crate::sim::types::{Materials, Parameters};

    struct Fixture {
        params: Parameters,
        ledger: MaterialLedger,
        manufacturers: Vec<Manufacturer>,
        recyclers: Vec<Recycler>,
        rng: StdRng,
    }

    impl Fixture {
        fn new(cfg: &ScenarioConfig) -> Self {
            Self {
                params: Parameters::from_config(cfg),
                ledger: MaterialLedger::new(),
                manufacturers: vec![Manufacturer::new(); 2],
                recyclers: vec![Recycler::new(); 2],
                rng: StdRng::seed_from_u64(7),
            }
        }

        fn step(&mut self, owner: &mut Owner, efficiency: f64) -> OwnerOutcome {
            let mut ctx = YearContext {
                params: &self.params,
                recycling_efficiency: efficiency,
                ledger: &mut self.ledger,
                manufacturers: &mut self.manufacturers,
                recyclers: &mut self.recyclers,
                rng: &mut self.rng,
            };
            owner.step(&mut ctx)
        }

        fn produced(&self) -> usize {
            self.manufacturers.iter().map(|m| m.batteries_produced).sum()
        }

        fn received(&self) -> usize {
            self.recyclers.iter().map(|r| r.batteries_received).sum()
        }
    }

    #[test]
    fn probability_is_capped() {
        assert_eq!(recycle_probability(0.9, 0.5, 0.95), 0.95);
        assert_eq!(recycle_probability(0.0, 0.0, 0.95), 0.0);
    }

    #[test]
    fn young_battery_only_ages() {
        let mut fx = Fixture::new(&ScenarioConfig::baseline());
        let mut owner = Owner::new(0);

        for year in 1..8 {
            assert_eq!(fx.step(&mut owner, 0.6), OwnerOutcome::InUse);
            assert_eq!(owner.battery_age, year);
        }
        assert_eq!(fx.produced(), 0);
        assert_eq!(fx.ledger.virgin_required_this_year(), Materials::ZERO);
    }

    #[test]
    fn influence_grows_then_saturates() {
        let mut fx = Fixture::new(&ScenarioConfig::baseline());
        let mut owner = Owner::new(0);

        fx.step(&mut owner, 0.6);
        assert!((owner.network_influence - 0.01).abs() < 1e-12);

        let mut last = owner.network_influence;
        for _ in 0..100 {
            fx.step(&mut owner, 0.6);
            assert!(owner.network_influence >= last);
            last = owner.network_influence;
        }
        assert_eq!(owner.network_influence, 0.5);
    }

    #[test]
    fn end_of_life_always_replaces_battery() {
        let mut fx = Fixture::new(&ScenarioConfig::baseline());
        let mut owner = Owner::new(7);

        let outcome = fx.step(&mut owner, 0.6);

        assert_ne!(outcome, OwnerOutcome::InUse);
        assert_eq!(owner.battery_age, 0);
        assert!(!owner.has_recycled_this_cycle);
        assert_eq!(fx.produced(), 1);
        assert_eq!(fx.ledger.batteries_produced_this_year(), 1);
    }

    #[test]
    fn certain_recycler_returns_battery() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.recycling.base_recycling_probability = 1.0;
        cfg.recycling.max_recycling_probability = 1.0;
        let mut fx = Fixture::new(&cfg);
        let mut owner = Owner::new(7);

        assert_eq!(fx.step(&mut owner, 0.5), OwnerOutcome::Recycled);
        assert_eq!(fx.received(), 1);
        // Recovered 1.25 Li / 3.0 Co, then the replacement drew all of it.
        assert_eq!(fx.ledger.recycled_used_this_year(), Materials::new(1.25, 3.0));
        assert_eq!(fx.ledger.virgin_required_this_year(), Materials::new(1.25, 3.0));
        assert_eq!(fx.ledger.recycled_pool(), Materials::ZERO);
    }

    #[test]
    fn never_recycling_owner_discards() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.recycling.base_recycling_probability = 0.0;
        cfg.influence.annual_increase = 0.0;
        let mut fx = Fixture::new(&cfg);
        let mut owner = Owner::new(7);

        assert_eq!(fx.step(&mut owner, 0.6), OwnerOutcome::Discarded);
        assert_eq!(fx.received(), 0);
        assert_eq!(fx.ledger.cumulative_recovered(), Materials::ZERO);
        assert_eq!(fx.ledger.virgin_required_this_year(), Materials::new(2.5, 6.0));
    }

    #[test]
    fn past_lifespan_battery_is_handled_immediately() {
        let mut fx = Fixture::new(&ScenarioConfig::baseline());
        let mut owner = Owner::new(20);

        assert_ne!(fx.step(&mut owner, 0.6), OwnerOutcome::InUse);
        assert_eq!(owner.battery_age, 0);
    }

    #[test]
    fn recycled_share_tracks_intermediate_probability() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.recycling.base_recycling_probability = 0.5;
        cfg.influence.annual_increase = 0.0;
        let mut fx = Fixture::new(&cfg);

        let n: u32 = 10_000;
        let mut recycled: u32 = 0;
        for _ in 0..n {
            let mut owner = Owner::new(7);
            match fx.step(&mut owner, 0.6) {
                OwnerOutcome::Recycled => recycled += 1,
                OwnerOutcome::Discarded => {}
                OwnerOutcome::InUse => panic!("end-of-life battery must be handled"),
            }
        }

        let share = f64::from(recycled) / f64::from(n);
        assert!((share - 0.5).abs() < 0.03, "recycled share {share}");
        assert_eq!(fx.received(), recycled as usize);
        assert_eq!(fx.produced(), n as usize);
    }
}
