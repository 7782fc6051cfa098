use crate::sim::ledger::{Draw, MaterialLedger};
use crate::sim::types::Materials;

/// A battery manufacturer.
///
/// Has no behaviour of its own; it builds a battery whenever an owner asks
/// for a replacement. All material accounting goes through the shared
/// [`MaterialLedger`], which prefers recycled material over virgin.
#[derive(Debug, Clone, Default)]
pub struct Manufacturer {
    /// Batteries built in the current year.
    pub batteries_produced: usize,
    /// Recycled lithium plus cobalt consumed in the current year (kg).
    pub recycled_materials_used: f64,
    /// Batteries built over the whole run.
    pub lifetime_batteries_produced: usize,
}

impl Manufacturer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new annual window. Lifetime counters are kept.
    pub fn begin_year(&mut self) {
        self.batteries_produced = 0;
        self.recycled_materials_used = 0.0;
    }

    /// Builds one battery needing `per_battery` of material.
    ///
    /// Returns how the need was split between recycled and virgin material.
    pub fn produce_battery(&mut self, ledger: &mut MaterialLedger, per_battery: Materials) -> Draw {
        let draw = ledger.draw(per_battery);

        self.batteries_produced += 1;
        self.lifetime_batteries_produced += 1;
        self.recycled_materials_used += draw.recycled.lithium + draw.recycled.cobalt;

        draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATTERY: Materials = Materials::new(2.5, 6.0);

    #[test]
    fn produce_counts_and_books_virgin_demand() {
        let mut ledger = MaterialLedger::new();
        let mut m = Manufacturer::new();

        m.produce_battery(&mut ledger, BATTERY);
        m.produce_battery(&mut ledger, BATTERY);

        assert_eq!(m.batteries_produced, 2);
        assert_eq!(m.recycled_materials_used, 0.0);
        assert_eq!(ledger.virgin_required_this_year(), Materials::new(5.0, 12.0));
    }

    #[test]
    fn recycled_usage_tracked_per_manufacturer() {
        let mut ledger = MaterialLedger::new();
        ledger.deposit(Materials::new(1.0, 2.0));
        let mut m = Manufacturer::new();

        let draw = m.produce_battery(&mut ledger, BATTERY);

        assert_eq!(draw.recycled, Materials::new(1.0, 2.0));
        assert_eq!(draw.virgin, Materials::new(1.5, 4.0));
        assert_eq!(m.recycled_materials_used, 3.0);
    }

    #[test]
    fn begin_year_resets_annual_window_only() {
        let mut ledger = MaterialLedger::new();
        let mut m = Manufacturer::new();
        m.produce_battery(&mut ledger, BATTERY);

        m.begin_year();

        assert_eq!(m.batteries_produced, 0);
        assert_eq!(m.recycled_materials_used, 0.0);
        assert_eq!(m.lifetime_batteries_produced, 1);
    }
}
