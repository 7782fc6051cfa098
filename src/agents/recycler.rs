use crate::sim::ledger::MaterialLedger;
use crate::sim::types::Materials;

/// A battery recycling company.
///
/// Recovers `efficiency` of each returned battery's lithium and cobalt into
/// the shared recycled pool. The remaining fraction is unrecoverable and is
/// not tracked anywhere.
#[derive(Debug, Clone, Default)]
pub struct Recycler {
    /// Batteries received in the current year.
    pub batteries_received: usize,
    /// Material recovered in the current year.
    pub recovered: Materials,
    /// Batteries received over the whole run.
    pub lifetime_batteries_received: usize,
    /// Material recovered over the whole run.
    pub lifetime_recovered: Materials,
}

impl Recycler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new annual window. Lifetime counters are kept.
    pub fn begin_year(&mut self) {
        self.batteries_received = 0;
        self.recovered = Materials::ZERO;
    }

    /// Processes one end-of-life battery and returns the material recovered.
    pub fn receive_battery(
        &mut self,
        ledger: &mut MaterialLedger,
        per_battery: Materials,
        efficiency: f64,
    ) -> Materials {
        let recovered = per_battery * efficiency;

        self.batteries_received += 1;
        self.lifetime_batteries_received += 1;
        self.recovered += recovered;
        self.lifetime_recovered += recovered;
        ledger.deposit(recovered);

        recovered
    }
}
