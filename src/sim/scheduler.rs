//! Random activation order for one simulated year.

use rand::Rng;
use rand::seq::SliceRandom;

/// One agent to activate, addressed by its index in its own collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activation {
    Owner(usize),
    Manufacturer(usize),
    Recycler(usize),
}

/// Produces a fresh uniformly shuffled activation order every year.
///
/// Every agent appears exactly once. The order only decides which
/// manufacturer or recycler an owner happens to draw; ledger totals are
/// sums of commuting updates and do not depend on it.
#[derive(Debug, Default)]
pub struct RandomActivation {
    order: Vec<Activation>,
}

impl RandomActivation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shuffles all agents and returns the order for this year.
    ///
    /// The buffer is reused across years.
    pub fn order<R: Rng + ?Sized>(
        &mut self,
        owners: usize,
        manufacturers: usize,
        recyclers: usize,
        rng: &mut R,
    ) -> &[Activation] {
        self.order.clear();
        self.order.reserve(owners + manufacturers + recyclers);
        self.order.extend((0..owners).map(Activation::Owner));
        self.order
            .extend((0..manufacturers).map(Activation::Manufacturer));
        self.order.extend((0..recyclers).map(Activation::Recycler));
        self.order.shuffle(rng);
        &self.order
    }
}
