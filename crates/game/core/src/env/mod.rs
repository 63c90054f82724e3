//! Read-only collaborators injected into the combat engine.
//!
//! The engine never reaches for ambient globals: balance values, randomness,
//! affliction definitions, and tunables all arrive through [`CombatEnv`].
mod afflictions;
mod rng;
mod tables;

pub use afflictions::{AfflictionBehavior, AfflictionCatalog, AfflictionDefinition};
pub use rng::{PcgRng, RngOracle, SequenceRng, compute_seed, next_seed};
pub use tables::{BalanceTable, BalanceValue, StaticBalanceTable};

use crate::config::CombatConfig;

/// Bundles the read-only oracles the engine consults.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    balance: &'a dyn BalanceTable,
    rng: &'a dyn RngOracle,
    afflictions: &'a AfflictionCatalog,
    config: &'a CombatConfig,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        balance: &'a dyn BalanceTable,
        rng: &'a dyn RngOracle,
        afflictions: &'a AfflictionCatalog,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            balance,
            rng,
            afflictions,
            config,
        }
    }

    pub fn balance(&self) -> &'a dyn BalanceTable {
        self.balance
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    pub fn afflictions(&self) -> &'a AfflictionCatalog {
        self.afflictions
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }
}

impl std::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("afflictions", &self.afflictions.len())
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
