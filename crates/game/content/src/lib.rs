//! Data-driven combat content and loaders.
//!
//! This crate houses the static content combats are built from and provides
//! loaders for RON/TOML data files:
//! - Spell definitions (RON)
//! - Enemy definitions and behavior tables (RON)
//! - Affliction definitions (RON)
//! - Character presets (RON)
//! - Balance table (TOML)
//! - Combat configuration (TOML)
//!
//! Content is consumed through the `grimoire-core` oracles and never appears
//! in combat state except as shared, immutable definitions.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{Content, EnemyCatalog, SpellCatalog};

#[cfg(feature = "loaders")]
pub use loaders::{
    AfflictionLoader, BalanceLoader, CharacterLoader, ConfigLoader, ContentFactory, EnemyLoader,
    SpellLoader,
};
