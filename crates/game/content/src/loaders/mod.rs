//! Content loaders for reading combat data from files.
//!
//! This module provides loaders that convert RON/TOML files into the
//! catalogues and oracles defined in [`crate::catalog`]. Every loader can
//! read from a path or parse an in-memory string (used for the builtin
//! content embedded in the crate).

pub mod afflictions;
pub mod balance;
pub mod characters;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod spells;

pub use afflictions::AfflictionLoader;
pub use balance::BalanceLoader;
pub use characters::CharacterLoader;
pub use config::ConfigLoader;
pub use enemies::EnemyLoader;
pub use factory::ContentFactory;
pub use spells::SpellLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
