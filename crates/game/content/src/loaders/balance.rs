//! Balance table loader.

use std::collections::HashMap;
use std::path::Path;

use grimoire_core::{BalanceValue, StaticBalanceTable};

use crate::loaders::{LoadResult, read_file};

/// Loader for the balance table from TOML files.
///
/// Each top-level table is an owner (spell label or enemy name); each key
/// inside it is a stat holding either one integer or one integer per level:
///
/// ```toml
/// [Fireball]
/// OtherDamageAmount = [6, 9, 12]
/// ManaCost = 2
/// ```
pub struct BalanceLoader;

impl BalanceLoader {
    /// Load the balance table from a TOML file.
    pub fn load(path: &Path) -> LoadResult<StaticBalanceTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse the balance table from TOML text.
    pub fn parse(content: &str) -> LoadResult<StaticBalanceTable> {
        let entries: HashMap<String, HashMap<String, BalanceValue>> = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))?;
        Ok(StaticBalanceTable::from_entries(entries))
    }
}
