//! Content factory for building catalogues from data files.

use std::path::{Path, PathBuf};

use grimoire_core::{AfflictionCatalog, CharacterSetup, CombatConfig, StaticBalanceTable};

use crate::catalog::{Content, EnemyCatalog, SpellCatalog};
use crate::loaders::{
    AfflictionLoader, BalanceLoader, CharacterLoader, ConfigLoader, EnemyLoader, LoadResult,
    SpellLoader,
};

const BUILTIN_CONFIG: &str = include_str!("../../data/config.toml");
const BUILTIN_BALANCE: &str = include_str!("../../data/balance.toml");
const BUILTIN_AFFLICTIONS: &str = include_str!("../../data/afflictions.ron");
const BUILTIN_SPELLS: &str = include_str!("../../data/spells.ron");
const BUILTIN_ENEMIES: &str = include_str!("../../data/enemies.ron");
const BUILTIN_APPRENTICE: &str = include_str!("../../data/characters/apprentice.ron");

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── balance.toml
/// ├── afflictions.ron
/// ├── spells.ron
/// ├── enemies.ron
/// └── characters/
///     └── apprentice.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The content shipped inside this crate.
    pub fn builtin() -> LoadResult<Content> {
        Ok(Content {
            config: ConfigLoader::parse(BUILTIN_CONFIG)?,
            balance: BalanceLoader::parse(BUILTIN_BALANCE)?,
            afflictions: AfflictionLoader::parse(BUILTIN_AFFLICTIONS)?,
            spells: SpellLoader::parse(BUILTIN_SPELLS)?,
            enemies: EnemyLoader::parse(BUILTIN_ENEMIES)?,
        })
    }

    /// The builtin starting character.
    pub fn builtin_character() -> LoadResult<CharacterSetup> {
        CharacterLoader::parse(BUILTIN_APPRENTICE)
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the balance table from `balance.toml`.
    pub fn load_balance(&self) -> LoadResult<StaticBalanceTable> {
        BalanceLoader::load(&self.data_dir.join("balance.toml"))
    }

    /// Load affliction definitions from `afflictions.ron`.
    pub fn load_afflictions(&self) -> LoadResult<AfflictionCatalog> {
        AfflictionLoader::load(&self.data_dir.join("afflictions.ron"))
    }

    /// Load spell definitions from `spells.ron`.
    pub fn load_spells(&self) -> LoadResult<SpellCatalog> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    /// Load enemy definitions from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<EnemyCatalog> {
        EnemyLoader::load(&self.data_dir.join("enemies.ron"))
    }

    /// Load a character preset from `characters/{name}.ron`.
    pub fn load_character(&self, name: &str) -> LoadResult<CharacterSetup> {
        let path = self
            .data_dir
            .join("characters")
            .join(format!("{}.ron", name));
        CharacterLoader::load(&path)
    }

    /// Load every catalogue.
    pub fn load_all(&self) -> LoadResult<Content> {
        let content = Content {
            config: self.load_config()?,
            balance: self.load_balance()?,
            afflictions: self.load_afflictions()?,
            spells: self.load_spells()?,
            enemies: self.load_enemies()?,
        };
        tracing::info!(
            data_dir = %self.data_dir.display(),
            spells = content.spells.len(),
            enemies = content.enemies.len(),
            "content loaded"
        );
        Ok(content)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
