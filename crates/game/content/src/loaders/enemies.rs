//! Enemy catalogue loader.

use std::path::Path;

use grimoire_core::EnemyDefinition;
use serde::Deserialize;

use crate::catalog::EnemyCatalog;
use crate::loaders::{LoadResult, read_file};

/// Enemy catalogue structure for RON files.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemyFile {
    pub enemies: Vec<EnemyDefinition>,
}

/// Loader for enemy definitions from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load the enemy catalogue from a RON file.
    pub fn load(path: &Path) -> LoadResult<EnemyCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an enemy catalogue from RON text.
    ///
    /// Each enemy's action references are checked here; spell references
    /// are checked against the spell catalogue by [`crate::Content::problems`].
    pub fn parse(content: &str) -> LoadResult<EnemyCatalog> {
        let file: EnemyFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON: {}", e))?;

        for enemy in &file.enemies {
            enemy
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid enemy '{}': {}", enemy.name, e))?;
        }

        tracing::debug!(count = file.enemies.len(), "loaded enemies");
        Ok(EnemyCatalog::new(file.enemies))
    }
}
