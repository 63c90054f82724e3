//! Character preset loader.

use std::path::Path;

use grimoire_core::CharacterSetup;

use crate::loaders::{LoadResult, read_file};

/// Loader for character presets from RON files.
pub struct CharacterLoader;

impl CharacterLoader {
    /// Load a character preset from a RON file.
    pub fn load(path: &Path) -> LoadResult<CharacterSetup> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CharacterSetup> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character RON: {}", e))
    }
}
