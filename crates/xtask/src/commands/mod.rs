//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod simulate;
mod validate_content;

pub use simulate::Simulate;
pub use validate_content::ValidateContent;

use std::path::Path;

use anyhow::{Context, Result};
use grimoire_content::{Content, ContentFactory};
use grimoire_core::CharacterSetup;

/// Loads content from `data_dir`, or the builtin content when none is given.
fn load_content(data_dir: Option<&Path>) -> Result<Content> {
    match data_dir {
        Some(dir) => ContentFactory::new(dir)
            .load_all()
            .with_context(|| format!("Failed to load content from {}", dir.display())),
        None => ContentFactory::builtin().context("Builtin content is broken"),
    }
}

/// Loads a named character preset, or the builtin one.
fn load_character(data_dir: Option<&Path>, name: Option<&str>) -> Result<CharacterSetup> {
    match (data_dir, name) {
        (Some(dir), Some(name)) => ContentFactory::new(dir)
            .load_character(name)
            .with_context(|| format!("Failed to load character '{}'", name)),
        (None, Some(name)) => {
            anyhow::bail!("Character '{}' requires --data-dir", name)
        }
        (_, None) => ContentFactory::builtin_character().context("Builtin character is broken"),
    }
}
