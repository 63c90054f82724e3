//! Validate a content directory
//!
//! Loads every catalogue, cross-checks spell, enemy, and balance references,
//! and tries to build a combat for each enemy against the chosen character.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

/// Load content and report every consistency problem
#[derive(Parser)]
pub struct ValidateContent {
    /// Content directory (builtin content when omitted)
    #[arg(short, long, value_name = "DIR", env = "GRIMOIRE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Character preset to build combats with (builtin when omitted)
    #[arg(short, long, value_name = "NAME")]
    character: Option<String>,
}

impl ValidateContent {
    pub fn execute(self) -> Result<()> {
        let content = super::load_content(self.data_dir.as_deref())?;
        let character =
            super::load_character(self.data_dir.as_deref(), self.character.as_deref())?;

        match &self.data_dir {
            Some(dir) => println!("{} {}", style("Content:").bold().cyan(), dir.display()),
            None => println!("{} builtin", style("Content:").bold().cyan()),
        }
        println!(
            "{} {} spells, {} enemies, {} afflictions",
            style("Loaded:").bold().cyan(),
            content.spells.len(),
            content.enemies.len(),
            content.afflictions.len()
        );
        println!();

        let mut problems: Vec<String> = content
            .problems()
            .into_iter()
            .map(|err| err.to_string())
            .collect();

        for enemy in content.enemies.names() {
            if let Err(err) = content.build_combat(&character, enemy, 0) {
                problems.push(format!("{} vs {}: {}", character.stats.name, enemy, err));
            }
        }

        if problems.is_empty() {
            println!("{}", style("No problems found").bold().green());
            return Ok(());
        }

        println!("{}", style("=== Problems ===").bold().red());
        for problem in &problems {
            println!("  - {}", problem);
        }
        println!();

        anyhow::bail!("{} content problem(s) found", problems.len())
    }
}
