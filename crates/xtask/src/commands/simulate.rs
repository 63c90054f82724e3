//! Run a single combat from content files
//!
//! The character queues every spell it can afford each turn, in spellbook
//! order. Useful for eyeballing balance changes and replaying seeds.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use grimoire_core::{CombatEngine, CombatEvent, CombatSummary, EventLog, PcgRng};

/// Run one combat with a greedy spell policy
#[derive(Parser)]
pub struct Simulate {
    /// Enemy to fight (e.g., Slime, Cultist)
    #[arg(value_name = "ENEMY")]
    enemy: String,

    /// Combat seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Character preset under <DATA_DIR>/characters (builtin when omitted)
    #[arg(short, long, value_name = "NAME")]
    character: Option<String>,

    /// Content directory (builtin content when omitted)
    #[arg(short, long, value_name = "DIR", env = "GRIMOIRE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Stop after this many turns
    #[arg(long, default_value_t = 100)]
    max_turns: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// Final summary only
    Summary,
    /// Every combat event, then the summary
    Events,
    /// Summary as RON
    Ron,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let content = super::load_content(self.data_dir.as_deref())?;
        let character =
            super::load_character(self.data_dir.as_deref(), self.character.as_deref())?;

        let mut state = content
            .build_combat(&character, &self.enemy, self.seed)
            .with_context(|| format!("Failed to build combat against '{}'", self.enemy))?;

        let rng = PcgRng;
        let mut log = EventLog::default();
        let mut engine = CombatEngine::new(&mut state, content.env(&rng)).with_observer(&mut log);

        engine.start_combat()?;
        while engine.state().turn_number() <= self.max_turns {
            queue_affordable(&mut engine);
            if engine.end_player_turn()?.is_some() {
                break;
            }
        }

        let summary = CombatSummary::from_state(engine.state());
        drop(engine);

        match self.format {
            OutputFormat::Summary => print_summary(&self.enemy, self.seed, &summary),
            OutputFormat::Events => {
                print_events(&log.events);
                print_summary(&self.enemy, self.seed, &summary);
            }
            OutputFormat::Ron => {
                let text = ron::ser::to_string_pretty(&summary, ron::ser::PrettyConfig::default())
                    .context("Failed to serialize summary to RON")?;
                println!("{}", text);
            }
        }

        Ok(())
    }
}

/// Queues every spell that currently passes its cast checks.
fn queue_affordable(engine: &mut CombatEngine<'_>) {
    let labels: Vec<String> = engine
        .state()
        .character_spells
        .iter()
        .map(|(_, spell)| spell.label().to_string())
        .collect();

    for label in labels {
        if engine.can_cast(&label).is_err() {
            continue;
        }
        if let Err(err) = engine.queue_spell(&label) {
            tracing::warn!(spell = %label, error = %err, "queue failed after passing checks");
        }
    }
}

fn print_events(events: &[CombatEvent]) {
    println!("{}", style("=== Combat Log ===").bold().green());
    for event in events {
        match event {
            CombatEvent::TurnStarted { .. } => println!("{}", style(format!("{:?}", event)).cyan()),
            CombatEvent::CombatantDied { .. } | CombatEvent::CombatEnded { .. } => {
                println!("{}", style(format!("{:?}", event)).bold().red())
            }
            _ => println!("  {:?}", event),
        }
    }
    println!();
}

fn print_summary(enemy: &str, seed: u64, summary: &CombatSummary) {
    println!("{}", style("=== Combat Summary ===").bold().green());
    println!("  {} {}", style("Enemy:").bold().yellow(), enemy);
    println!("  {} {}", style("Seed:").bold().yellow(), seed);

    let outcome = match summary.outcome {
        Some(outcome) => style(format!("{:?}", outcome)).bold(),
        None => style("Unfinished".to_string()).dim(),
    };
    println!("  {} {}", style("Outcome:").bold().yellow(), outcome);
    println!("  {} {}", style("Turns:").bold().yellow(), summary.turns);
    println!(
        "  {} {} dealt / {} taken",
        style("Damage:").bold().yellow(),
        summary.damage_dealt,
        summary.damage_taken
    );
    println!(
        "  {} character {} / enemy {}",
        style("HP:").bold().yellow(),
        summary.character_hp,
        summary.enemy_hp
    );
}
