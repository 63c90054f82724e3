//! Authoritative combat state.
//!
//! This module owns the data describing one fight: both combatants, their
//! spellbooks and queues, the character's deck, the enemy's decision state,
//! and turn bookkeeping. Callers read it freely but mutate it exclusively
//! through [`CombatEngine`](crate::engine::CombatEngine).
mod afflictions;
mod combatant;
mod deck;
mod queue;
mod turn;

use std::sync::Arc;

use crate::engine::CombatEvent;
use crate::enemy::{EnemyDefinition, EnemyProfile};
use crate::env::BalanceTable;
use crate::error::ContentError;
use crate::spell::{CastType, SpellOracle, Spellbook};

pub use afflictions::{
    Affliction, AfflictionSign, AfflictionType, Afflictions, DecayPolicy, SignSet, StackChange,
};
pub use combatant::{Absorption, Combatant, CombatantSetup, HpChange, Side};
pub use deck::Deck;
pub use queue::{QueuedSpell, SpellQueue};
pub use turn::{CombatOutcome, CombatPhase, TurnState};

/// An equipped spell at an upgrade level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquippedSpell {
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
}

impl EquippedSpell {
    pub fn new(label: impl Into<String>, level: u32) -> Self {
        Self {
            label: label.into(),
            level,
        }
    }
}

/// Persistent character data a combat is built from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSetup {
    pub stats: CombatantSetup,
    pub spells: Vec<EquippedSpell>,
}

/// Running damage totals for the combat summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatTally {
    /// HP the enemy lost.
    pub damage_dealt: u32,
    /// HP the character lost.
    pub damage_taken: u32,
}

/// Canonical state of one fight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatState {
    /// Base seed for every random draw; fixed at creation.
    pub seed: u64,
    pub turn: TurnState,
    pub character: Combatant,
    pub enemy: Combatant,
    pub character_spells: Spellbook,
    pub enemy_spells: Spellbook,
    pub character_queue: SpellQueue,
    pub enemy_queue: SpellQueue,
    /// SingleUse spells from the character's spellbook.
    pub deck: Deck,
    pub enemy_profile: EnemyProfile,
    pub tally: CombatTally,
    events: Vec<CombatEvent>,
}

impl CombatState {
    /// Materializes both combatants and their spells.
    ///
    /// The combat has not started; call
    /// [`CombatEngine::start_combat`](crate::engine::CombatEngine::start_combat).
    pub fn build(
        character: &CharacterSetup,
        enemy: Arc<EnemyDefinition>,
        seed: u64,
        spells: &dyn SpellOracle,
        balance: &dyn BalanceTable,
    ) -> Result<Self, ContentError> {
        enemy.validate()?;

        let character_spells = Spellbook::new(
            character
                .spells
                .iter()
                .map(|equipped| spells.instantiate(&equipped.label, equipped.level, balance))
                .collect::<Result<_, _>>()?,
        );
        let enemy_spells = Spellbook::new(
            enemy
                .spell_labels()
                .into_iter()
                .map(|label| spells.instantiate(label, enemy.level, balance))
                .collect::<Result<_, _>>()?,
        );

        let cards = character_spells
            .iter()
            .filter(|(_, spell)| spell.cast_type() == CastType::SingleUse)
            .map(|(id, _)| id)
            .collect();

        Ok(Self {
            seed,
            turn: TurnState::new(),
            character: Combatant::new(Side::Character, character.stats.clone()),
            enemy: Combatant::new(Side::Enemy, enemy.setup(balance)?),
            character_spells,
            enemy_spells,
            character_queue: SpellQueue::new(),
            enemy_queue: SpellQueue::new(),
            deck: Deck::new(cards),
            enemy_profile: EnemyProfile::new(enemy),
            tally: CombatTally::default(),
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> CombatPhase {
        self.turn.phase
    }

    pub fn turn_number(&self) -> u32 {
        self.turn.number
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.turn.outcome
    }

    pub fn is_over(&self) -> bool {
        self.turn.is_over()
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Character => &self.character,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Character => &mut self.character,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn spellbook(&self, side: Side) -> &Spellbook {
        match side {
            Side::Character => &self.character_spells,
            Side::Enemy => &self.enemy_spells,
        }
    }

    pub fn spellbook_mut(&mut self, side: Side) -> &mut Spellbook {
        match side {
            Side::Character => &mut self.character_spells,
            Side::Enemy => &mut self.enemy_spells,
        }
    }

    pub fn queue(&self, side: Side) -> &SpellQueue {
        match side {
            Side::Character => &self.character_queue,
            Side::Enemy => &self.enemy_queue,
        }
    }

    pub fn queue_mut(&mut self, side: Side) -> &mut SpellQueue {
        match side {
            Side::Character => &mut self.character_queue,
            Side::Enemy => &mut self.enemy_queue,
        }
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Drains buffered events.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}
