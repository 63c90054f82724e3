//! Presentation notifications.
//!
//! The engine records a [`CombatEvent`] for everything a presentation layer
//! may want to animate. Events are fire-and-forget: observers are called
//! synchronously and cannot influence resolution.

use crate::spell::DamageType;
use crate::state::{AfflictionType, CombatOutcome, Side};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    CombatStarted {
        enemy: String,
    },
    CombatReset,
    TurnStarted {
        side: Side,
        turn: u32,
    },
    TurnEnded {
        side: Side,
        turn: u32,
    },
    SpellQueued {
        side: Side,
        spell: String,
        free_cast: bool,
    },
    SpellCast {
        side: Side,
        spell: String,
        /// How many times the OnCast effects resolved.
        repeats: u32,
    },
    CastCancelled {
        side: Side,
        spell: String,
        affliction: AfflictionType,
    },
    Damage {
        target: Side,
        /// HP actually lost.
        amount: u32,
        /// Damage soaked by ward.
        absorbed: u32,
        damage_type: DamageType,
    },
    Healed {
        target: Side,
        amount: u32,
    },
    WardGained {
        target: Side,
        amount: u32,
    },
    ManaChanged {
        target: Side,
        delta: i32,
    },
    AfflictionApplied {
        target: Side,
        affliction: AfflictionType,
        stacks: u32,
    },
    AfflictionRemoved {
        target: Side,
        affliction: AfflictionType,
    },
    CardsDrawn {
        count: u32,
    },
    IntentSelected {
        action: String,
    },
    CombatantDied {
        side: Side,
    },
    CombatEnded {
        outcome: CombatOutcome,
    },
}

/// Observer of combat events.
///
/// Implement [`Self::on_event`] to see everything, or override the narrower
/// callbacks it dispatches to.
pub trait CombatObserver {
    fn on_event(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::SpellCast { side, spell, .. } => self.on_cast(*side, spell),
            CombatEvent::AfflictionApplied {
                target,
                affliction,
                stacks,
            } => self.on_affliction_applied(*affliction, *stacks, *target),
            CombatEvent::Damage { target, amount, .. } => self.on_damage(*amount, *target),
            CombatEvent::CombatantDied { side } => self.on_death(*side),
            CombatEvent::TurnStarted { side, .. } => self.on_turn_start(*side),
            CombatEvent::TurnEnded { side, .. } => self.on_turn_end(*side),
            _ => {}
        }
    }

    fn on_cast(&mut self, _side: Side, _spell: &str) {}

    fn on_affliction_applied(&mut self, _affliction: AfflictionType, _stacks: u32, _target: Side) {}

    fn on_damage(&mut self, _amount: u32, _target: Side) {}

    fn on_death(&mut self, _side: Side) {}

    fn on_turn_start(&mut self, _side: Side) {}

    fn on_turn_end(&mut self, _side: Side) {}
}

/// Observer that keeps every event it sees.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<CombatEvent>,
}

impl CombatObserver for EventLog {
    fn on_event(&mut self, event: &CombatEvent) {
        self.events.push(event.clone());
    }
}
