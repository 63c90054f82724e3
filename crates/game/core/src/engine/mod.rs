//! Combat turn engine.
//!
//! [`CombatEngine`] is the only writer of [`CombatState`]. It exposes a
//! pull-based API: the orchestrating layer calls [`CombatEngine::start_combat`],
//! then alternates [`CombatEngine::queue_spell`] and
//! [`CombatEngine::end_player_turn`] until the combat ends. Nothing blocks;
//! each call runs the state machine forward as far as it can and returns.

mod cast;
mod damage;
mod errors;
mod events;
mod outcome;
mod resolver;
mod turns;

pub use damage::modified_damage;
pub use errors::CombatError;
pub use events::{CombatEvent, CombatObserver, EventLog};
pub use outcome::CombatSummary;
pub use resolver::EffectSource;

use crate::env::CombatEnv;
use crate::error::GameError;
use crate::state::{CombatOutcome, CombatPhase, CombatState, Side};

/// Drives one combat over borrowed state.
pub struct CombatEngine<'a> {
    state: &'a mut CombatState,
    env: CombatEnv<'a>,
    observers: Vec<&'a mut dyn CombatObserver>,
}

impl<'a> CombatEngine<'a> {
    pub fn new(state: &'a mut CombatState, env: CombatEnv<'a>) -> Self {
        Self {
            state,
            env,
            observers: Vec::new(),
        }
    }

    /// Registers an observer notified of every event as it happens.
    #[must_use]
    pub fn with_observer(mut self, observer: &'a mut dyn CombatObserver) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn state(&self) -> &CombatState {
        &*self.state
    }

    pub fn env(&self) -> CombatEnv<'a> {
        self.env
    }

    pub fn phase(&self) -> CombatPhase {
        self.state.turn.phase
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.state.turn.outcome
    }

    /// Drains events buffered since the last call.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        self.state.take_events()
    }

    /// Summary of a finished combat; `None` while it is still running.
    pub fn summary(&self) -> Option<CombatSummary> {
        self.state
            .is_over()
            .then(|| CombatSummary::from_state(self.state()))
    }

    pub(crate) fn emit(&mut self, event: CombatEvent) {
        for observer in self.observers.iter_mut() {
            observer.on_event(&event);
        }
        self.state.push_event(event);
    }

    fn require_phase(&self, expected: CombatPhase) -> Result<(), CombatError> {
        let actual = self.state.turn.phase;
        if actual == CombatPhase::CombatEnd {
            return Err(CombatError::CombatOver);
        }
        if actual != expected {
            return Err(CombatError::InvalidPhase { expected, actual });
        }
        Ok(())
    }

    pub(crate) fn set_phase(&mut self, phase: CombatPhase) {
        tracing::debug!(
            target: "combat",
            turn = self.state.turn.number,
            from = %self.state.turn.phase,
            to = %phase,
            "phase transition"
        );
        self.state.turn.phase = phase;
    }

    /// Runs `step`, aborting combat if it fails with a fatal error.
    fn guard<T>(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<T, CombatError>,
    ) -> Result<T, CombatError> {
        let result = step(self);
        if let Err(err) = &result {
            if err.severity().is_fatal() {
                tracing::error!(
                    target: "combat",
                    code = err.error_code(),
                    error = %err,
                    "combat aborted"
                );
                self.state.turn.phase = CombatPhase::CombatEnd;
                self.state.turn.outcome = None;
            }
        }
        result
    }

    /// Ends combat if either side is dead. Returns true when combat is over.
    pub(crate) fn settle_deaths(&mut self) -> bool {
        if self.state.is_over() {
            return true;
        }
        let outcome = if self.state.character.is_dead() {
            CombatOutcome::Defeat
        } else if self.state.enemy.is_dead() {
            CombatOutcome::Victory
        } else {
            return false;
        };
        self.end_combat(outcome);
        true
    }

    fn end_combat(&mut self, outcome: CombatOutcome) {
        tracing::debug!(
            target: "combat",
            ?outcome,
            turn = self.state.turn.number,
            "combat ended"
        );
        self.state.turn.phase = CombatPhase::CombatEnd;
        self.state.turn.outcome = Some(outcome);

        for side in [Side::Character, Side::Enemy] {
            for spell in self.state.spellbook_mut(side).iter_mut() {
                spell.stats_mut().revert_all();
            }
            self.state.queue_mut(side).clear();
        }
        self.emit(CombatEvent::CombatEnded { outcome });
    }
}
