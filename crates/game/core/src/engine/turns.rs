//! Turn state machine.
//!
//! ```text
//! CombatStart → PlayerTurnStart → PlayerAction ─end_player_turn→ PlayerTurnEnd
//!      ↑                 ↑                                            │
//!  reset_combat          └── EnemyTurnEnd ← EnemyAction ← EnemyTurnStart
//! ```
//!
//! Every transition runs to completion inside one call. The engine only
//! pauses in `PlayerAction`, waiting for the caller to queue spells and end
//! the turn, and in `CombatEnd`.

use std::sync::Arc;

use crate::enemy::{BehaviorContext, EnemyActionDefinition, EnemyDefinition, select_action};
use crate::env::{AfflictionBehavior, next_seed};
use crate::spell::CallbackHook;
use crate::state::{CombatOutcome, CombatPhase, CombatTally, Side};

use super::{CombatEngine, CombatError, CombatEvent, EffectSource};

impl CombatEngine<'_> {
    /// Starts the combat and runs it up to the first `PlayerAction`.
    pub fn start_combat(&mut self) -> Result<(), CombatError> {
        self.require_phase(CombatPhase::CombatStart)?;
        self.guard(|engine| {
            engine.reset_runtime();
            engine.shuffle_deck();

            let definition = engine.enemy_definition();
            tracing::debug!(
                target: "combat",
                enemy = %definition.name,
                seed = engine.state.seed,
                "combat started"
            );
            engine.emit(CombatEvent::CombatStarted {
                enemy: definition.name.clone(),
            });
            engine.state.turn.number = 1;

            for key in &definition.on_combat_start {
                engine.state.enemy_profile.run_flag_ops(key)?;
                engine.perform_enemy_action(key)?;
                if engine.state.is_over() {
                    return Ok(());
                }
            }
            if !engine.resolve_effects(
                &definition.on_combat_start_effects,
                EffectSource::bare(Side::Enemy),
            )? {
                return Ok(());
            }

            engine.fire_hook(Side::Character, CallbackHook::OnCombatStart)?;
            if engine.state.is_over() {
                return Ok(());
            }
            engine.begin_player_turn()
        })
    }

    /// Ends the player's turn and runs the enemy's.
    ///
    /// Returns the outcome once the combat has ended, `None` while it goes
    /// on (the engine is back in `PlayerAction`).
    pub fn end_player_turn(&mut self) -> Result<Option<CombatOutcome>, CombatError> {
        self.require_phase(CombatPhase::PlayerAction)?;
        self.guard(|engine| {
            engine.run_round()?;
            Ok(engine.state.turn.outcome)
        })
    }

    /// Returns the combat to its pre-start state.
    ///
    /// Afflictions, queues, spell cooldowns, counters and alterations, ward,
    /// free casts and enemy decision state are cleared; mana is refilled and
    /// the deck is restored in its original order. HP and gold carry over.
    pub fn reset_combat(&mut self) -> Result<(), CombatError> {
        self.guard(|engine| {
            engine.reset_runtime();
            engine.state.turn.number = 0;
            engine.state.turn.outcome = None;
            engine.set_phase(CombatPhase::CombatStart);
            engine.emit(CombatEvent::CombatReset);
            engine.fire_hook(Side::Character, CallbackHook::OnCombatReset)?;
            engine.fire_hook(Side::Enemy, CallbackHook::OnCombatReset)
        })
    }

    /// The action the enemy will take this round, once chosen.
    pub fn enemy_intent(&self) -> Option<&EnemyActionDefinition> {
        let profile = &self.state.enemy_profile;
        profile
            .intent()
            .and_then(|key| profile.definition().action(key).ok())
    }

    fn enemy_definition(&self) -> Arc<EnemyDefinition> {
        Arc::clone(self.state.enemy_profile.definition_arc())
    }

    fn run_round(&mut self) -> Result<(), CombatError> {
        self.tick_cooldowns(Side::Character);
        self.resolve_queue(Side::Character)?;
        if self.state.is_over() {
            return Ok(());
        }

        self.set_phase(CombatPhase::PlayerTurnEnd);
        self.fire_hook(Side::Character, CallbackHook::OnPlayerTurnEnd)?;
        if self.state.is_over() {
            return Ok(());
        }
        self.end_of_turn_afflictions(Side::Character);
        if self.settle_deaths() {
            return Ok(());
        }
        self.emit(CombatEvent::TurnEnded {
            side: Side::Character,
            turn: self.state.turn.number,
        });

        self.set_phase(CombatPhase::EnemyTurnStart);
        self.emit(CombatEvent::TurnStarted {
            side: Side::Enemy,
            turn: self.state.turn.number,
        });
        self.reset_ward(Side::Enemy);
        self.regenerate(Side::Enemy);
        if self.settle_deaths() {
            return Ok(());
        }

        self.set_phase(CombatPhase::EnemyAction);
        let key = match self.state.enemy_profile.take_intent() {
            Some(key) => key,
            None => {
                let key = self.select_enemy_intent()?;
                self.state.enemy_profile.take_intent();
                key
            }
        };
        self.perform_enemy_action(&key)?;
        if self.state.is_over() {
            return Ok(());
        }

        self.set_phase(CombatPhase::EnemyTurnEnd);
        self.tick_cooldowns(Side::Enemy);
        self.end_of_turn_afflictions(Side::Enemy);
        if self.settle_deaths() {
            return Ok(());
        }
        self.emit(CombatEvent::TurnEnded {
            side: Side::Enemy,
            turn: self.state.turn.number,
        });

        self.state.turn.number += 1;
        self.begin_player_turn()
    }

    fn begin_player_turn(&mut self) -> Result<(), CombatError> {
        self.set_phase(CombatPhase::PlayerTurnStart);
        self.emit(CombatEvent::TurnStarted {
            side: Side::Character,
            turn: self.state.turn.number,
        });

        self.reset_ward(Side::Character);
        let character = &mut self.state.character;
        let before = character.mana();
        character.refill_mana();
        let refilled = character.mana() as i32 - before as i32;
        if refilled != 0 {
            self.emit(CombatEvent::ManaChanged {
                target: Side::Character,
                delta: refilled,
            });
        }
        self.regenerate(Side::Character);
        if self.settle_deaths() {
            return Ok(());
        }

        self.draw_cards(Side::Character, self.env.config().cards_per_turn);
        self.fire_hook(Side::Character, CallbackHook::OnPlayerTurnStart)?;
        if self.state.is_over() {
            return Ok(());
        }

        self.select_enemy_intent()?;
        self.set_phase(CombatPhase::PlayerAction);
        Ok(())
    }

    /// Picks the enemy's next action and runs its activation.
    fn select_enemy_intent(&mut self) -> Result<String, CombatError> {
        let rng = self.env.rng();
        let state = &mut *self.state;
        let definition = Arc::clone(state.enemy_profile.definition_arc());
        let combat_seed = state.seed;
        let turn = state.turn.number;
        let nonce = &mut state.turn.nonce;

        let exclude: Vec<&str> = match state.enemy_profile.last_action() {
            Some(last) if definition.avoid_repeat => vec![last],
            _ => Vec::new(),
        };
        let ctx = BehaviorContext {
            turn,
            enemy: &state.enemy,
            target: &state.character,
            flags: state.enemy_profile.flags(),
        };
        let key = select_action(
            &definition.name,
            &definition.behavior,
            &ctx,
            &exclude,
            |total, attempt| {
                rng.pick(next_seed(combat_seed, nonce, Side::Enemy, attempt), total)
            },
        )?;

        state.enemy_profile.activate(&key)?;
        tracing::debug!(target: "combat", turn, action = %key, "enemy intent selected");
        self.emit(CombatEvent::IntentSelected {
            action: key.clone(),
        });
        Ok(key)
    }

    /// Clears `side`'s ward at its turn start when configured to, unless it
    /// holds a ward-retaining affliction.
    fn reset_ward(&mut self, side: Side) {
        if !self.env.config().reset_ward_each_turn {
            return;
        }
        if self
            .affliction_with(side, |b| matches!(b, AfflictionBehavior::WardRetain))
            .is_some()
        {
            return;
        }
        self.state.combatant_mut(side).clear_ward();
    }

    fn shuffle_deck(&mut self) {
        let rng = self.env.rng();
        let state = &mut *self.state;
        let combat_seed = state.seed;
        let nonce = &mut state.turn.nonce;
        state.deck.shuffle_draw_pile(|upper| {
            rng.range(next_seed(combat_seed, nonce, Side::Character, 1), 0, upper)
        });
    }

    /// Clears per-combat runtime state on both sides.
    fn reset_runtime(&mut self) {
        let state = &mut *self.state;
        for side in [Side::Character, Side::Enemy] {
            let combatant = state.combatant_mut(side);
            combatant.afflictions_mut().clear();
            combatant.clear_free_casts();
            combatant.clear_ward();
            combatant.refill_mana();
            state.queue_mut(side).clear();
            for spell in state.spellbook_mut(side).iter_mut() {
                spell.clear_runtime();
            }
        }
        state.enemy_profile.reset();
        state.deck.reset();
        state.tally = CombatTally::default();
    }
}
