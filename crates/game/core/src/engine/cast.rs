//! Spell queueing and casting.
//!
//! Queueing validates and pays for a spell, then runs its `OnQueue` hook.
//! Casting happens when the owner's queue resolves at turn end: spells are
//! cast in the order they were queued, each running its `OnCast` hook.

use crate::env::AfflictionBehavior;
use crate::error::ContentError;
use crate::spell::{
    AlterationWindow, CallbackHook, CastCheck, CastError, CastFailure, CastPlan, CastType,
    SpellId,
};
use crate::state::{CombatPhase, QueuedSpell, Side};

use super::{CombatEngine, CombatError, CombatEvent, EffectSource};

impl CombatEngine<'_> {
    /// Queues the character's spell named `label`.
    ///
    /// A rejected spell leaves state unchanged and returns
    /// [`CombatError::Cast`].
    pub fn queue_spell(&mut self, label: &str) -> Result<(), CombatError> {
        let id = self
            .state
            .character_spells
            .find(label)
            .ok_or_else(|| CastError::NotEquipped(label.to_string()))?;
        self.queue_spell_id(id)
    }

    /// Queues the character's spell with the given id.
    pub fn queue_spell_id(&mut self, id: SpellId) -> Result<(), CombatError> {
        self.require_phase(CombatPhase::PlayerAction)?;
        let plan = match self.check_cast(id) {
            Ok(plan) => plan,
            Err(err) => {
                tracing::warn!(target: "combat", error = %err, "cast rejected");
                return Err(err);
            }
        };
        self.guard(|engine| engine.enqueue(Side::Character, id, plan))
    }

    /// Reports whether the character could queue `label` right now, and how
    /// it would be paid for.
    pub fn can_cast(&self, label: &str) -> Result<CastPlan, CombatError> {
        self.require_phase(CombatPhase::PlayerAction)?;
        let id = self
            .state
            .character_spells
            .find(label)
            .ok_or_else(|| CastError::NotEquipped(label.to_string()))?;
        self.check_cast(id)
    }

    fn check_cast(&self, id: SpellId) -> Result<CastPlan, CombatError> {
        let state = &*self.state;
        let spell = state
            .character_spells
            .get(id)
            .ok_or_else(|| CastError::NotEquipped(id.to_string()))?;
        let queue = &state.character_queue;
        let check = CastCheck {
            spell,
            caster: &state.character,
            target: &state.enemy,
            deck: Some(&state.deck),
            in_hand: state.deck.in_hand(id),
            queued: queue.contains(id),
            queue_full: queue.is_full(),
        };
        Ok(check.evaluate()?)
    }

    /// Pays for `id`, runs its `OnQueue` hook and appends it to the queue.
    ///
    /// A full queue is rejected before anything is paid or resolved. For the
    /// enemy that is a content error, since its actions skip cast checks.
    pub(crate) fn enqueue(
        &mut self,
        side: Side,
        id: SpellId,
        plan: CastPlan,
    ) -> Result<(), CombatError> {
        let Some(spell) = self.state.spellbook(side).get(id) else {
            return Ok(());
        };
        let label = spell.label().to_string();
        let prep_time = spell.prep_time();
        let on_queue = spell.effects(CallbackHook::OnQueue);
        if self.state.queue(side).is_full() {
            return Err(queue_full(side, label));
        }

        let caster = self.state.combatant_mut(side);
        if plan.free_cast {
            caster.consume_free_cast();
        } else if plan.mana_cost > 0 {
            caster.spend_mana(plan.mana_cost);
            self.emit(CombatEvent::ManaChanged {
                target: side,
                delta: -(plan.mana_cost as i32),
            });
        }

        tracing::debug!(target: "combat", %side, spell = %label, prep_time, "spell queued");
        if !self.resolve_effects(&on_queue, EffectSource::spell(side, id))? {
            return Ok(());
        }

        let entry = QueuedSpell {
            spell: id,
            free_cast: plan.free_cast,
            prep_elapsed: 0,
        };
        if self.state.queue_mut(side).push(entry).is_err() {
            return Err(queue_full(side, label));
        }
        self.emit(CombatEvent::SpellQueued {
            side,
            spell: label,
            free_cast: plan.free_cast,
        });
        Ok(())
    }

    /// Casts every ready spell in `side`'s queue, oldest first. Spells still
    /// preparing count one pass toward their current prep time and stay
    /// queued.
    pub(crate) fn resolve_queue(&mut self, side: Side) -> Result<(), CombatError> {
        let mut index = 0;
        while let Some(entry) = self.state.queue(side).get(index).copied() {
            let prep_time = self
                .state
                .spellbook(side)
                .get(entry.spell)
                .map_or(0, |spell| spell.prep_time());
            if entry.prep_elapsed < prep_time {
                self.state.queue_mut(side).tick_prep(index);
                index += 1;
                continue;
            }
            self.state.queue_mut(side).remove(index);
            self.cast(side, entry)?;
            if self.state.is_over() {
                break;
            }
        }
        Ok(())
    }

    fn cast(&mut self, side: Side, entry: QueuedSpell) -> Result<(), CombatError> {
        let id = entry.spell;

        let Some(spell) = self.state.spellbook(side).get(id) else {
            return Ok(());
        };
        let label = spell.label().to_string();
        let effects = spell.effects(CallbackHook::OnCast);

        if let Some(kind) =
            self.affliction_with(side, |b| matches!(b, AfflictionBehavior::CancelAction))
        {
            self.consume_stack(side, kind);
            tracing::debug!(
                target: "combat",
                %side,
                spell = %label,
                affliction = %kind,
                "cast cancelled"
            );
            self.emit(CombatEvent::CastCancelled {
                side,
                spell: label,
                affliction: kind,
            });
            self.revert_cast_window(side, id);
            return Ok(());
        }

        let mut repeats = 1;
        if let Some(kind) =
            self.affliction_with(side, |b| matches!(b, AfflictionBehavior::RepeatCast))
        {
            self.consume_stack(side, kind);
            repeats += self.env.config().echo_repeats;
        }

        tracing::debug!(target: "combat", %side, spell = %label, repeats, "cast spell");
        self.emit(CombatEvent::SpellCast {
            side,
            spell: label,
            repeats,
        });

        for _ in 0..repeats {
            if !self.resolve_effects(&effects, EffectSource::spell(side, id))? {
                return Ok(());
            }
        }
        self.revert_cast_window(side, id);

        let deck_card = side == Side::Character && self.state.deck.is_card(id);
        let Some(spell) = self.state.spellbook_mut(side).get_mut(id) else {
            return Ok(());
        };
        match spell.cast_type() {
            CastType::Reusable if !entry.free_cast => spell.cooldown_mut().start(),
            CastType::SingleUse if deck_card => {
                if !self.state.deck.exhaust(id) {
                    tracing::error!(
                        target: "combat",
                        spell = %id,
                        "cast card was not in hand, nothing exhausted"
                    );
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn revert_cast_window(&mut self, side: Side, id: SpellId) {
        if let Some(spell) = self.state.spellbook_mut(side).get_mut(id) {
            spell.stats_mut().revert_window(AlterationWindow::UntilCast);
        }
    }

    /// Queues and resolves the spells of the enemy action `key`.
    ///
    /// Enemy spells skip cast validation; they still honour cancel and
    /// repeat afflictions and go on cooldown like the character's.
    pub(crate) fn perform_enemy_action(&mut self, key: &str) -> Result<(), CombatError> {
        let labels = self
            .state
            .enemy_profile
            .definition()
            .action(key)?
            .spells
            .clone();
        tracing::debug!(target: "combat", action = key, spells = labels.len(), "enemy acts");

        for label in &labels {
            let id = self
                .state
                .enemy_spells
                .find(label)
                .ok_or_else(|| ContentError::UnknownSpell(label.clone()))?;
            let plan = CastPlan {
                free_cast: false,
                mana_cost: 0,
            };
            self.enqueue(Side::Enemy, id, plan)?;
            if self.state.is_over() {
                return Ok(());
            }
        }
        self.resolve_queue(Side::Enemy)
    }

    /// Fires `hook` on every spell in `side`'s spellbook, in spellbook order.
    pub(crate) fn fire_hook(&mut self, side: Side, hook: CallbackHook) -> Result<(), CombatError> {
        let bound: Vec<_> = self
            .state
            .spellbook(side)
            .iter()
            .filter(|(_, spell)| spell.hooks().is_bound(hook))
            .map(|(id, spell)| (id, spell.effects(hook)))
            .collect();
        for (id, effects) in bound {
            tracing::trace!(target: "combat", %side, spell = %id, %hook, "hook fired");
            if !self.resolve_effects(&effects, EffectSource::spell(side, id))? {
                break;
            }
        }
        Ok(())
    }

    /// Moves a spell's cooldown `delta` turns toward ready (negative delays it).
    pub fn tick_cooldown(&mut self, side: Side, id: SpellId, delta: i32) {
        if let Some(spell) = self.state.spellbook_mut(side).get_mut(id) {
            spell.cooldown_mut().tick(delta);
        }
    }

    /// One turn of cooldown recovery for every spell `side` owns.
    pub(crate) fn tick_cooldowns(&mut self, side: Side) {
        for spell in self.state.spellbook_mut(side).iter_mut() {
            spell.cooldown_mut().tick(1);
        }
    }
}

fn queue_full(side: Side, spell: String) -> CombatError {
    match side {
        Side::Character => CastError::CannotCast {
            spell,
            failures: vec![CastFailure::QueueFull],
        }
        .into(),
        Side::Enemy => ContentError::EnemyQueueOverflow { spell }.into(),
    }
}
