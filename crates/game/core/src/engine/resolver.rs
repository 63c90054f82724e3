//! Spell effect interpreter.
//!
//! Each effect is resolved against current state: targets are derived from
//! the caster, amounts are evaluated per target at resolution time, and the
//! result is applied through the combatant resource counters or affliction
//! stacks. Death is settled after every effect.

use crate::env::{AfflictionBehavior, next_seed};
use crate::spell::{Amount, AmountContext, DamageType, SpellEffect, SpellId};
use crate::state::{AfflictionType, Side};

use super::damage::find_behavior;
use super::{CombatEngine, CombatError, CombatEvent};

/// Who an effect is resolved for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectSource {
    pub side: Side,
    /// The spell whose stats and counters the effect reads, if any.
    pub spell: Option<SpellId>,
}

impl EffectSource {
    pub fn spell(side: Side, spell: SpellId) -> Self {
        Self {
            side,
            spell: Some(spell),
        }
    }

    /// Effects that belong to no spell (e.g. enemy combat-start effects).
    pub fn bare(side: Side) -> Self {
        Self { side, spell: None }
    }
}

impl CombatEngine<'_> {
    /// Resolves a single effect for `caster` outside of any spell.
    pub fn resolve_effect(
        &mut self,
        effect: &SpellEffect,
        caster: Side,
    ) -> Result<(), CombatError> {
        self.guard(|engine| {
            engine.resolve_one(effect, EffectSource::bare(caster))?;
            engine.settle_deaths();
            Ok(())
        })
    }

    /// Resolves effects in order. Returns false once combat has ended.
    pub(crate) fn resolve_effects(
        &mut self,
        effects: &[SpellEffect],
        source: EffectSource,
    ) -> Result<bool, CombatError> {
        for effect in effects {
            self.resolve_one(effect, source)?;
            if self.settle_deaths() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn evaluate(
        &self,
        amount: &Amount,
        source: EffectSource,
        target: Side,
    ) -> Result<i32, CombatError> {
        let spell = source
            .spell
            .and_then(|id| self.state.spellbook(source.side).get(id));
        let ctx = AmountContext::new(
            self.state.combatant(source.side),
            self.state.combatant(target),
            spell,
        );
        Ok(amount.evaluate(&ctx)?)
    }

    fn any_dead(&self) -> bool {
        self.state.character.is_dead() || self.state.enemy.is_dead()
    }

    fn resolve_one(
        &mut self,
        effect: &SpellEffect,
        source: EffectSource,
    ) -> Result<(), CombatError> {
        tracing::trace!(
            target: "combat",
            side = %source.side,
            effect = effect.name(),
            "resolve effect"
        );
        let caster = source.side;

        match effect {
            SpellEffect::SingleAttack {
                amount,
                damage_type,
                target,
            } => {
                for &side in target.sides(caster) {
                    if self.any_dead() {
                        break;
                    }
                    let base = self.evaluate(amount, source, side)?;
                    self.attack(caster, side, base, *damage_type);
                }
            }

            SpellEffect::MultiAttack {
                amount,
                hits,
                damage_type,
                target,
            } => {
                for &side in target.sides(caster) {
                    let hit_count = self.evaluate(hits, source, side)?.max(0);
                    for _ in 0..hit_count {
                        if self.any_dead() {
                            break;
                        }
                        let base = self.evaluate(amount, source, side)?;
                        self.attack(caster, side, base, *damage_type);
                    }
                }
            }

            SpellEffect::Ward { amount, target } => {
                for &side in target.sides(caster) {
                    let value = self.evaluate(amount, source, side)?;
                    let gained = self.state.combatant_mut(side).alter_ward(value);
                    if gained > 0 {
                        self.emit(CombatEvent::WardGained {
                            target: side,
                            amount: gained as u32,
                        });
                    }
                }
            }

            SpellEffect::AlterHp {
                amount,
                damage_type,
                target,
            } => {
                for &side in target.sides(caster) {
                    if self.any_dead() {
                        break;
                    }
                    let delta = self.evaluate(amount, source, side)?;
                    self.alter_hp(side, delta, *damage_type);
                }
            }

            SpellEffect::ApplyAffliction {
                affliction,
                stacks,
                target,
            } => {
                for &side in target.sides(caster) {
                    let delta = self.evaluate(stacks, source, side)?;
                    self.apply_affliction(side, *affliction, delta)?;
                }
            }

            SpellEffect::CleanseAfflictions { signs, target } => {
                for &side in target.sides(caster) {
                    let removed = self
                        .state
                        .combatant_mut(side)
                        .afflictions_mut()
                        .cleanse(*signs);
                    for affliction in removed {
                        self.emit(CombatEvent::AfflictionRemoved {
                            target: side,
                            affliction: affliction.kind,
                        });
                    }
                }
            }

            SpellEffect::Draw { count } => {
                let count = self.evaluate(count, source, caster)?.max(0) as u32;
                self.draw_cards(caster, count);
            }

            SpellEffect::Exhaust { count } => {
                let count = self.evaluate(count, source, caster)?.max(0) as u32;
                if caster == Side::Character {
                    // Queued cards and the card being resolved stay in hand
                    // until they are cast and exhausted.
                    let mut held = self.state.character_queue.spell_ids();
                    held.extend(source.spell);
                    self.state.deck.discard_from_hand(count, &held);
                }
            }

            SpellEffect::AlterQueuedSpellStat {
                amount,
                window,
                stats,
            } => {
                let delta = self.evaluate(amount, source, caster)?;
                let queued = self.state.queue(caster).spell_ids();
                let book = self.state.spellbook_mut(caster);
                for id in queued {
                    if let Some(spell) = book.get_mut(id) {
                        for key in stats {
                            spell.stats_mut().alter(*key, delta, *window);
                        }
                    }
                }
            }

            SpellEffect::AlterMana { amount, target } => {
                for &side in target.sides(caster) {
                    let value = self.evaluate(amount, source, side)?;
                    let delta = self.state.combatant_mut(side).alter_mana(value);
                    if delta != 0 {
                        self.emit(CombatEvent::ManaChanged {
                            target: side,
                            delta,
                        });
                    }
                }
            }

            SpellEffect::GrantFreeCasts { count } => {
                let count = self.evaluate(count, source, caster)?.max(0) as u32;
                self.state.combatant_mut(caster).grant_free_casts(count);
            }

            SpellEffect::AlterGold { amount } => {
                let value = self.evaluate(amount, source, caster)?;
                self.state.combatant_mut(caster).alter_gold(value);
            }

            SpellEffect::AlterCounter { counter, amount } => {
                let value = self.evaluate(amount, source, caster)?;
                if let Some(id) = source.spell {
                    if let Some(spell) = self.state.spellbook_mut(caster).get_mut(id) {
                        spell.alter_counter(counter, value);
                    }
                }
            }

            SpellEffect::ResetCounter { counter } => {
                if let Some(id) = source.spell {
                    if let Some(spell) = self.state.spellbook_mut(caster).get_mut(id) {
                        spell.reset_counter(counter);
                    }
                }
            }
        }
        Ok(())
    }

    /// Signed HP change that bypasses ward.
    pub(crate) fn alter_hp(&mut self, side: Side, delta: i32, damage_type: DamageType) {
        let change = self.state.combatant_mut(side).alter_hp(delta);
        if change.lost() > 0 {
            self.record_hp_loss(side, change.lost(), 0, damage_type);
        } else if change.gained() > 0 {
            self.emit(CombatEvent::Healed {
                target: side,
                amount: change.gained(),
            });
        }
        if change.died {
            self.emit(CombatEvent::CombatantDied { side });
        }
    }

    /// Adds stacks using the catalog's sign and decay for `kind`.
    pub(crate) fn apply_affliction(
        &mut self,
        side: Side,
        kind: AfflictionType,
        delta: i32,
    ) -> Result<(), CombatError> {
        let definition = *self.env.afflictions().get(kind)?;
        let change = self.state.combatant_mut(side).afflictions_mut().apply(
            kind,
            delta,
            definition.sign,
            definition.decay,
        );
        if change.after > change.before {
            self.emit(CombatEvent::AfflictionApplied {
                target: side,
                affliction: kind,
                stacks: change.after - change.before,
            });
        } else if change.removed() {
            self.emit(CombatEvent::AfflictionRemoved {
                target: side,
                affliction: kind,
            });
        }
        Ok(())
    }

    /// Consumes one stack of an activation-triggered affliction.
    pub(crate) fn consume_stack(&mut self, side: Side, kind: AfflictionType) {
        let change = self.state.combatant_mut(side).afflictions_mut().consume_stack(kind);
        if change.is_some_and(|c| c.removed()) {
            self.emit(CombatEvent::AfflictionRemoved {
                target: side,
                affliction: kind,
            });
        }
    }

    /// Draws into `side`'s hand. Only the character owns a deck.
    pub(crate) fn draw_cards(&mut self, side: Side, count: u32) {
        if side != Side::Character || count == 0 {
            return;
        }
        let rng = self.env.rng();
        let state = &mut *self.state;
        let seed = state.seed;
        let nonce = &mut state.turn.nonce;
        let drawn = state.deck.draw(count, |upper| {
            rng.range(next_seed(seed, nonce, Side::Character, 0), 0, upper)
        });
        if drawn > 0 {
            self.emit(CombatEvent::CardsDrawn { count: drawn });
        }
    }

    /// Start-of-turn healing from regeneration afflictions.
    pub(crate) fn regenerate(&mut self, side: Side) {
        let heal: u32 = self
            .state
            .combatant(side)
            .afflictions()
            .iter()
            .filter(|a| {
                matches!(
                    self.env.afflictions().behavior(a.kind),
                    AfflictionBehavior::Regeneration
                )
            })
            .fold(0u32, |total, a| total.saturating_add(a.stacks));
        if heal > 0 {
            self.alter_hp(side, heal.min(i32::MAX as u32) as i32, DamageType::Heal);
        }
    }

    /// End-of-turn damage over time, then duration decay.
    pub(crate) fn end_of_turn_afflictions(&mut self, side: Side) {
        let catalog = self.env.afflictions();
        let ticks: Vec<(u32, bool)> = self
            .state
            .combatant(side)
            .afflictions()
            .iter()
            .filter_map(|a| match catalog.behavior(a.kind) {
                AfflictionBehavior::DamageOverTime { bypass_ward } => Some((a.stacks, bypass_ward)),
                _ => None,
            })
            .collect();

        for (stacks, bypass_ward) in ticks {
            if self.state.combatant(side).is_dead() {
                break;
            }
            if bypass_ward {
                self.alter_hp(side, -(stacks.min(i32::MAX as u32) as i32), DamageType::Poison);
            } else {
                self.deal_attack_damage(side, stacks, DamageType::Fire);
            }
        }

        let changes = self.state.combatant_mut(side).afflictions_mut().tick_duration();
        for change in changes.into_iter().filter(|c| c.removed()) {
            self.emit(CombatEvent::AfflictionRemoved {
                target: side,
                affliction: change.kind,
            });
        }
    }

    /// Whether `side` carries an affliction whose behavior matches.
    pub(crate) fn affliction_with(
        &self,
        side: Side,
        wanted: impl Fn(AfflictionBehavior) -> bool,
    ) -> Option<AfflictionType> {
        find_behavior(self.state.combatant(side), self.env.afflictions(), wanted)
    }
}
