//! Spell effect variants.
//!
//! Effects are declarative: a spell's behavior is its list of effects bound
//! to callback hooks, interpreted by the effect resolver. Magnitudes are
//! [`Amount`] formulas evaluated at resolution time.

use crate::spell::{AlterationWindow, Amount, StatKey};
use crate::state::{AfflictionType, Side, SignSet};

/// Who an effect lands on, relative to the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    /// The caster itself.
    Caster,
    /// The caster's opponent.
    Other,
    /// Both combatants, resolved independently (caster first).
    Both,
}

impl Target {
    /// Concrete sides this target resolves to for a caster.
    pub fn sides(self, caster: Side) -> &'static [Side] {
        const CHARACTER_ONLY: [Side; 1] = [Side::Character];
        const ENEMY_ONLY: [Side; 1] = [Side::Enemy];
        const CHARACTER_FIRST: [Side; 2] = [Side::Character, Side::Enemy];
        const ENEMY_FIRST: [Side; 2] = [Side::Enemy, Side::Character];

        match (self, caster) {
            (Target::Caster, Side::Character) | (Target::Other, Side::Enemy) => &CHARACTER_ONLY,
            (Target::Caster, Side::Enemy) | (Target::Other, Side::Character) => &ENEMY_ONLY,
            (Target::Both, Side::Character) => &CHARACTER_FIRST,
            (Target::Both, Side::Enemy) => &ENEMY_FIRST,
        }
    }
}

/// Damage flavor, carried through to presentation events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    #[default]
    Default,
    Fire,
    Ice,
    Electric,
    Poison,
    Evil,
    Heal,
}

/// One declarative effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpellEffect {
    /// One attack, routed through ward.
    SingleAttack {
        amount: Amount,
        damage_type: DamageType,
        target: Target,
    },

    /// `hits` attacks of `amount` each.
    MultiAttack {
        amount: Amount,
        hits: Amount,
        damage_type: DamageType,
        target: Target,
    },

    /// Gains ward.
    Ward { amount: Amount, target: Target },

    /// Signed HP change that bypasses ward (heal or self-damage).
    AlterHp {
        amount: Amount,
        damage_type: DamageType,
        target: Target,
    },

    /// Adds (or with a negative amount removes) affliction stacks.
    ApplyAffliction {
        affliction: AfflictionType,
        stacks: Amount,
        target: Target,
    },

    /// Removes every affliction whose sign is in `signs`.
    CleanseAfflictions { signs: SignSet, target: Target },

    /// Draws cards from the caster's deck.
    Draw { count: Amount },

    /// Discards cards from the front of the caster's hand.
    Exhaust { count: Amount },

    /// Alters stats of spells the caster has queued but not yet cast.
    AlterQueuedSpellStat {
        amount: Amount,
        window: AlterationWindow,
        stats: Vec<StatKey>,
    },

    /// Signed mana change.
    AlterMana { amount: Amount, target: Target },

    /// Grants casts that ignore cooldown and mana.
    GrantFreeCasts { count: Amount },

    /// Signed gold change for the caster.
    AlterGold { amount: Amount },

    /// Adds to a counter owned by the spell being resolved.
    AlterCounter { counter: String, amount: Amount },

    /// Sets a counter owned by the spell being resolved back to zero.
    ResetCounter { counter: String },
}

impl SpellEffect {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SpellEffect::SingleAttack { .. } => "single_attack",
            SpellEffect::MultiAttack { .. } => "multi_attack",
            SpellEffect::Ward { .. } => "ward",
            SpellEffect::AlterHp { .. } => "alter_hp",
            SpellEffect::ApplyAffliction { .. } => "apply_affliction",
            SpellEffect::CleanseAfflictions { .. } => "cleanse_afflictions",
            SpellEffect::Draw { .. } => "draw",
            SpellEffect::Exhaust { .. } => "exhaust",
            SpellEffect::AlterQueuedSpellStat { .. } => "alter_queued_spell_stat",
            SpellEffect::AlterMana { .. } => "alter_mana",
            SpellEffect::GrantFreeCasts { .. } => "grant_free_casts",
            SpellEffect::AlterGold { .. } => "alter_gold",
            SpellEffect::AlterCounter { .. } => "alter_counter",
            SpellEffect::ResetCounter { .. } => "reset_counter",
        }
    }

    pub fn attack(amount: Amount, target: Target) -> Self {
        SpellEffect::SingleAttack {
            amount,
            damage_type: DamageType::Default,
            target,
        }
    }

    pub fn ward(amount: Amount, target: Target) -> Self {
        SpellEffect::Ward { amount, target }
    }

    pub fn afflict(affliction: AfflictionType, stacks: Amount, target: Target) -> Self {
        SpellEffect::ApplyAffliction {
            affliction,
            stacks,
            target,
        }
    }
}
