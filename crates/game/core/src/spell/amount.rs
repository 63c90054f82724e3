//! Amount formulas for spell effects.
//!
//! Effect magnitudes are functions of live combat state, evaluated at
//! resolution time (never at queue time), so that effects reading mutable
//! values such as gold or per-spell counters see current numbers.
//!
//! ## Examples
//!
//! ```ignore
//! // Damage from the spell's stat table
//! Amount::Stat(StatKey::OtherDamageAmount)
//!
//! // Self-damage that grows with every cast
//! Amount::Negate(Box::new(Amount::Sum(vec![
//!     Amount::Stat(StatKey::SelfDamageAmount),
//!     Amount::Counter("frustration".into()),
//! ])))
//!
//! // 10% of current gold
//! Amount::CasterGold { percent: 10 }
//! ```

use crate::error::ContentError;
use crate::spell::{Spell, StatKey};
use crate::state::{AfflictionType, Combatant};

/// Which combatant an amount formula reads from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Subject {
    Caster,
    Target,
}

/// Formula for a signed effect magnitude.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Amount {
    /// Fixed value.
    Constant(i32),

    /// Current value from the casting spell's stat table (alterations included).
    Stat(StatKey),

    /// Current value of a per-spell counter (0 when never touched).
    Counter(String),

    /// Percentage of the caster's gold.
    CasterGold { percent: i32 },

    /// Stacks of an affliction on the subject.
    AfflictionStacks {
        of: Subject,
        affliction: AfflictionType,
    },

    /// Percentage of the subject's missing HP.
    MissingHp { of: Subject, percent: i32 },

    /// The subject's current ward.
    Ward { of: Subject },

    /// Sum of sub-formulas.
    Sum(Vec<Amount>),

    /// Percentage of a sub-formula.
    Scaled { amount: Box<Amount>, percent: i32 },

    /// Negation of a sub-formula (turns a heal into self-damage).
    Negate(Box<Amount>),
}

/// Read-only view of the state an amount formula may inspect.
#[derive(Clone, Copy, Debug)]
pub struct AmountContext<'a> {
    pub caster: &'a Combatant,
    pub target: &'a Combatant,
    pub spell: Option<&'a Spell>,
}

impl<'a> AmountContext<'a> {
    pub fn new(caster: &'a Combatant, target: &'a Combatant, spell: Option<&'a Spell>) -> Self {
        Self {
            caster,
            target,
            spell,
        }
    }

    fn subject(&self, subject: Subject) -> &'a Combatant {
        match subject {
            Subject::Caster => self.caster,
            Subject::Target => self.target,
        }
    }
}

impl Amount {
    pub fn constant(value: i32) -> Self {
        Self::Constant(value)
    }

    pub fn stat(key: StatKey) -> Self {
        Self::Stat(key)
    }

    pub fn negate(amount: Amount) -> Self {
        Self::Negate(Box::new(amount))
    }

    /// Evaluates the formula against current state.
    ///
    /// Reading a stat the spell lacks (or any stat outside a spell) is a
    /// content error.
    pub fn evaluate(&self, ctx: &AmountContext<'_>) -> Result<i32, ContentError> {
        match self {
            Amount::Constant(value) => Ok(*value),

            Amount::Stat(key) => {
                let spell = ctx
                    .spell
                    .ok_or(ContentError::StatOutsideSpell { stat: *key })?;
                spell.stats().get(*key).ok_or_else(|| ContentError::MissingStat {
                    spell: spell.label().to_string(),
                    stat: *key,
                })
            }

            Amount::Counter(name) => Ok(ctx.spell.map(|s| s.counter(name)).unwrap_or(0)),

            Amount::CasterGold { percent } => {
                Ok((ctx.caster.gold() as i64 * *percent as i64 / 100) as i32)
            }

            Amount::AfflictionStacks { of, affliction } => {
                Ok(ctx.subject(*of).afflictions().stacks(*affliction) as i32)
            }

            Amount::MissingHp { of, percent } => {
                let who = ctx.subject(*of);
                let missing = who.max_hp() - who.hp();
                Ok((missing as i64 * *percent as i64 / 100) as i32)
            }

            Amount::Ward { of } => Ok(ctx.subject(*of).ward() as i32),

            Amount::Sum(parts) => parts
                .iter()
                .try_fold(0i32, |acc, part| Ok(acc.saturating_add(part.evaluate(ctx)?))),

            Amount::Scaled { amount, percent } => {
                let value = amount.evaluate(ctx)?;
                Ok((value as i64 * *percent as i64 / 100) as i32)
            }

            Amount::Negate(amount) => Ok(amount.evaluate(ctx)?.saturating_neg()),
        }
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Amount::Constant(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CombatantSetup, Side};

    fn combatant(side: Side, hp: u32, gold: u32) -> Combatant {
        Combatant::new(
            side,
            CombatantSetup {
                name: "dummy".into(),
                max_hp: 40,
                hp: Some(hp),
                max_mana: 3,
                basic_attack_damage: 1,
                gold,
            },
        )
    }

    #[test]
    fn gold_and_missing_hp_read_live_state() {
        let caster = combatant(Side::Character, 30, 250);
        let target = combatant(Side::Enemy, 10, 0);
        let ctx = AmountContext::new(&caster, &target, None);

        assert_eq!(Amount::CasterGold { percent: 10 }.evaluate(&ctx), Ok(25));
        assert_eq!(
            Amount::MissingHp {
                of: Subject::Target,
                percent: 50
            }
            .evaluate(&ctx),
            Ok(15)
        );
        let total = Amount::Sum(vec![Amount::Constant(4), Amount::negate(Amount::Constant(1))]);
        assert_eq!(total.evaluate(&ctx), Ok(3));
    }

    #[test]
    fn stat_outside_spell_is_content_error() {
        let caster = combatant(Side::Character, 30, 0);
        let target = combatant(Side::Enemy, 30, 0);
        let ctx = AmountContext::new(&caster, &target, None);

        assert_eq!(
            Amount::Stat(StatKey::OtherDamageAmount).evaluate(&ctx),
            Err(ContentError::StatOutsideSpell {
                stat: StatKey::OtherDamageAmount
            })
        );
        assert_eq!(Amount::Counter("casts".into()).evaluate(&ctx), Ok(0));
    }
}
