//! Guard predicates over enemy and combat state.

use std::collections::BTreeSet;

use crate::state::{AfflictionType, Combatant};

/// Read-only state a behavior predicate may inspect.
#[derive(Clone, Copy, Debug)]
pub struct BehaviorContext<'a> {
    /// Current turn number (1 on the first turn).
    pub turn: u32,
    pub enemy: &'a Combatant,
    /// The enemy's opponent.
    pub target: &'a Combatant,
    pub flags: &'a BTreeSet<String>,
}

/// Data-defined guard for a behavior table entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorPredicate {
    Always,
    TurnEquals(u32),
    TurnAtLeast(u32),
    /// `turn % k == r`; never true for `k == 0`.
    TurnModulo { k: u32, r: u32 },
    FlagSet(String),
    /// Enemy HP strictly below this percentage of its maximum.
    HpBelowPercent(u32),
    HasAffliction(AfflictionType),
    TargetHasAffliction(AfflictionType),
    All(Vec<BehaviorPredicate>),
    Any(Vec<BehaviorPredicate>),
    Not(Box<BehaviorPredicate>),
}

impl BehaviorPredicate {
    pub fn evaluate(&self, ctx: &BehaviorContext<'_>) -> bool {
        match self {
            BehaviorPredicate::Always => true,
            BehaviorPredicate::TurnEquals(turn) => ctx.turn == *turn,
            BehaviorPredicate::TurnAtLeast(turn) => ctx.turn >= *turn,
            BehaviorPredicate::TurnModulo { k, r } => *k != 0 && ctx.turn % k == *r,
            BehaviorPredicate::FlagSet(flag) => ctx.flags.contains(flag),
            BehaviorPredicate::HpBelowPercent(percent) => {
                (ctx.enemy.hp() as u64) * 100 < (ctx.enemy.max_hp() as u64) * (*percent as u64)
            }
            BehaviorPredicate::HasAffliction(kind) => ctx.enemy.afflictions().has(*kind),
            BehaviorPredicate::TargetHasAffliction(kind) => ctx.target.afflictions().has(*kind),
            BehaviorPredicate::All(all) => all.iter().all(|p| p.evaluate(ctx)),
            BehaviorPredicate::Any(any) => any.iter().any(|p| p.evaluate(ctx)),
            BehaviorPredicate::Not(inner) => !inner.evaluate(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CombatantSetup, Side};

    fn combatant(side: Side, hp: u32) -> Combatant {
        Combatant::new(
            side,
            CombatantSetup {
                name: side.as_str().into(),
                max_hp: 40,
                hp: Some(hp),
                max_mana: 0,
                basic_attack_damage: 3,
                gold: 0,
            },
        )
    }

    #[test]
    fn turn_patterns() {
        let enemy = combatant(Side::Enemy, 40);
        let target = combatant(Side::Character, 40);
        let flags = BTreeSet::new();
        let at = |turn| BehaviorContext {
            turn,
            enemy: &enemy,
            target: &target,
            flags: &flags,
        };

        let every_third = BehaviorPredicate::TurnModulo { k: 3, r: 0 };
        assert!(!every_third.evaluate(&at(1)));
        assert!(every_third.evaluate(&at(3)));
        assert!(every_third.evaluate(&at(6)));
        assert!(!BehaviorPredicate::TurnModulo { k: 0, r: 0 }.evaluate(&at(0)));

        let later = BehaviorPredicate::Not(Box::new(BehaviorPredicate::TurnEquals(1)));
        assert!(!later.evaluate(&at(1)));
        assert!(later.evaluate(&at(2)));
    }

    #[test]
    fn hp_and_flags() {
        let enemy = combatant(Side::Enemy, 19);
        let target = combatant(Side::Character, 40);
        let flags = BTreeSet::from(["enraged".to_string()]);
        let ctx = BehaviorContext {
            turn: 2,
            enemy: &enemy,
            target: &target,
            flags: &flags,
        };

        assert!(BehaviorPredicate::HpBelowPercent(50).evaluate(&ctx));
        assert!(!BehaviorPredicate::HpBelowPercent(40).evaluate(&ctx));
        assert!(
            BehaviorPredicate::All(vec![
                BehaviorPredicate::FlagSet("enraged".into()),
                BehaviorPredicate::TurnAtLeast(2),
            ])
            .evaluate(&ctx)
        );
        assert!(!BehaviorPredicate::Any(vec![]).evaluate(&ctx));
    }
}
