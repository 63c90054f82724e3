//! Attack damage pipeline.
//!
//! base → + outgoing flat → × outgoing percent → × incoming percent →
//! intangible cap → ward → HP → thorns.
//!
//! Only attack effects go through here. HP alterations and damage over time
//! with `bypass_ward` skip it.

use crate::env::{AfflictionBehavior, AfflictionCatalog};
use crate::spell::DamageType;
use crate::state::{Combatant, Side};

use super::{CombatEngine, CombatEvent};

/// Sum over the combatant's afflictions of whatever `select` extracts.
fn sum_behavior(
    combatant: &Combatant,
    catalog: &AfflictionCatalog,
    select: impl Fn(AfflictionBehavior, u32) -> Option<i64>,
) -> i64 {
    combatant
        .afflictions()
        .iter()
        .filter_map(|a| select(catalog.behavior(a.kind), a.stacks))
        .sum()
}

/// Damage after attacker and defender modifiers, before intangible and ward.
pub fn modified_damage(
    base: i32,
    attacker: &Combatant,
    defender: &Combatant,
    catalog: &AfflictionCatalog,
) -> u32 {
    let mut damage = base.max(0) as i64;

    damage += sum_behavior(attacker, catalog, |b, stacks| {
        matches!(b, AfflictionBehavior::OutgoingDamageFlat).then_some(stacks as i64)
    });

    let outgoing = sum_behavior(attacker, catalog, |b, _| match b {
        AfflictionBehavior::OutgoingDamagePercent(p) => Some(p as i64),
        _ => None,
    });
    damage = (damage * (100 + outgoing).max(0)) / 100;

    let incoming = sum_behavior(defender, catalog, |b, _| match b {
        AfflictionBehavior::IncomingDamagePercent(p) => Some(p as i64),
        _ => None,
    });
    damage = (damage * (100 + incoming).max(0)) / 100;

    damage.clamp(0, u32::MAX as i64) as u32
}

/// The first affliction on `combatant` whose behavior matches.
pub(crate) fn find_behavior(
    combatant: &Combatant,
    catalog: &AfflictionCatalog,
    wanted: impl Fn(AfflictionBehavior) -> bool,
) -> Option<crate::state::AfflictionType> {
    combatant
        .afflictions()
        .iter()
        .find(|a| wanted(catalog.behavior(a.kind)))
        .map(|a| a.kind)
}

impl CombatEngine<'_> {
    /// Routes one attack from `attacker` to `defender`.
    pub(crate) fn attack(
        &mut self,
        attacker: Side,
        defender: Side,
        base: i32,
        damage_type: DamageType,
    ) {
        let catalog = self.env.afflictions();
        let mut damage = modified_damage(
            base,
            self.state.combatant(attacker),
            self.state.combatant(defender),
            catalog,
        );

        if damage > 0 {
            let intangible = find_behavior(self.state.combatant(defender), catalog, |b| {
                matches!(b, AfflictionBehavior::Intangible)
            });
            if let Some(kind) = intangible {
                damage = damage.min(1);
                self.consume_stack(defender, kind);
            }
        }

        self.deal_attack_damage(defender, damage, damage_type);

        if attacker != defender && !self.state.combatant(attacker).is_dead() {
            let thorns = sum_behavior(self.state.combatant(defender), catalog, |b, stacks| {
                matches!(b, AfflictionBehavior::Thorns).then_some(stacks as i64)
            });
            if thorns > 0 {
                tracing::trace!(target: "combat", %attacker, thorns, "thorns reflect");
                self.deal_attack_damage(attacker, thorns as u32, DamageType::Default);
            }
        }
    }

    /// Applies already-modified damage through ward, recording the result.
    pub(crate) fn deal_attack_damage(&mut self, target: Side, damage: u32, damage_type: DamageType) {
        let result = self.state.combatant_mut(target).absorb_attack(damage);
        self.record_hp_loss(target, result.hp.lost(), result.absorbed, damage_type);
        if result.hp.died {
            self.emit(CombatEvent::CombatantDied { side: target });
        }
    }

    pub(crate) fn record_hp_loss(
        &mut self,
        target: Side,
        amount: u32,
        absorbed: u32,
        damage_type: DamageType,
    ) {
        match target {
            Side::Enemy => self.state.tally.damage_dealt += amount,
            Side::Character => self.state.tally.damage_taken += amount,
        }
        self.emit(CombatEvent::Damage {
            target,
            amount,
            absorbed,
            damage_type,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CombatantSetup, Side};

    fn combatant(side: Side) -> Combatant {
        Combatant::new(
            side,
            CombatantSetup {
                name: side.as_str().into(),
                max_hp: 50,
                hp: None,
                max_mana: 3,
                basic_attack_damage: 5,
                gold: 0,
            },
        )
    }

    fn afflict(
        c: &mut Combatant,
        catalog: &AfflictionCatalog,
        kind: crate::state::AfflictionType,
        n: i32,
    ) {
        let def = catalog.get(kind).unwrap();
        c.afflictions_mut().apply(kind, n, def.sign, def.decay);
    }

    #[test]
    fn modifiers_apply_in_order() {
        use crate::state::AfflictionType::*;
        let catalog = AfflictionCatalog::standard();
        let mut attacker = combatant(Side::Character);
        let mut defender = combatant(Side::Enemy);

        assert_eq!(modified_damage(10, &attacker, &defender, &catalog), 10);

        afflict(&mut attacker, &catalog, Power, 2);
        assert_eq!(modified_damage(10, &attacker, &defender, &catalog), 12);

        // (10 + 2) * 75% = 9
        afflict(&mut attacker, &catalog, Weak, 1);
        assert_eq!(modified_damage(10, &attacker, &defender, &catalog), 9);

        // 9 * 150% = 13
        afflict(&mut defender, &catalog, Vulnerable, 1);
        assert_eq!(modified_damage(10, &attacker, &defender, &catalog), 13);
    }

    #[test]
    fn negative_base_is_clamped() {
        let catalog = AfflictionCatalog::standard();
        let attacker = combatant(Side::Character);
        let defender = combatant(Side::Enemy);
        assert_eq!(modified_damage(-4, &attacker, &defender, &catalog), 0);
    }
}
