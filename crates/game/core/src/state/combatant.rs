//! Combatants and their resource counters.
//!
//! HP, mana, and ward are bounded counters:
//! - `hp ∈ [0, max_hp]`; reaching 0 marks the combatant dead
//! - `mana ∈ [0, max_mana]` (enemies carry `max_mana = 0`)
//! - `ward ≥ 0`, absorbs incoming attack damage before HP
//!
//! Only the combat engine and the effect resolver it drives mutate these.

use std::fmt;

use super::afflictions::Afflictions;

/// Which side of the fight a combatant is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Character,
    Enemy,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::Character => Side::Enemy,
            Side::Enemy => Side::Character,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Character => "character",
            Side::Enemy => "enemy",
        }
    }

    /// Stable numeric id used for seed derivation.
    pub const fn index(self) -> u32 {
        match self {
            Side::Character => 0,
            Side::Enemy => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistent data a combatant is created from at combat start.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantSetup {
    pub name: String,
    pub max_hp: u32,
    /// Starting HP; `None` starts at full.
    pub hp: Option<u32>,
    pub max_mana: u32,
    pub basic_attack_damage: u32,
    pub gold: u32,
}

/// Before/after snapshot of an HP change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HpChange {
    pub before: u32,
    pub after: u32,
    pub died: bool,
}

impl HpChange {
    pub fn lost(&self) -> u32 {
        self.before.saturating_sub(self.after)
    }

    pub fn gained(&self) -> u32 {
        self.after.saturating_sub(self.before)
    }
}

/// Outcome of routing incoming attack damage through ward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Absorption {
    pub absorbed: u32,
    pub hp: HpChange,
}

/// One side of a fight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combatant {
    side: Side,
    name: String,
    hp: u32,
    max_hp: u32,
    mana: u32,
    max_mana: u32,
    ward: u32,
    basic_attack_damage: u32,
    gold: u32,
    free_casts: u32,
    afflictions: Afflictions,
    dead: bool,
}

impl Combatant {
    pub fn new(side: Side, setup: CombatantSetup) -> Self {
        let max_hp = setup.max_hp.max(1);
        let hp = setup.hp.unwrap_or(max_hp).min(max_hp);
        Self {
            side,
            name: setup.name,
            hp,
            max_hp,
            mana: setup.max_mana,
            max_mana: setup.max_mana,
            ward: 0,
            basic_attack_damage: setup.basic_attack_damage,
            gold: setup.gold,
            free_casts: 0,
            afflictions: Afflictions::new(),
            dead: hp == 0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn ward(&self) -> u32 {
        self.ward
    }

    pub fn basic_attack_damage(&self) -> u32 {
        self.basic_attack_damage
    }

    pub fn gold(&self) -> u32 {
        self.gold
    }

    pub fn free_casts(&self) -> u32 {
        self.free_casts
    }

    pub fn afflictions(&self) -> &Afflictions {
        &self.afflictions
    }

    pub fn afflictions_mut(&mut self) -> &mut Afflictions {
        &mut self.afflictions
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Adds `delta` HP, clamped into `[0, max_hp]`. Dropping to 0 marks death.
    ///
    /// This path bypasses ward; attacks go through [`Self::absorb_attack`].
    pub fn alter_hp(&mut self, delta: i32) -> HpChange {
        let before = self.hp;
        if self.dead {
            return HpChange {
                before,
                after: before,
                died: false,
            };
        }
        let after = (before as i64 + delta as i64).clamp(0, self.max_hp as i64) as u32;
        self.hp = after;
        let died = after == 0 && !self.dead;
        if after == 0 {
            self.dead = true;
        }
        debug_assert!(self.hp <= self.max_hp);
        HpChange {
            before,
            after,
            died,
        }
    }

    /// Routes incoming attack damage through ward first, then HP.
    pub fn absorb_attack(&mut self, incoming: u32) -> Absorption {
        let absorbed = incoming.min(self.ward);
        self.ward -= absorbed;
        let unabsorbed = incoming - absorbed;
        let hp = self.alter_hp(-(unabsorbed.min(i32::MAX as u32) as i32));
        Absorption { absorbed, hp }
    }

    /// Adds `delta` mana, clamped into `[0, max_mana]`. Returns the applied delta.
    pub fn alter_mana(&mut self, delta: i32) -> i32 {
        let before = self.mana;
        self.mana = (before as i64 + delta as i64).clamp(0, self.max_mana as i64) as u32;
        applied_delta(before, self.mana)
    }

    /// Spends exactly `cost` mana. Callers check affordability first.
    pub(crate) fn spend_mana(&mut self, cost: u32) {
        debug_assert!(cost <= self.mana, "mana spent beyond availability");
        self.mana = self.mana.saturating_sub(cost);
    }

    pub(crate) fn refill_mana(&mut self) {
        self.mana = self.max_mana;
    }

    /// Adds `delta` ward, floored at zero. Returns the applied delta.
    pub fn alter_ward(&mut self, delta: i32) -> i32 {
        let before = self.ward;
        self.ward = (before as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32;
        applied_delta(before, self.ward)
    }

    pub(crate) fn clear_ward(&mut self) {
        self.ward = 0;
    }

    pub fn alter_gold(&mut self, delta: i32) -> i32 {
        let before = self.gold;
        self.gold = (before as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32;
        applied_delta(before, self.gold)
    }

    pub(crate) fn grant_free_casts(&mut self, count: u32) {
        self.free_casts = self.free_casts.saturating_add(count);
    }

    pub(crate) fn consume_free_cast(&mut self) -> bool {
        if self.free_casts == 0 {
            return false;
        }
        self.free_casts -= 1;
        true
    }

    pub(crate) fn clear_free_casts(&mut self) {
        self.free_casts = 0;
    }
}

/// `after - before`, saturated into `i32`.
fn applied_delta(before: u32, after: u32) -> i32 {
    (after as i64 - before as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(hp: u32) -> Combatant {
        Combatant::new(
            Side::Character,
            CombatantSetup {
                name: "Wizard".into(),
                max_hp: 20,
                hp: Some(hp),
                max_mana: 3,
                basic_attack_damage: 2,
                gold: 0,
            },
        )
    }

    #[test]
    fn ward_absorbs_before_hp() {
        let mut c = character(20);
        c.alter_ward(5);

        let result = c.absorb_attack(8);
        assert_eq!(result.absorbed, 5);
        assert_eq!(c.ward(), 0);
        assert_eq!(c.hp(), 17);
    }

    #[test]
    fn ward_fully_absorbs_small_hits() {
        let mut c = character(20);
        c.alter_ward(10);

        c.absorb_attack(4);
        assert_eq!(c.ward(), 6);
        assert_eq!(c.hp(), 20);
    }

    #[test]
    fn resources_stay_in_bounds() {
        let mut c = character(20);
        let deltas = [-7, 30, -100, 5, i32::MAX, i32::MIN + 1];
        for delta in deltas {
            c.alter_mana(delta);
            c.alter_ward(delta);
            assert!(c.mana() <= c.max_mana());
        }
        for delta in [5, -3, 40, -19] {
            c.alter_hp(delta);
            assert!(c.hp() <= c.max_hp());
        }
        assert_eq!(c.hp(), 1);
        assert!(!c.is_dead());
    }

    #[test]
    fn huge_ward_and_gold_deltas_saturate() {
        let mut c = character(20);
        assert_eq!(c.alter_ward(5), 5);
        assert_eq!(c.alter_ward(i32::MAX), i32::MAX);
        assert_eq!(c.ward(), 5 + i32::MAX as u32);
        assert_eq!(c.alter_ward(i32::MAX), (u32::MAX - 5 - i32::MAX as u32) as i32);
        assert_eq!(c.ward(), u32::MAX);

        assert_eq!(c.alter_ward(i32::MIN), i32::MIN);
        assert_eq!(c.ward(), u32::MAX - (1 << 31));

        c.alter_gold(i32::MAX);
        c.alter_gold(i32::MAX);
        assert_eq!(c.alter_gold(i32::MAX), 1);
        assert_eq!(c.gold(), u32::MAX);
    }

    #[test]
    fn reaching_zero_hp_marks_death_once() {
        let mut c = character(3);
        let first = c.alter_hp(-10);
        assert!(first.died);
        assert!(c.is_dead());
        assert_eq!(c.hp(), 0);

        let second = c.alter_hp(-1);
        assert!(!second.died);
    }
}
