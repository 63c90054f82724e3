//! Cast conditions and cast validation.
//!
//! Whether a spell can be queued is the logical AND of a fixed set of
//! implicit checks (passive, queued, in hand, cooldown, mana) and the
//! spell's authored [`CanCastCondition`]s. Every check is evaluated so the
//! rejection can report all of them; the first failure is the primary one.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{AfflictionType, Combatant, Deck};

use super::{CastType, Spell};

/// Authored predicate a spell requires before it can be queued.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CanCastCondition {
    /// Fewer than `n` cards remain in the caster's draw pile.
    DrawPileFewerThan(u32),
    /// The caster holds at most `n` cards.
    HandAtMost(u32),
    /// The caster has at least `n` HP (self-damage spells).
    HpAtLeast(u32),
    /// The caster has at least `n` gold.
    GoldAtLeast(u32),
    CasterHas(AfflictionType),
    TargetHas(AfflictionType),
    /// One of the spell's own counters is at least `value`.
    CounterAtLeast { counter: String, value: i32 },
}

impl CanCastCondition {
    fn holds(&self, check: &CastCheck<'_>) -> bool {
        match self {
            CanCastCondition::DrawPileFewerThan(n) => {
                let remaining = check.deck.map(|d| d.draw_pile().len()).unwrap_or(0);
                (remaining as u32) < *n
            }
            CanCastCondition::HandAtMost(n) => {
                let held = check.deck.map(|d| d.hand().len()).unwrap_or(0);
                held as u32 <= *n
            }
            CanCastCondition::HpAtLeast(n) => check.caster.hp() >= *n,
            CanCastCondition::GoldAtLeast(n) => check.caster.gold() >= *n,
            CanCastCondition::CasterHas(kind) => check.caster.afflictions().has(*kind),
            CanCastCondition::TargetHas(kind) => check.target.afflictions().has(*kind),
            CanCastCondition::CounterAtLeast { counter, value } => {
                check.spell.counter(counter) >= *value
            }
        }
    }
}

/// One reason a spell cannot be queued right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CastFailure {
    /// Power spells act only through their hooks.
    Passive,
    AlreadyQueued,
    NotInHand,
    OnCooldown { remaining: u32 },
    InsufficientMana { required: u32, available: u32 },
    QueueFull,
    Unmet(CanCastCondition),
}

impl std::fmt::Display for CastFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CastFailure::Passive => f.write_str("passive spells cannot be cast"),
            CastFailure::AlreadyQueued => f.write_str("already queued"),
            CastFailure::NotInHand => f.write_str("card is not in hand"),
            CastFailure::OnCooldown { remaining } => {
                write!(f, "on cooldown for {remaining} more turn(s)")
            }
            CastFailure::InsufficientMana {
                required,
                available,
            } => write!(f, "needs {required} mana, has {available}"),
            CastFailure::QueueFull => f.write_str("spell queue is full"),
            CastFailure::Unmet(condition) => write!(f, "condition not met: {condition:?}"),
        }
    }
}

/// Errors raised while trying to queue a spell.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    /// Every failing check, primary first.
    #[error("cannot cast '{spell}': {}", primary_message(.failures))]
    CannotCast {
        spell: String,
        failures: Vec<CastFailure>,
    },

    #[error("no equipped spell named '{0}'")]
    NotEquipped(String),
}

fn primary_message(failures: &[CastFailure]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "no reason given".to_string())
}

impl CastError {
    /// The failure reported to the player.
    pub fn primary(&self) -> Option<&CastFailure> {
        match self {
            CastError::CannotCast { failures, .. } => failures.first(),
            CastError::NotEquipped(_) => None,
        }
    }
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            CastError::CannotCast { failures, .. } => match failures.first() {
                Some(CastFailure::Passive) => "CAST_PASSIVE",
                Some(CastFailure::AlreadyQueued) => "CAST_ALREADY_QUEUED",
                Some(CastFailure::NotInHand) => "CAST_NOT_IN_HAND",
                Some(CastFailure::OnCooldown { .. }) => "CAST_ON_COOLDOWN",
                Some(CastFailure::InsufficientMana { .. }) => "CAST_INSUFFICIENT_MANA",
                Some(CastFailure::QueueFull) => "CAST_QUEUE_FULL",
                Some(CastFailure::Unmet(_)) | None => "CAST_CONDITION_UNMET",
            },
            CastError::NotEquipped(_) => "CAST_NOT_EQUIPPED",
        }
    }
}

/// How an accepted cast will be paid for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CastPlan {
    /// A free cast is consumed instead of paying mana and cooldown.
    pub free_cast: bool,
    pub mana_cost: u32,
}

/// Everything cast validation reads, borrowed from combat state.
#[derive(Clone, Copy, Debug)]
pub struct CastCheck<'a> {
    pub spell: &'a Spell,
    pub caster: &'a Combatant,
    pub target: &'a Combatant,
    /// The caster's deck, if it owns one.
    pub deck: Option<&'a Deck>,
    pub in_hand: bool,
    pub queued: bool,
    pub queue_full: bool,
}

impl CastCheck<'_> {
    /// Runs every check. Nothing is mutated either way.
    pub fn evaluate(&self) -> Result<CastPlan, CastError> {
        let mut failures = Vec::new();
        let has_free_cast = self.caster.free_casts() > 0;
        let mut free_cast = false;

        if self.spell.cast_type() == CastType::Power {
            failures.push(CastFailure::Passive);
        }
        if self.queued {
            failures.push(CastFailure::AlreadyQueued);
        }
        if self.spell.cast_type() == CastType::SingleUse && !self.in_hand {
            failures.push(CastFailure::NotInHand);
        }

        let cooldown = self.spell.cooldown();
        if !cooldown.is_ready() {
            if has_free_cast {
                free_cast = true;
            } else {
                failures.push(CastFailure::OnCooldown {
                    remaining: cooldown.current(),
                });
            }
        }

        let mana_cost = self.spell.mana_cost();
        if mana_cost > self.caster.mana() {
            if has_free_cast {
                free_cast = true;
            } else {
                failures.push(CastFailure::InsufficientMana {
                    required: mana_cost,
                    available: self.caster.mana(),
                });
            }
        }

        for condition in &self.spell.definition().conditions {
            if !condition.holds(self) {
                failures.push(CastFailure::Unmet(condition.clone()));
            }
        }

        if self.queue_full {
            failures.push(CastFailure::QueueFull);
        }

        if failures.is_empty() {
            Ok(CastPlan {
                free_cast,
                mana_cost: if free_cast { 0 } else { mana_cost },
            })
        } else {
            Err(CastError::CannotCast {
                spell: self.spell.label().to_string(),
                failures,
            })
        }
    }
}
