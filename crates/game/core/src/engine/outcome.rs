use crate::state::{CombatOutcome, CombatState};

/// What a finished combat reports back to the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSummary {
    /// `None` when the combat was aborted by a content error.
    pub outcome: Option<CombatOutcome>,
    pub turns: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub character_hp: u32,
    pub enemy_hp: u32,
}

impl CombatSummary {
    pub fn from_state(state: &CombatState) -> Self {
        Self {
            outcome: state.outcome(),
            turns: state.turn_number(),
            damage_dealt: state.tally.damage_dealt,
            damage_taken: state.tally.damage_taken,
            character_hp: state.character.hp(),
            enemy_hp: state.enemy.hp(),
        }
    }

    pub fn is_victory(&self) -> bool {
        self.outcome == Some(CombatOutcome::Victory)
    }
}
