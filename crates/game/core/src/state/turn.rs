use std::fmt;

/// Phase of the combat state machine.
///
/// `CombatStart → PlayerTurnStart → PlayerAction → PlayerTurnEnd →
/// EnemyTurnStart → EnemyAction → EnemyTurnEnd → PlayerTurnStart …`, with
/// `CombatEnd` reachable from any phase and terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatPhase {
    #[default]
    CombatStart,
    PlayerTurnStart,
    /// Waiting for the player to queue spells or end the turn.
    PlayerAction,
    PlayerTurnEnd,
    EnemyTurnStart,
    EnemyAction,
    EnemyTurnEnd,
    CombatEnd,
}

impl CombatPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            CombatPhase::CombatStart => "combat_start",
            CombatPhase::PlayerTurnStart => "player_turn_start",
            CombatPhase::PlayerAction => "player_action",
            CombatPhase::PlayerTurnEnd => "player_turn_end",
            CombatPhase::EnemyTurnStart => "enemy_turn_start",
            CombatPhase::EnemyAction => "enemy_action",
            CombatPhase::EnemyTurnEnd => "enemy_turn_end",
            CombatPhase::CombatEnd => "combat_end",
        }
    }
}

impl fmt::Display for CombatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a finished combat ended for the character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatOutcome {
    Victory,
    Defeat,
}

/// Turn bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Completed player+enemy cycles plus one; 0 before combat starts.
    pub number: u32,
    pub phase: CombatPhase,
    /// Set once combat ends normally; stays `None` when combat aborts.
    pub outcome: Option<CombatOutcome>,
    /// Random draw counter; every draw consumes one value.
    pub nonce: u64,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_over(&self) -> bool {
        self.phase == CombatPhase::CombatEnd
    }
}
