/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Cards drawn from the deck at the start of every player turn.
    pub cards_per_turn: u32,

    /// When set, ward drops to zero at the start of its owner's turn unless
    /// the owner carries a ward-retaining affliction.
    pub reset_ward_each_turn: bool,

    /// Extra resolutions of the OnCast effect list granted by one stack of a
    /// repeat-cast affliction.
    pub echo_repeats: u32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on distinct affliction instances per combatant.
    pub const MAX_AFFLICTIONS: usize = 16;
    /// Upper bound on spells waiting in a single queue.
    pub const MAX_QUEUE: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CARDS_PER_TURN: u32 = 2;
    pub const DEFAULT_ECHO_REPEATS: u32 = 1;

    pub fn new() -> Self {
        Self {
            cards_per_turn: Self::DEFAULT_CARDS_PER_TURN,
            reset_ward_each_turn: false,
            echo_repeats: Self::DEFAULT_ECHO_REPEATS,
        }
    }

    pub fn with_cards_per_turn(mut self, cards_per_turn: u32) -> Self {
        self.cards_per_turn = cards_per_turn;
        self
    }

    pub fn with_ward_reset(mut self, reset_ward_each_turn: bool) -> Self {
        self.reset_ward_each_turn = reset_ward_each_turn;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
