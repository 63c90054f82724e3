//! Per-side spell queues.

use arrayvec::ArrayVec;

use crate::config::CombatConfig;
use crate::spell::SpellId;

/// A spell waiting to be cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueuedSpell {
    pub spell: SpellId,
    /// Paid for with a free cast; no cooldown is set when it resolves.
    pub free_cast: bool,
    /// Resolution passes already spent waiting. The spell is cast once this
    /// reaches its current prep time.
    pub prep_elapsed: u32,
}

/// FIFO queue of spells awaiting their cast.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpellQueue {
    entries: ArrayVec<QueuedSpell, { CombatConfig::MAX_QUEUE }>,
}

impl SpellQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub fn contains(&self, spell: SpellId) -> bool {
        self.entries.iter().any(|q| q.spell == spell)
    }

    pub fn get(&self, index: usize) -> Option<&QueuedSpell> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedSpell> {
        self.entries.iter()
    }

    /// Spell ids in queue order.
    pub fn spell_ids(&self) -> Vec<SpellId> {
        self.entries.iter().map(|q| q.spell).collect()
    }

    /// Appends to the back. Returns the entry back if the queue is full.
    pub fn push(&mut self, entry: QueuedSpell) -> Result<(), QueuedSpell> {
        self.entries.try_push(entry).map_err(|err| err.element())
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<QueuedSpell> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Counts one resolution pass toward the entry's prep time.
    pub(crate) fn tick_prep(&mut self, index: usize) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.prep_elapsed = entry.prep_elapsed.saturating_add(1);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
