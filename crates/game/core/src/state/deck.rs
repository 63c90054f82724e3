//! The character's deck of single-use spell cards.
//!
//! Cards are spell ids referring into the character's spellbook. The draw
//! pile is drawn from the back; an empty draw pile is refilled by shuffling
//! the discard pile. Cast cards are exhausted and do not return this combat.

use crate::spell::SpellId;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<SpellId>,
    draw_pile: Vec<SpellId>,
    hand: Vec<SpellId>,
    discard: Vec<SpellId>,
    exhausted: Vec<SpellId>,
}

impl Deck {
    /// Creates a deck with every card in the draw pile, in the given order.
    pub fn new(cards: Vec<SpellId>) -> Self {
        let mut deck = Self {
            cards,
            ..Self::default()
        };
        deck.reset();
        deck
    }

    /// Gathers every card back into the draw pile in its original order.
    pub fn reset(&mut self) {
        self.draw_pile = self.cards.iter().rev().copied().collect();
        self.hand.clear();
        self.discard.clear();
        self.exhausted.clear();
    }

    pub fn draw_pile(&self) -> &[SpellId] {
        &self.draw_pile
    }

    pub fn hand(&self) -> &[SpellId] {
        &self.hand
    }

    pub fn discard(&self) -> &[SpellId] {
        &self.discard
    }

    pub fn exhausted(&self) -> &[SpellId] {
        &self.exhausted
    }

    pub fn in_hand(&self, id: SpellId) -> bool {
        self.hand.contains(&id)
    }

    pub fn is_card(&self, id: SpellId) -> bool {
        self.cards.contains(&id)
    }

    /// Shuffles the draw pile using `roll(upper_inclusive)` (Fisher-Yates).
    pub fn shuffle_draw_pile(&mut self, mut roll: impl FnMut(u32) -> u32) {
        for i in (1..self.draw_pile.len()).rev() {
            let j = (roll(i as u32) as usize).min(i);
            self.draw_pile.swap(i, j);
        }
    }

    /// Draws up to `count` cards into the hand, returning how many were drawn.
    ///
    /// When the draw pile runs dry, the discard pile is shuffled back in with
    /// `roll`; drawing stops once both are empty.
    pub fn draw(&mut self, count: u32, mut roll: impl FnMut(u32) -> u32) -> u32 {
        let mut drawn = 0;
        for _ in 0..count {
            if self.draw_pile.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.draw_pile.append(&mut self.discard);
                self.shuffle_draw_pile(&mut roll);
            }
            if let Some(card) = self.draw_pile.pop() {
                self.hand.push(card);
                drawn += 1;
            }
        }
        drawn
    }

    /// Moves up to `count` cards from the front of the hand to the discard,
    /// passing over any card in `held`. Returns how many were moved.
    pub fn discard_from_hand(&mut self, count: u32, held: &[SpellId]) -> u32 {
        let mut moved = 0;
        let mut index = 0;
        while moved < count && index < self.hand.len() {
            if held.contains(&self.hand[index]) {
                index += 1;
                continue;
            }
            let card = self.hand.remove(index);
            self.discard.push(card);
            moved += 1;
        }
        moved
    }

    /// Removes a card from the hand for the rest of combat.
    pub fn exhaust(&mut self, id: SpellId) -> bool {
        match self.hand.iter().position(|c| *c == id) {
            Some(index) => {
                self.hand.remove(index);
                self.exhausted.push(id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u16]) -> Vec<SpellId> {
        raw.iter().map(|i| SpellId(*i)).collect()
    }

    #[test]
    fn draws_in_original_order_before_shuffle() {
        let mut deck = Deck::new(ids(&[1, 2, 3]));
        assert_eq!(deck.draw(2, |_| 0), 2);
        assert_eq!(deck.hand(), ids(&[1, 2]).as_slice());
        assert_eq!(deck.draw_pile().len(), 1);
    }

    #[test]
    fn reshuffles_discard_when_empty() {
        let mut deck = Deck::new(ids(&[1, 2]));
        deck.draw(2, |_| 0);
        assert_eq!(deck.discard_from_hand(2, &[]), 2);

        assert_eq!(deck.draw(5, |_| 0), 2);
        assert_eq!(deck.hand().len(), 2);
        assert!(deck.discard().is_empty());
    }

    #[test]
    fn discarding_passes_over_held_cards() {
        let mut deck = Deck::new(ids(&[1, 2, 3]));
        deck.draw(3, |_| 0);
        assert_eq!(deck.discard_from_hand(2, &ids(&[1])), 2);
        assert_eq!(deck.hand(), ids(&[1]).as_slice());
        assert_eq!(deck.discard(), ids(&[2, 3]).as_slice());
        assert_eq!(deck.discard_from_hand(5, &ids(&[1])), 0);
    }

    #[test]
    fn exhausted_cards_do_not_return() {
        let mut deck = Deck::new(ids(&[4]));
        deck.draw(1, |_| 0);
        assert!(deck.exhaust(SpellId(4)));
        assert!(!deck.exhaust(SpellId(4)));

        assert_eq!(deck.draw(1, |_| 0), 0);
        assert_eq!(deck.exhausted(), ids(&[4]).as_slice());

        deck.reset();
        assert_eq!(deck.draw_pile().len(), 1);
    }
}
