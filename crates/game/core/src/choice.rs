//! Weighted random selection.
//!
//! Weights are relative: they need not sum to 100. A draw picks a roll
//! uniformly in `[0, total_weight)` and walks the cumulative weights,
//! returning the first item whose running sum exceeds the roll.

use crate::error::ContentError;

/// A non-empty list of `(item, weight)` pairs with positive weights.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "Vec<(T, u32)>",
        bound(deserialize = "T: serde::Deserialize<'de>")
    )
)]
pub struct WeightedChoice<T> {
    entries: Vec<(T, u32)>,
    total: u32,
}

impl<T> WeightedChoice<T> {
    /// Validates and builds a choice.
    pub fn new(entries: Vec<(T, u32)>) -> Result<Self, ContentError> {
        if entries.is_empty() {
            return Err(ContentError::EmptyWeightedChoice);
        }
        if entries.iter().any(|(_, weight)| *weight == 0) {
            return Err(ContentError::NonPositiveWeight);
        }
        let total = entries
            .iter()
            .fold(0u32, |acc, (_, weight)| acc.saturating_add(*weight));
        Ok(Self { entries, total })
    }

    pub fn total_weight(&self) -> u32 {
        self.total
    }

    pub fn entries(&self) -> &[(T, u32)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the item selected by `roll`, which must lie in
    /// `[0, total_weight)`. Out-of-range rolls select the last item.
    pub fn draw(&self, roll: u32) -> &T {
        let mut cumulative = 0u32;
        for (item, weight) in &self.entries {
            cumulative = cumulative.saturating_add(*weight);
            if roll < cumulative {
                return item;
            }
        }
        // Non-empty by construction.
        &self.entries[self.entries.len() - 1].0
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(item, _)| item)
    }
}

impl<T: Clone> WeightedChoice<T> {
    /// Concatenates several choices into one pool.
    ///
    /// Items present in more than one input keep one entry per input, so
    /// their weights effectively add up.
    pub fn union<'a>(
        choices: impl IntoIterator<Item = &'a WeightedChoice<T>>,
    ) -> Result<Self, ContentError>
    where
        T: 'a,
    {
        let entries: Vec<(T, u32)> = choices
            .into_iter()
            .flat_map(|choice| choice.entries.iter().cloned())
            .collect();
        Self::new(entries)
    }

    /// Drops entries rejected by `keep`. Errors if nothing remains.
    pub fn filtered(&self, mut keep: impl FnMut(&T) -> bool) -> Result<Self, ContentError> {
        Self::new(
            self.entries
                .iter()
                .filter(|(item, _)| keep(item))
                .cloned()
                .collect(),
        )
    }
}

impl<T> TryFrom<Vec<(T, u32)>> for WeightedChoice<T> {
    type Error = ContentError;

    fn try_from(entries: Vec<(T, u32)>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seventy_thirty() -> WeightedChoice<char> {
        WeightedChoice::new(vec![('A', 70), ('B', 30)]).unwrap()
    }

    #[test]
    fn boundary_roll_selects_next_item() {
        let choice = seventy_thirty();
        assert_eq!(choice.total_weight(), 100);
        assert_eq!(*choice.draw(0), 'A');
        assert_eq!(*choice.draw(69), 'A');
        assert_eq!(*choice.draw(70), 'B');
        assert_eq!(*choice.draw(99), 'B');
    }

    #[test]
    fn every_roll_maps_proportionally() {
        let choice = seventy_thirty();
        let a = (0..choice.total_weight())
            .filter(|roll| *choice.draw(*roll) == 'A')
            .count();
        assert_eq!(a, 70);
    }

    #[test]
    fn weights_need_not_sum_to_hundred() {
        let choice = WeightedChoice::new(vec![("x", 45), ("y", 45)]).unwrap();
        assert_eq!(choice.total_weight(), 90);
        assert_eq!(*choice.draw(44), "x");
        assert_eq!(*choice.draw(45), "y");
    }

    #[test]
    fn rejects_empty_and_zero_weights() {
        assert_eq!(
            WeightedChoice::<u8>::new(vec![]),
            Err(ContentError::EmptyWeightedChoice)
        );
        assert_eq!(
            WeightedChoice::new(vec![(1u8, 10), (2, 0)]),
            Err(ContentError::NonPositiveWeight)
        );
    }

    #[test]
    fn union_sums_duplicate_items() {
        let first = WeightedChoice::new(vec![("bite", 60), ("howl", 40)]).unwrap();
        let second = WeightedChoice::new(vec![("bite", 50)]).unwrap();
        let pool = WeightedChoice::union([&first, &second]).unwrap();

        assert_eq!(pool.total_weight(), 150);
        let bites = (0..150).filter(|r| *pool.draw(*r) == "bite").count();
        assert_eq!(bites, 110);

        let no_bite = pool.filtered(|item| *item != "bite").unwrap();
        assert_eq!(no_bite.total_weight(), 40);
        assert!(pool.filtered(|_| false).is_err());
    }
}
