//! Practice sessions: pick cards, shuffle them, swipe through.
//!
//! A deck visits every selected card once per lap in a uniformly random
//! order. Swiping past either end wraps around; the outcome says so, so the
//! caller can tell the user they finished a lap.

use crate::error::PracticeError;
use crate::store::{Card, Group};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// Which groups to practise. Empty means every card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeSelection {
    groups: Vec<Uuid>,
}

impl PracticeSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn groups(ids: impl IntoIterator<Item = Uuid>) -> Self {
        let mut seen = HashSet::new();
        Self {
            groups: ids.into_iter().filter(|id| seen.insert(*id)).collect(),
        }
    }

    pub fn group_ids(&self) -> &[Uuid] {
        &self.groups
    }

    pub fn is_all(&self) -> bool {
        self.groups.is_empty()
    }

    /// Cards matching the selection, in their original order.
    pub fn select_cards<'a>(&self, cards: &'a [Card]) -> Vec<&'a Card> {
        cards
            .iter()
            .filter(|c| self.is_all() || self.groups.contains(&c.group_id))
            .collect()
    }

    /// "All Flashcards", "All Groups", or the selected names joined by ", ".
    pub fn label(&self, groups: &[Group]) -> String {
        if self.is_all() {
            return "All Flashcards".to_string();
        }
        if !groups.is_empty() && groups.iter().all(|g| self.groups.contains(&g.id)) {
            return "All Groups".to_string();
        }
        groups
            .iter()
            .filter(|g| self.groups.contains(&g.id))
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Forward, to the next card.
    Left,
    /// Back, to the previous card.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Moved,
    /// Swiped forward past the last card; back at the first.
    Completed,
    /// Swiped back past the first card; now at the last.
    WrappedToLast,
}

/// 1-based position within the deck, displayed as "k of n".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckPosition {
    pub current: usize,
    pub total: usize,
}

impl fmt::Display for DeckPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.current, self.total)
    }
}

/// A shuffled, non-empty run of cards with a cursor.
#[derive(Debug, Clone)]
pub struct PracticeDeck {
    cards: Vec<Card>,
    index: usize,
}

impl PracticeDeck {
    /// Shuffle with the thread-local RNG.
    pub fn new(cards: Vec<Card>) -> Result<Self, PracticeError> {
        Self::new_with_rng(cards, &mut rand::thread_rng())
    }

    /// Shuffle with the given RNG (Fisher–Yates).
    pub fn new_with_rng<R: Rng + ?Sized>(
        mut cards: Vec<Card>,
        rng: &mut R,
    ) -> Result<Self, PracticeError> {
        if cards.is_empty() {
            return Err(PracticeError::NoCards);
        }
        cards.shuffle(rng);
        Ok(Self { cards, index: 0 })
    }

    /// Build a deck from `cards` filtered by `selection`.
    pub fn from_selection<R: Rng + ?Sized>(
        cards: &[Card],
        selection: &PracticeSelection,
        rng: &mut R,
    ) -> Result<Self, PracticeError> {
        let picked = selection.select_cards(cards).into_iter().cloned().collect();
        Self::new_with_rng(picked, rng)
    }

    pub fn current(&self) -> &Card {
        &self.cards[self.index]
    }

    pub fn position(&self) -> DeckPosition {
        DeckPosition {
            current: self.index + 1,
            total: self.cards.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; an empty deck cannot be built.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn swipe(&mut self, direction: SwipeDirection) -> SwipeOutcome {
        let last = self.cards.len() - 1;
        match direction {
            SwipeDirection::Left if self.index < last => {
                self.index += 1;
                SwipeOutcome::Moved
            }
            SwipeDirection::Left => {
                self.index = 0;
                SwipeOutcome::Completed
            }
            SwipeDirection::Right if self.index > 0 => {
                self.index -= 1;
                SwipeOutcome::Moved
            }
            SwipeDirection::Right => {
                self.index = last;
                SwipeOutcome::WrappedToLast
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(n: u128, group: u128) -> Card {
        Card {
            id: Uuid::from_u128(n),
            question: format!("q{n}"),
            answer: format!("a{n}"),
            group_id: Uuid::from_u128(group),
            user_id: Uuid::nil(),
            created_at: Utc::now(),
        }
    }

    fn group(n: u128, name: &str) -> Group {
        Group {
            id: Uuid::from_u128(n),
            user_id: Uuid::nil(),
            name: name.into(),
            color: "#F1F0FB".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_deck_is_refused() {
        assert_eq!(PracticeDeck::new(Vec::new()).unwrap_err(), PracticeError::NoCards);
        let cards = vec![card(1, 100)];
        let only_other = PracticeSelection::groups([Uuid::from_u128(200)]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(PracticeDeck::from_selection(&cards, &only_other, &mut rng).is_err());
    }

    #[test]
    fn shuffle_keeps_every_card() {
        let cards: Vec<Card> = (1..=30).map(|n| card(n, 100)).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let deck = PracticeDeck::new_with_rng(cards.clone(), &mut rng).unwrap();

        let mut ids: Vec<Uuid> = deck.cards().iter().map(|c| c.id).collect();
        ids.sort();
        let expected: Vec<Uuid> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn same_seed_same_order() {
        let cards: Vec<Card> = (1..=10).map(|n| card(n, 100)).collect();
        let a = PracticeDeck::new_with_rng(cards.clone(), &mut StdRng::seed_from_u64(7)).unwrap();
        let b = PracticeDeck::new_with_rng(cards, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.cards(), b.cards());
    }

    #[test]
    fn swiping_wraps_both_ways() {
        let cards = vec![card(1, 100), card(2, 100), card(3, 100)];
        let mut deck = PracticeDeck::new_with_rng(cards, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(deck.position().to_string(), "1 of 3");

        assert_eq!(deck.swipe(SwipeDirection::Right), SwipeOutcome::WrappedToLast);
        assert_eq!(deck.position().current, 3);

        assert_eq!(deck.swipe(SwipeDirection::Left), SwipeOutcome::Completed);
        assert_eq!(deck.position().current, 1);

        assert_eq!(deck.swipe(SwipeDirection::Left), SwipeOutcome::Moved);
        assert_eq!(deck.swipe(SwipeDirection::Right), SwipeOutcome::Moved);
        assert_eq!(deck.position().current, 1);
    }

    #[test]
    fn single_card_deck_wraps_onto_itself() {
        let mut deck = PracticeDeck::new(vec![card(1, 100)]).unwrap();
        assert_eq!(deck.swipe(SwipeDirection::Left), SwipeOutcome::Completed);
        assert_eq!(deck.swipe(SwipeDirection::Right), SwipeOutcome::WrappedToLast);
        assert_eq!(deck.current().id, Uuid::from_u128(1));
    }

    #[test]
    fn selection_filters_and_labels() {
        let groups = vec![group(100, "Biology"), group(200, "Chemistry"), group(300, "Physics")];
        let cards = vec![card(1, 100), card(2, 200), card(3, 300), card(4, 100)];

        let all = PracticeSelection::all();
        assert_eq!(all.select_cards(&cards).len(), 4);
        assert_eq!(all.label(&groups), "All Flashcards");

        let some = PracticeSelection::groups([Uuid::from_u128(300), Uuid::from_u128(100)]);
        let picked: Vec<u128> = some.select_cards(&cards).iter().map(|c| c.id.as_u128()).collect();
        assert_eq!(picked, vec![1, 3, 4]);
        assert_eq!(some.label(&groups), "Biology, Physics");

        let every = PracticeSelection::groups(groups.iter().map(|g| g.id));
        assert_eq!(every.label(&groups), "All Groups");
    }
}
