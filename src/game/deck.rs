//! Deck construction and shuffling.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Shared by exactly two cards in a round
    pub symbol: String,
    /// Index on the board
    pub position: usize,
    /// Face up, waiting to be judged or shown as a mismatch
    pub is_flipped: bool,
    /// Part of a found pair (stays face up)
    pub is_matched: bool,
}

impl Card {
    pub fn new(symbol: impl Into<String>, position: usize) -> Self {
        Self {
            symbol: symbol.into(),
            position,
            is_flipped: false,
            is_matched: false,
        }
    }

    /// Whether the face should be shown
    pub fn is_face_up(&self) -> bool {
        self.is_flipped || self.is_matched
    }
}

/// Drop repeated symbols, keeping first occurrences in order
pub fn unique_symbols<S: AsRef<str>>(symbols: &[S]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let symbol = symbol.as_ref();
        if !unique.iter().any(|s| s == symbol) {
            unique.push(symbol.to_string());
        }
    }
    unique
}

/// Every unique symbol twice, unshuffled: `[a, b, .., a, b, ..]`
pub fn paired_layout<S: AsRef<str>>(symbols: &[S]) -> Vec<String> {
    let unique = unique_symbols(symbols);
    let mut layout = Vec::with_capacity(unique.len() * 2);
    layout.extend(unique.iter().cloned());
    layout.extend(unique);
    layout
}

/// Cards in the given order, all face down
pub fn cards_from_layout<S: AsRef<str>>(layout: &[S]) -> Vec<Card> {
    layout
        .iter()
        .enumerate()
        .map(|(position, symbol)| Card::new(symbol.as_ref(), position))
        .collect()
}

/// Build a shuffled deck of `2 * N` cards for `N` unique symbols.
///
/// `SliceRandom::shuffle` is a Fisher-Yates shuffle, so every arrangement
/// is equally likely for a uniform RNG.
pub fn build_deck<S: AsRef<str>, R: Rng + ?Sized>(symbols: &[S], rng: &mut R) -> Vec<Card> {
    let mut layout = paired_layout(symbols);
    layout.shuffle(rng);
    cards_from_layout(&layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[test]
    fn test_duplicate_symbols_collapse() {
        let unique = unique_symbols(&["A", "B", "A", "C", "B"]);
        assert_eq!(unique, vec!["A", "B", "C"]);
        assert_eq!(paired_layout(&["A", "A", "B"]), vec!["A", "B", "A", "B"]);
    }

    #[test]
    fn test_positions_match_indices() {
        let mut rng = Pcg32::seed_from_u64(7);
        let deck = build_deck(&["A", "B", "C"], &mut rng);
        for (i, card) in deck.iter().enumerate() {
            assert_eq!(card.position, i);
            assert!(!card.is_flipped);
            assert!(!card.is_matched);
        }
    }

    #[test]
    fn test_empty_symbols_give_empty_deck() {
        let mut rng = Pcg32::seed_from_u64(1);
        let empty: [&str; 0] = [];
        assert!(build_deck(&empty, &mut rng).is_empty());
    }

    #[test]
    fn test_same_seed_same_deck() {
        let symbols = ["A", "B", "C", "D"];
        let a = build_deck(&symbols, &mut Pcg32::seed_from_u64(42));
        let b = build_deck(&symbols, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shuffle_reaches_every_arrangement_evenly() {
        // Two pairs have 4!/(2!*2!) = 6 distinct arrangements
        const ROUNDS: u64 = 6000;
        let mut counts: HashMap<String, u32> = HashMap::new();
        for seed in 0..ROUNDS {
            let mut rng = Pcg32::seed_from_u64(seed);
            let deck = build_deck(&["A", "B"], &mut rng);
            let key: String = deck.iter().map(|c| c.symbol.as_str()).collect();
            *counts.entry(key).or_default() += 1;
        }

        assert_eq!(counts.len(), 6, "arrangements seen: {:?}", counts);
        let expected = (ROUNDS / 6) as u32;
        for (arrangement, count) in &counts {
            assert!(
                count.abs_diff(expected) < expected / 5,
                "{} appeared {} times, expected about {}",
                arrangement,
                count,
                expected
            );
        }
    }

    proptest! {
        #[test]
        fn prop_every_symbol_appears_exactly_twice(pairs in 1usize..20, seed in any::<u64>()) {
            let symbols: Vec<String> = (0..pairs).map(|i| format!("s{i}")).collect();
            let mut rng = Pcg32::seed_from_u64(seed);
            let deck = build_deck(&symbols, &mut rng);

            prop_assert_eq!(deck.len(), pairs * 2);
            for symbol in &symbols {
                prop_assert_eq!(deck.iter().filter(|c| &c.symbol == symbol).count(), 2);
            }
        }
    }
}
