use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_shoe, Card};
use crate::errors::EngineError;

/// A multi-deck card source with a draw cursor.
///
/// The seed is the only source of randomness, so two shoes built from the same
/// seed hand out the same cards in the same order. A shoe is never reshuffled;
/// running out of cards is an [`EngineError::ShoeExhausted`].
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    position: usize,
}

impl Shoe {
    pub fn new(seed: u64, num_decks: usize) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut cards = full_shoe(num_decks);
        cards.shuffle(&mut rng);
        Self { cards, position: 0 }
    }

    /// A shoe that deals `cards` in the given order. Used to replay a known
    /// deal and to set up exact scenarios.
    pub fn stacked(cards: Vec<Card>) -> Self {
        Self { cards, position: 0 }
    }

    pub fn draw(&mut self) -> Result<Card, EngineError> {
        let card = self
            .cards
            .get(self.position)
            .copied()
            .ok_or(EngineError::ShoeExhausted {
                dealt: self.position,
            })?;
        self.position += 1;
        Ok(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }

    pub fn dealt(&self) -> usize {
        self.position
    }
}
