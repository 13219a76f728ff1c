use crate::api::types::IdAllocator;
use crate::components::item::{Card, Rank, Suit};
use crate::core::rng::Rng;

/// A stack of cards owned privately by its table. Cards are drawn from the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const FULL_SIZE: usize = 52;

    /// A full, ordered deck. Every card gets its own id.
    pub fn new(ids: &mut IdAllocator) -> Self {
        let mut cards = Vec::with_capacity(Self::FULL_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(ids.next_id(), suit, rank));
            }
        }
        Self { cards }
    }

    pub fn empty() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn shuffle(&mut self, rng: &mut Rng) {
        rng.shuffle(&mut self.cards);
    }

    /// Take the top card, or `None` when the deck is empty.
    pub fn draw_card(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// The card `draw_card` would return next.
    pub fn peek(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Give every card a fresh id, keeping suit, rank and order.
    pub fn reissue_ids(&mut self, ids: &mut IdAllocator) {
        for card in &mut self.cards {
            card.id = ids.next_id();
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom to top.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
