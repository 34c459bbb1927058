use crate::{cards_match, Card, Direction, Material, RngState, Suit, FLOWER_COUNT, SEASON_COUNT};
use serde::{Deserialize, Serialize};

/// Two tiles dealt together so the board always holds a match for them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TilePair {
    pub cards: [Card; 2],
    #[serde(default)]
    pub material: Material,
}

impl TilePair {
    pub fn twin(card: Card, material: Material) -> Self {
        Self {
            cards: [card, card],
            material,
        }
    }

    pub fn is_matching(&self) -> bool {
        cards_match(self.cards[0], self.cards[1])
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub pairs: Vec<TilePair>,
}

impl Deck {
    /// The classic 144 tile set as 72 pairs of bone tiles.
    pub fn standard() -> Self {
        let mut pairs = Vec::with_capacity(72);
        let mut twice = |card: Card| {
            pairs.push(TilePair::twin(card, Material::Bone));
            pairs.push(TilePair::twin(card, Material::Bone));
        };
        for suit in Suit::ALL {
            for rank in 1..=9 {
                if let Some(card) = Card::number(suit, rank) {
                    twice(card);
                }
            }
        }
        for dir in Direction::ALL {
            twice(Card::Wind(dir));
        }
        for suit in Suit::ALL {
            twice(Card::Dragon(suit));
        }
        for first in (1..=FLOWER_COUNT).step_by(2) {
            pairs.push(TilePair {
                cards: [Card::Flower(first), Card::Flower(first + 1)],
                material: Material::Bone,
            });
        }
        for first in (1..=SEASON_COUNT).step_by(2) {
            pairs.push(TilePair {
                cards: [Card::Season(first), Card::Season(first + 1)],
                material: Material::Bone,
            });
        }
        Self { pairs }
    }

    pub fn tile_count(&self) -> usize {
        self.pairs.len() * 2
    }

    pub fn add(&mut self, pair: TilePair) {
        self.pairs.push(pair);
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.pairs);
    }
}
