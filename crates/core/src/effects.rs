use crate::{Card, CardFamily, FreedomClass, Material, Suit};
use serde::{Deserialize, Serialize};

/// Predicate over a single scored tile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TileCondition {
    Always,
    Family(CardFamily),
    Suit(Suit),
    Rank(u8),
    Card(Card),
    Material(Material),
    FreedomClass(FreedomClass),
}

impl TileCondition {
    pub fn holds(&self, card: Card, material: Material) -> bool {
        match self {
            TileCondition::Always => true,
            TileCondition::Family(family) => card.family() == *family,
            TileCondition::Suit(suit) => card.suit() == Some(*suit),
            TileCondition::Rank(rank) => card.rank() == Some(*rank),
            TileCondition::Card(expected) => card == *expected,
            TileCondition::Material(expected) => material == *expected,
            TileCondition::FreedomClass(class) => material.freedom_class() == *class,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Contribution {
    Points(i64),
    Multiplier(i64),
}

/// Raw points and multiplier added on top of the base tables.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bonus {
    pub points: i64,
    pub multiplier: i64,
}

impl Bonus {
    pub fn add(&mut self, contribution: Contribution) {
        match contribution {
            Contribution::Points(value) => self.points += value,
            Contribution::Multiplier(value) => self.multiplier += value,
        }
    }
}

/// All conditions must hold for the contributions to apply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmperorEffect {
    #[serde(default)]
    pub conditions: Vec<TileCondition>,
    pub contributions: Vec<Contribution>,
}

impl EmperorEffect {
    pub fn apply(&self, card: Card, material: Material, bonus: &mut Bonus) {
        if self
            .conditions
            .iter()
            .all(|condition| condition.holds(card, material))
        {
            for contribution in &self.contributions {
                bonus.add(*contribution);
            }
        }
    }
}
