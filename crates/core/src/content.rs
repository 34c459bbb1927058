use crate::{
    Bonus, Card, Direction, EmperorEffect, Material, RngState, TilePair, PHOENIX_COUNT,
    RABBIT_COUNT,
};
use serde::{Deserialize, Serialize};

/// A scoring modifier. Its effects are evaluated for every scored tile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmperorDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub price: Option<i64>,
    pub effects: Vec<EmperorEffect>,
}

impl EmperorDef {
    pub fn bonus(&self, card: Card, material: Material) -> Bonus {
        let mut bonus = Bonus::default();
        for effect in &self.effects {
            effect.apply(card, material, &mut bonus);
        }
        bonus
    }
}

/// Everything the shop can offer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub emperors: Vec<EmperorDef>,
    #[serde(default)]
    pub tile_pool: Vec<TilePair>,
}

impl Catalogue {
    pub fn with_default_pool(emperors: Vec<EmperorDef>) -> Self {
        Self {
            emperors,
            tile_pool: default_tile_pool(),
        }
    }

    pub fn emperor_by_id(&self, id: &str) -> Option<&EmperorDef> {
        self.emperors.iter().find(|emperor| emperor.id == id)
    }

    pub fn pick_emperor<'a>(
        &'a self,
        owned: &[EmperorDef],
        rng: &mut RngState,
    ) -> Option<&'a EmperorDef> {
        let candidates: Vec<&EmperorDef> = self
            .emperors
            .iter()
            .filter(|emperor| owned.iter().all(|item| item.id != emperor.id))
            .collect();
        rng.pick(&candidates).copied()
    }

    pub fn pick_tile_pair(&self, rng: &mut RngState) -> Option<TilePair> {
        rng.pick(&self.tile_pool).copied()
    }
}

/// Special tiles that never appear in the standard deck.
pub fn default_tile_pool() -> Vec<TilePair> {
    let mut pool = Vec::new();
    for n in 1..=RABBIT_COUNT {
        pool.push(TilePair::twin(Card::Rabbit(n), Material::Bone));
    }
    for n in 1..=PHOENIX_COUNT {
        pool.push(TilePair::twin(Card::Phoenix(n), Material::Bone));
    }
    for dir in Direction::ALL {
        pool.push(TilePair::twin(Card::Transport(dir), Material::Bone));
    }
    for n in 1..=6 {
        pool.push(TilePair::twin(Card::Mutation(n), Material::Bone));
    }
    pool.push(TilePair::twin(Card::Joker, Material::Bone));
    pool
}
