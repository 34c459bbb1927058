use crate::config::{default_family_points, default_material_rule};
use crate::{Card, CardFamily, EmperorDef, Game, GameConfig, Material, Tile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub points: i64,
    pub multiplier: i64,
}

impl Score {
    pub fn total(&self) -> i64 {
        self.points.saturating_mul(self.multiplier)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct MaterialValues {
    points: i64,
    multiplier: i64,
    coins: i64,
}

#[derive(Debug, Clone)]
pub struct ScoreTables {
    family_points: HashMap<CardFamily, i64>,
    materials: HashMap<Material, MaterialValues>,
}

impl ScoreTables {
    pub fn from_config(config: &GameConfig) -> Self {
        let family_points = config
            .families
            .iter()
            .map(|rule| (rule.family, rule.points))
            .collect();
        let materials = config
            .materials
            .iter()
            .map(|rule| {
                (
                    rule.material,
                    MaterialValues {
                        points: rule.points,
                        multiplier: rule.multiplier,
                        coins: rule.coins,
                    },
                )
            })
            .collect();
        Self {
            family_points,
            materials,
        }
    }

    pub fn card_points(&self, card: Card) -> i64 {
        let family = card.family();
        self.family_points
            .get(&family)
            .copied()
            .unwrap_or_else(|| default_family_points(family))
    }

    fn material(&self, material: Material) -> MaterialValues {
        self.materials.get(&material).copied().unwrap_or_else(|| {
            let (points, multiplier, coins) = default_material_rule(material);
            MaterialValues {
                points,
                multiplier,
                coins,
            }
        })
    }

    pub fn material_points(&self, material: Material) -> i64 {
        self.material(material).points
    }

    pub fn material_multiplier(&self, material: Material) -> i64 {
        self.material(material).multiplier
    }

    pub fn material_coins(&self, material: Material) -> i64 {
        self.material(material).coins
    }
}

impl Default for ScoreTables {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Points are summed over the tiles, the multiplier is shared by all of them.
/// Every emperor is evaluated for every tile.
pub fn get_points(
    game: &Game,
    tiles: &[Tile],
    emperors: &[EmperorDef],
    tables: &ScoreTables,
) -> Score {
    let mut score = Score {
        points: 0,
        multiplier: 1 + game.dragon_combo() + game.phoenix_combo() + game.rabbit_combo(),
    };
    for tile in tiles {
        score.points += tables.card_points(tile.card) + tables.material_points(tile.material);
        score.multiplier += tables.material_multiplier(tile.material);
        for emperor in emperors {
            let bonus = emperor.bonus(tile.card, tile.material);
            score.points += bonus.points;
            score.multiplier += bonus.multiplier;
        }
    }
    score
}

pub fn get_coins(game: &Game, tiles: &[Tile], score: Score, tables: &ScoreTables) -> i64 {
    let material_coins: i64 = tiles
        .iter()
        .map(|tile| tables.material_coins(tile.material))
        .sum();
    score.total().saturating_mul(game.rabbit_combo()) + material_coins
}
