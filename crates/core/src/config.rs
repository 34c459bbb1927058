use crate::{CardFamily, Material};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyRule {
    pub family: CardFamily,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRule {
    pub material: Material,
    pub points: i64,
    #[serde(default)]
    pub multiplier: i64,
    #[serde(default)]
    pub coins: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradePrice {
    pub material: Material,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopPrices {
    pub tile_pair: i64,
    pub emperor: i64,
    pub upgrades: Vec<UpgradePrice>,
    pub reroll_base: i64,
    pub reroll_step: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopRule {
    pub tile_slots: u8,
    pub upgrade_slots: u8,
    pub emperor_slots: u8,
    pub prices: ShopPrices,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub families: Vec<FamilyRule>,
    #[serde(default)]
    pub materials: Vec<MaterialRule>,
    #[serde(default = "default_emperor_slots")]
    pub emperor_slots: usize,
    #[serde(default = "default_shop_rule")]
    pub shop: ShopRule,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            families: CardFamily::ALL
                .into_iter()
                .map(|family| FamilyRule {
                    family,
                    points: default_family_points(family),
                })
                .collect(),
            materials: Material::ALL
                .into_iter()
                .map(|material| {
                    let (points, multiplier, coins) = default_material_rule(material);
                    MaterialRule {
                        material,
                        points,
                        multiplier,
                        coins,
                    }
                })
                .collect(),
            emperor_slots: default_emperor_slots(),
            shop: default_shop_rule(),
        }
    }
}

pub(crate) fn default_family_points(family: CardFamily) -> i64 {
    match family {
        CardFamily::Numbered => 1,
        CardFamily::Dragon | CardFamily::Dummy => 0,
        CardFamily::Flower
        | CardFamily::Season
        | CardFamily::Rabbit
        | CardFamily::Phoenix
        | CardFamily::Mutation => 2,
        CardFamily::Wind => 4,
        CardFamily::Joker | CardFamily::Transport => 8,
    }
}

/// `(points, multiplier, coins)` per material.
pub(crate) fn default_material_rule(material: Material) -> (i64, i64, i64) {
    match material {
        Material::Bone | Material::Ivory => (0, 0, 0),
        Material::Wood => (2, 0, 0),
        Material::Glass => (4, 1, 0),
        Material::Amber => (6, 1, 0),
        Material::Bronze => (8, 0, 5),
        Material::Jade => (16, 2, 0),
        Material::Diamond => (24, 3, 0),
        Material::Gold => (32, 4, 20),
    }
}

fn default_emperor_slots() -> usize {
    3
}

fn default_shop_rule() -> ShopRule {
    ShopRule {
        tile_slots: 2,
        upgrade_slots: 1,
        emperor_slots: 1,
        prices: ShopPrices {
            tile_pair: 10,
            emperor: 40,
            upgrades: [
                (Material::Wood, 8),
                (Material::Glass, 12),
                (Material::Bronze, 15),
                (Material::Jade, 30),
                (Material::Gold, 50),
            ]
            .into_iter()
            .map(|(material, price)| UpgradePrice { material, price })
            .collect(),
            reroll_base: 5,
            reroll_step: 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{ "families": [{ "family": "wind", "points": 6 }] }"#)
                .expect("parse");
        assert_eq!(config.families.len(), 1);
        assert!(config.materials.is_empty());
        assert_eq!(config.emperor_slots, 3);
        assert_eq!(config.shop.prices.reroll_base, 5);
    }
}
