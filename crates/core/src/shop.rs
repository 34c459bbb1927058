use crate::{Catalogue, EmperorDef, GameConfig, Material, RngState, ShopRule, TilePair};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopItem {
    TilePair(TilePair),
    MaterialUpgrade(Material),
    Emperor(EmperorDef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItemKind {
    TilePair,
    MaterialUpgrade(Material),
    Emperor,
}

impl ShopItem {
    pub fn kind(&self) -> ShopItemKind {
        match self {
            ShopItem::TilePair(_) => ShopItemKind::TilePair,
            ShopItem::MaterialUpgrade(material) => ShopItemKind::MaterialUpgrade(*material),
            ShopItem::Emperor(_) => ShopItemKind::Emperor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopOffer {
    pub item: ShopItem,
    pub price: i64,
}

#[derive(Debug, Clone)]
pub struct ShopState {
    pub offers: Vec<ShopOffer>,
    pub reroll_cost: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("shop not available")]
    Closed,
    #[error("invalid shop offer index {0}")]
    InvalidOffer(usize),
    #[error("not enough coins: have {coins}, need {price}")]
    NotEnoughCoins { price: i64, coins: i64 },
}

impl ShopState {
    pub fn generate(
        config: &GameConfig,
        catalogue: &Catalogue,
        owned: &[EmperorDef],
        rng: &mut RngState,
    ) -> Self {
        Self {
            offers: generate_offers(config, catalogue, owned, rng),
            reroll_cost: config.shop.prices.reroll_base,
        }
    }

    /// Replaces every offer, charging the current reroll cost first.
    pub fn reroll(
        &mut self,
        config: &GameConfig,
        catalogue: &Catalogue,
        owned: &[EmperorDef],
        rng: &mut RngState,
        coins: &mut i64,
    ) -> Result<i64, ShopError> {
        let cost = self.reroll_cost;
        charge(coins, cost)?;
        self.offers = generate_offers(config, catalogue, owned, rng);
        self.reroll_cost += config.shop.prices.reroll_step;
        Ok(cost)
    }

    pub fn offer(&self, index: usize) -> Result<&ShopOffer, ShopError> {
        self.offers.get(index).ok_or(ShopError::InvalidOffer(index))
    }

    pub fn buy(&mut self, index: usize, coins: &mut i64) -> Result<ShopOffer, ShopError> {
        let price = self.offer(index)?.price;
        charge(coins, price)?;
        Ok(self.offers.remove(index))
    }
}

fn charge(coins: &mut i64, price: i64) -> Result<(), ShopError> {
    if *coins < price {
        return Err(ShopError::NotEnoughCoins {
            price,
            coins: *coins,
        });
    }
    *coins -= price;
    Ok(())
}

fn generate_offers(
    config: &GameConfig,
    catalogue: &Catalogue,
    owned: &[EmperorDef],
    rng: &mut RngState,
) -> Vec<ShopOffer> {
    let rule: &ShopRule = &config.shop;
    let mut offers = Vec::new();
    for _ in 0..rule.tile_slots {
        if let Some(pair) = catalogue.pick_tile_pair(rng) {
            offers.push(ShopOffer {
                item: ShopItem::TilePair(pair),
                price: rule.prices.tile_pair,
            });
        }
    }
    for _ in 0..rule.upgrade_slots {
        if let Some(upgrade) = rng.pick(&rule.prices.upgrades) {
            offers.push(ShopOffer {
                item: ShopItem::MaterialUpgrade(upgrade.material),
                price: upgrade.price,
            });
        }
    }
    let mut taken: Vec<EmperorDef> = owned.to_vec();
    for _ in 0..rule.emperor_slots {
        if let Some(emperor) = catalogue.pick_emperor(&taken, rng) {
            let price = emperor.price.unwrap_or(rule.prices.emperor);
            taken.push(emperor.clone());
            offers.push(ShopOffer {
                item: ShopItem::Emperor(emperor.clone()),
                price,
            });
        }
    }
    offers
}
