use super::*;
use crate::{ShopItem, ShopOffer};

impl Session {
    pub fn enter_shop(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        if !self.game.is_over() {
            return Err(SessionError::BoardInPlay);
        }
        if let Some(shop) = self.shop.as_ref() {
            events.push(Event::ShopEntered {
                offers: shop.offers.len(),
                reroll_cost: shop.reroll_cost,
                reentered: true,
            });
            return Ok(());
        }
        let shop = ShopState::generate(
            &self.config,
            &self.catalogue,
            &self.inventory.emperors,
            &mut self.rng,
        );
        events.push(Event::ShopEntered {
            offers: shop.offers.len(),
            reroll_cost: shop.reroll_cost,
            reentered: false,
        });
        self.shop = Some(shop);
        Ok(())
    }

    pub fn reroll_shop(&mut self, events: &mut EventBus) -> Result<(), SessionError> {
        let shop = self.shop.as_mut().ok_or(ShopError::Closed)?;
        let cost = shop.reroll(
            &self.config,
            &self.catalogue,
            &self.inventory.emperors,
            &mut self.rng,
            &mut self.game.coins,
        )?;
        events.push(Event::ShopRerolled {
            offers: shop.offers.len(),
            reroll_cost: shop.reroll_cost,
            cost,
            coins: self.game.coins,
        });
        Ok(())
    }

    /// Buys offer `index`. Material upgrades rewrite the deck pair at
    /// `target`, so they show up from the next board on; the purchase is
    /// refused before any coins move when that pair does not exist.
    pub fn buy_offer(
        &mut self,
        index: usize,
        target: Option<usize>,
        events: &mut EventBus,
    ) -> Result<ShopItem, SessionError> {
        let shop = self.shop.as_mut().ok_or(ShopError::Closed)?;
        match &shop.offer(index)?.item {
            ShopItem::MaterialUpgrade(_) => {
                if !target.is_some_and(|pair| pair < self.deck.pairs.len()) {
                    return Err(SessionError::UpgradeTarget(target));
                }
            }
            ShopItem::Emperor(_) if self.inventory.emperors.len() >= self.inventory.emperor_slots => {
                return Err(InventoryError::NoEmperorSlots.into());
            }
            _ => {}
        }
        let ShopOffer { item, price } = shop.buy(index, &mut self.game.coins)?;
        match &item {
            ShopItem::TilePair(pair) => self.deck.add(*pair),
            ShopItem::MaterialUpgrade(material) => {
                if let Some(pair) = target.and_then(|pair| self.deck.pairs.get_mut(pair)) {
                    pair.material = *material;
                }
            }
            ShopItem::Emperor(emperor) => self.inventory.add_emperor(emperor.clone())?,
        }
        events.push(Event::ShopBought {
            item: item.kind(),
            cost: price,
            coins: self.game.coins,
        });
        Ok(item)
    }

    /// Half the emperor's buy price, never less than one coin.
    pub fn emperor_sell_value(&self, index: usize) -> Option<i64> {
        self.inventory.emperors.get(index).map(|emperor| {
            let price = emperor.price.unwrap_or(self.config.shop.prices.emperor);
            (price.max(0) / 2).max(1)
        })
    }

    pub fn sell_emperor(
        &mut self,
        index: usize,
        events: &mut EventBus,
    ) -> Result<i64, SessionError> {
        let value = self
            .emperor_sell_value(index)
            .ok_or(InventoryError::InvalidEmperorIndex(index))?;
        let emperor = self.inventory.remove_emperor(index)?;
        self.game.coins += value;
        events.push(Event::EmperorSold {
            id: emperor.id,
            value,
            coins: self.game.coins,
        });
        Ok(value)
    }

    pub fn leave_shop(&mut self) {
        self.shop = None;
    }
}
