use crate::{Direction, EndCondition, RunKind, ShopItemKind, Suit, TileId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    BoardDealt {
        tiles: usize,
        seed: u64,
    },
    TileSelected { id: TileId },
    TileDeselected { id: TileId },
    PairMissed { first: TileId, second: TileId },
    PairMatched {
        first: TileId,
        second: TileId,
        points: i64,
        multiplier: i64,
        coins: i64,
    },
    RunStarted { kind: RunKind },
    RunAdvanced { kind: RunKind, combo: i64 },
    RunEnded { kind: RunKind, combo: i64 },
    WindBlew { direction: Direction, moved: usize },
    TilesMutated { from: Suit, to: Suit, count: usize },
    TilesShuffled { count: usize },
    GameEnded {
        condition: EndCondition,
        points: i64,
    },
    ShopEntered {
        offers: usize,
        reroll_cost: i64,
        reentered: bool,
    },
    ShopRerolled {
        offers: usize,
        reroll_cost: i64,
        cost: i64,
        coins: i64,
    },
    ShopBought {
        item: ShopItemKind,
        cost: i64,
        coins: i64,
    },
    EmperorSold {
        id: String,
        value: i64,
        coins: i64,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<Event>,
}

impl EventBus {
    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
