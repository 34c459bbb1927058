use crate::{
    is_covered, side_freedoms, Card, FreedomClass, Game, Occupancy, Position, SideFreedoms, Tile,
    TileRegistry,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EndCondition {
    EmptyBoard,
    NoPairs,
}

pub fn free_for_class(class: FreedomClass, sides: SideFreedoms) -> bool {
    match class {
        FreedomClass::Unrestricted => true,
        FreedomClass::Relaxed => sides.any(),
        FreedomClass::Standard => sides.left || sides.right,
        FreedomClass::Strict => sides.left && sides.right && sides.open_count() >= 3,
    }
}

pub fn is_position_free(board: &impl Occupancy, pos: Position, class: FreedomClass) -> bool {
    if is_covered(board, pos) {
        return false;
    }
    class == FreedomClass::Unrestricted || free_for_class(class, side_freedoms(board, pos))
}

/// `boost` can only loosen the tile's own rule, never tighten it.
pub fn is_free(registry: &TileRegistry, tile: &Tile, boost: Option<FreedomClass>) -> bool {
    if tile.deleted {
        return false;
    }
    let own = tile.material.freedom_class();
    let class = boost.map_or(own, |boost| own.min(boost));
    is_position_free(registry, tile.position, class)
}

pub fn cards_match(a: Card, b: Card) -> bool {
    match (a, b) {
        (Card::Flower(_), Card::Flower(_)) | (Card::Season(_), Card::Season(_)) => true,
        _ => a == b,
    }
}

pub fn free_tiles(registry: &TileRegistry, boost: Option<FreedomClass>) -> Vec<&Tile> {
    registry
        .live()
        .filter(|tile| is_free(registry, tile, boost))
        .collect()
}

/// Every matching pair among the free tiles, each pair once, in id order.
pub fn available_pairs(registry: &TileRegistry, boost: Option<FreedomClass>) -> Vec<(&Tile, &Tile)> {
    let free = free_tiles(registry, boost);
    let mut pairs = Vec::new();
    for (idx, first) in free.iter().enumerate() {
        for second in &free[idx + 1..] {
            if cards_match(first.card, second.card) {
                pairs.push((*first, *second));
            }
        }
    }
    pairs
}

pub fn game_over_condition(registry: &TileRegistry, game: &Game) -> Option<EndCondition> {
    if registry.live_count() == 0 {
        return Some(EndCondition::EmptyBoard);
    }
    if available_pairs(registry, game.freedom_boost()).is_empty() {
        return Some(EndCondition::NoPairs);
    }
    None
}
