use crate::{
    is_position_free, Bounds, Card, Deck, Material, Position, RngState, Slot, Tile, TileId,
    TileRegistry,
};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

pub const GENERATE_ATTEMPTS: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    #[error("layout has an odd number of slots ({0})")]
    OddSlotCount(usize),
    #[error("deck holds {available} tiles, layout needs {needed}")]
    DeckTooSmall { needed: usize, available: usize },
    #[error("no solvable deal found after {attempts} attempts")]
    Stuck { attempts: usize },
}

/// Deals `deck` onto `slots` by playing the board backwards: two free slots
/// at a time receive the next pair and leave the board, so every deal can be
/// cleared by replaying those removals.
pub fn generate_board(
    slots: &[Slot],
    deck: &Deck,
    rng: &mut RngState,
) -> Result<TileRegistry, GenerateError> {
    if slots.len() % 2 != 0 {
        return Err(GenerateError::OddSlotCount(slots.len()));
    }
    if deck.tile_count() < slots.len() {
        return Err(GenerateError::DeckTooSmall {
            needed: slots.len(),
            available: deck.tile_count(),
        });
    }

    for attempt in 1..=GENERATE_ATTEMPTS {
        let mut registry = dummy_board(slots);
        let mut pairs = deck.clone();
        pairs.shuffle(rng);
        if deal(&mut registry, &pairs, rng) {
            debug!(attempt, tiles = slots.len(), "board generated");
            return Ok(registry);
        }
        warn!(attempt, "deal got stuck, retrying");
    }
    Err(GenerateError::Stuck {
        attempts: GENERATE_ATTEMPTS,
    })
}

fn dummy_board(slots: &[Slot]) -> TileRegistry {
    let tiles = slots.iter().enumerate().map(|(idx, slot)| {
        Tile::new(
            TileId(idx as u32 + 1),
            Card::Dummy,
            Material::Bone,
            slot.position,
        )
    });
    let mut registry = TileRegistry::from_tiles(tiles);
    registry.set_bounds(Bounds::around(slots.iter().map(|slot| slot.position)));
    registry
}

fn deal(registry: &mut TileRegistry, deck: &Deck, rng: &mut RngState) -> bool {
    let mut remaining: HashSet<Position> = registry.iter().map(|tile| tile.position).collect();
    let ids: Vec<(TileId, Position)> = registry.iter().map(|tile| (tile.id, tile.position)).collect();

    for pair in &deck.pairs {
        if remaining.is_empty() {
            break;
        }
        // The pair has to be removable under its own material's rule.
        let class = pair.material.freedom_class();
        let mut free: Vec<(TileId, Position)> = ids
            .iter()
            .copied()
            .filter(|(_, pos)| remaining.contains(pos) && is_position_free(&remaining, *pos, class))
            .collect();
        if free.len() < 2 {
            return false;
        }
        for card in pair.cards {
            let (id, pos) = free.swap_remove(rng.below(free.len()));
            remaining.remove(&pos);
            registry.update(id, |tile| {
                tile.card = card;
                tile.material = pair.material;
            });
        }
    }
    remaining.is_empty()
}
