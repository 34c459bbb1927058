//! Board-wide effects fired by wind, mutation and joker matches.

use crate::board::NEIGHBOURHOOD;
use crate::{
    has_support, is_covered, Card, Direction, Position, RngState, Suit, TileId, TileRegistry, CELL,
};
use tracing::trace;

/// Pushes every uncovered live tile one cell towards `direction`. Tiles
/// nearest the leading edge move first; a tile stays put when the move would
/// leave the board bounds, overlap another tile on its level or lose support.
pub fn blow_wind(registry: &mut TileRegistry, direction: Direction) -> usize {
    let Some(bounds) = registry.bounds() else {
        return 0;
    };
    let (dx, dy) = direction.delta();
    let mut order: Vec<(TileId, Position)> = registry
        .live()
        .map(|tile| (tile.id, tile.position))
        .collect();
    order.sort_by_key(|(id, pos)| (pos.z, -(pos.x * dx + pos.y * dy), *id));

    let mut moved = 0;
    for (id, pos) in order {
        if is_covered(registry, pos) {
            continue;
        }
        let target = pos.offset(dx * CELL, dy * CELL, 0);
        if !bounds.contains(target) || !has_support(registry, target) {
            continue;
        }
        let blocked = NEIGHBOURHOOD.iter().any(|&(ox, oy)| {
            registry
                .live_at(target.offset(ox, oy, 0))
                .any(|other| other.id != id)
        });
        if blocked {
            continue;
        }
        registry.update(id, |tile| tile.position = target);
        moved += 1;
    }
    trace!(?direction, moved, "wind displacement");
    moved
}

/// Rewrites every live tile of suit `from` to suit `to`.
pub fn mutate_suit(registry: &mut TileRegistry, from: Suit, to: Suit) -> usize {
    let targets: Vec<TileId> = registry
        .live()
        .filter(|tile| tile.card.suit() == Some(from))
        .map(|tile| tile.id)
        .collect();
    for id in &targets {
        registry.update(*id, |tile| tile.card = tile.card.with_suit(to));
    }
    targets.len()
}

/// Deals the live cards back out over the same positions.
pub fn shuffle_live(registry: &mut TileRegistry, rng: &mut RngState) -> usize {
    let (ids, mut cards): (Vec<TileId>, Vec<Card>) =
        registry.live().map(|tile| (tile.id, tile.card)).unzip();
    rng.shuffle(&mut cards);
    for (id, card) in ids.iter().zip(cards) {
        registry.update(*id, |tile| tile.card = card);
    }
    ids.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Material, Tile};

    fn tile(id: u32, card: &str, x: i32, y: i32, z: i32) -> Tile {
        Tile::new(
            TileId(id),
            card.parse().expect("card"),
            Material::Bone,
            Position::new(x, y, z),
        )
    }

    fn position(registry: &TileRegistry, id: u32) -> Position {
        registry.get(TileId(id)).expect("tile").position
    }

    #[test]
    fn wind_compacts_a_row_against_the_edge() {
        let mut registry = TileRegistry::from_tiles([
            tile(1, "b1", 0, 0, 0),
            tile(2, "b2", 4, 0, 0),
            tile(3, "b3", 8, 0, 0),
        ]);
        let moved = blow_wind(&mut registry, Direction::West);
        assert_eq!(moved, 2);
        assert_eq!(position(&registry, 1), Position::new(0, 0, 0));
        assert_eq!(position(&registry, 2), Position::new(2, 0, 0));
        assert_eq!(position(&registry, 3), Position::new(6, 0, 0));
    }

    #[test]
    fn wind_leaves_covered_and_unsupported_tiles() {
        let mut registry = TileRegistry::from_tiles([
            tile(1, "b1", 0, 0, 0),
            tile(2, "b2", 2, 0, 0),
            tile(3, "b3", 2, 0, 1),
            tile(4, "b4", 0, 2, 0),
        ]);
        blow_wind(&mut registry, Direction::West);
        assert_eq!(position(&registry, 2), Position::new(2, 0, 0));
        // (0,0,1) is fully supported by tile 1.
        assert_eq!(position(&registry, 3), Position::new(0, 0, 1));

        // Tile 4 sits on the south edge; tile 3 slides onto it.
        let moved = blow_wind(&mut registry, Direction::South);
        assert_eq!(moved, 2);
        assert_eq!(position(&registry, 4), Position::new(0, 2, 0));
        assert_eq!(position(&registry, 2), Position::new(2, 2, 0));
        assert_eq!(position(&registry, 3), Position::new(0, 2, 1));
    }

    #[test]
    fn mutation_rewrites_only_live_tiles_of_the_suit() {
        let mut registry = TileRegistry::from_tiles([
            tile(1, "b1", 0, 0, 0),
            tile(2, "db", 2, 0, 0),
            tile(3, "c3", 4, 0, 0),
            tile(4, "b9", 6, 0, 0),
        ]);
        registry.update(TileId(4), |tile| tile.deleted = true);
        assert_eq!(mutate_suit(&mut registry, Suit::Bam, Suit::Dot), 2);
        let card = |id: u32| registry.get(TileId(id)).expect("tile").card.to_string();
        assert_eq!(card(1), "o1");
        assert_eq!(card(2), "do");
        assert_eq!(card(3), "c3");
        assert_eq!(card(4), "b9");
    }

    #[test]
    fn shuffle_keeps_the_multiset_of_cards() {
        let build = || {
            TileRegistry::from_tiles([
                tile(1, "b1", 0, 0, 0),
                tile(2, "c2", 2, 0, 0),
                tile(3, "o3", 4, 0, 0),
                tile(4, "wn", 6, 0, 0),
                tile(5, "jk", 8, 0, 0),
            ])
        };
        let mut a = build();
        let mut b = build();
        assert_eq!(shuffle_live(&mut a, &mut RngState::from_seed(11)), 5);
        shuffle_live(&mut b, &mut RngState::from_seed(11));
        let cards = |registry: &TileRegistry| -> Vec<Card> {
            registry.iter().map(|tile| tile.card).collect()
        };
        assert_eq!(cards(&a), cards(&b));
        let mut sorted = cards(&a);
        sorted.sort();
        let mut original = cards(&build());
        original.sort();
        assert_eq!(sorted, original);
    }
}
