use crate::{Bounds, Card, Material, Occupancy, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub card: Card,
    #[serde(default)]
    pub material: Material,
    pub position: Position,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub coins: Option<i64>,
}

impl Tile {
    pub fn new(id: TileId, card: Card, material: Material, position: Position) -> Self {
        Self {
            id,
            card,
            material,
            position,
            deleted: false,
            selected: false,
            points: None,
            coins: None,
        }
    }

    pub fn is_live(&self) -> bool {
        !self.deleted
    }
}

/// Exact-value conjunction over the indexed tile fields. `None` fields are
/// unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileFilter {
    pub position: Option<Position>,
    pub deleted: Option<bool>,
    pub selected: Option<bool>,
    pub card: Option<Card>,
}

impl TileFilter {
    pub fn live() -> Self {
        Self {
            deleted: Some(false),
            ..Self::default()
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    pub fn card(mut self, card: Card) -> Self {
        self.card = Some(card);
        self
    }

    pub fn matches(&self, tile: &Tile) -> bool {
        self.position.map_or(true, |pos| tile.position == pos)
            && self.deleted.map_or(true, |flag| tile.deleted == flag)
            && self.selected.map_or(true, |flag| tile.selected == flag)
            && self.card.map_or(true, |card| tile.card == card)
    }
}

pub type Listener = Box<dyn FnMut(&[TileId])>;

/// Keyed tile store with secondary indexes on position, lifecycle flags and
/// card. It does not police board invariants; generation does.
#[derive(Default)]
pub struct TileRegistry {
    tiles: BTreeMap<TileId, Tile>,
    by_position: HashMap<Position, BTreeSet<TileId>>,
    by_deleted: HashMap<bool, BTreeSet<TileId>>,
    by_selected: HashMap<bool, BTreeSet<TileId>>,
    by_card: HashMap<Card, BTreeSet<TileId>>,
    bounds: Option<Bounds>,
    listeners: Vec<Listener>,
    batch_depth: usize,
    pending: BTreeSet<TileId>,
    revision: u64,
}

impl fmt::Debug for TileRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileRegistry")
            .field("tiles", &self.tiles.len())
            .field("bounds", &self.bounds)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry and pins its bounds around the given tiles.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut registry = Self::new();
        for tile in tiles {
            registry.set(tile);
        }
        registry.bounds = Bounds::around(registry.tiles.values().map(|tile| tile.position));
        registry
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Option<Bounds>) {
        self.bounds = bounds;
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of notifications delivered so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.values()
    }

    pub fn live(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.ids_for(&self.by_deleted, &false)
            .filter_map(|id| self.tiles.get(id))
    }

    pub fn live_count(&self) -> usize {
        self.by_deleted.get(&false).map_or(0, BTreeSet::len)
    }

    /// First live tile currently marked selected.
    pub fn selected(&self) -> Option<&Tile> {
        self.ids_for(&self.by_selected, &true)
            .filter_map(|id| self.tiles.get(id))
            .find(|tile| tile.is_live())
    }

    pub fn live_at(&self, pos: Position) -> impl Iterator<Item = &Tile> + '_ {
        self.ids_for(&self.by_position, &pos)
            .filter_map(|id| self.tiles.get(id))
            .filter(|tile| tile.is_live())
    }

    /// Upserts `tile`, keeping every index in step.
    pub fn set(&mut self, tile: Tile) {
        let id = tile.id;
        if let Some(old) = self.tiles.remove(&id) {
            self.unindex(&old);
        }
        self.index(&tile);
        self.tiles.insert(id, tile);
        self.touch(id);
    }

    /// Applies `change` to a stored tile. Returns `None` for unknown ids.
    pub fn update<R>(&mut self, id: TileId, change: impl FnOnce(&mut Tile) -> R) -> Option<R> {
        let mut tile = self.tiles.remove(&id)?;
        self.unindex(&tile);
        let out = change(&mut tile);
        tile.id = id;
        self.index(&tile);
        self.tiles.insert(id, tile);
        self.touch(id);
        Some(out)
    }

    pub fn del(&mut self, id: TileId) -> Option<Tile> {
        let tile = self.tiles.remove(&id)?;
        self.unindex(&tile);
        self.touch(id);
        Some(tile)
    }

    pub fn filter_by(&self, filter: &TileFilter) -> Vec<&Tile> {
        let lookups = [
            filter.position.map(|pos| self.by_position.get(&pos)),
            filter.deleted.map(|flag| self.by_deleted.get(&flag)),
            filter.selected.map(|flag| self.by_selected.get(&flag)),
            filter.card.map(|card| self.by_card.get(&card)),
        ];
        let mut smallest: Option<&BTreeSet<TileId>> = None;
        for lookup in lookups.into_iter().flatten() {
            let Some(ids) = lookup else {
                return Vec::new();
            };
            if smallest.map_or(true, |best| ids.len() < best.len()) {
                smallest = Some(ids);
            }
        }
        match smallest {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.tiles.get(id))
                .filter(|tile| filter.matches(tile))
                .collect(),
            None => self.tiles.values().collect(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    /// Runs `apply` with notifications held back, then notifies once with
    /// every id touched inside.
    pub fn batch<R>(&mut self, apply: impl FnOnce(&mut Self) -> R) -> R {
        self.batch_depth += 1;
        let out = apply(self);
        self.batch_depth -= 1;
        if self.batch_depth == 0 && !self.pending.is_empty() {
            let changed: Vec<TileId> = std::mem::take(&mut self.pending).into_iter().collect();
            self.notify(&changed);
        }
        out
    }

    fn touch(&mut self, id: TileId) {
        if self.batch_depth > 0 {
            self.pending.insert(id);
        } else {
            self.notify(&[id]);
        }
    }

    fn notify(&mut self, changed: &[TileId]) {
        self.revision += 1;
        for listener in &mut self.listeners {
            listener(changed);
        }
    }

    fn ids_for<'a, K: Eq + std::hash::Hash>(
        &'a self,
        index: &'a HashMap<K, BTreeSet<TileId>>,
        key: &K,
    ) -> impl Iterator<Item = &'a TileId> + 'a {
        index.get(key).into_iter().flatten()
    }

    fn index(&mut self, tile: &Tile) {
        let id = tile.id;
        self.by_position.entry(tile.position).or_default().insert(id);
        self.by_deleted.entry(tile.deleted).or_default().insert(id);
        self.by_selected.entry(tile.selected).or_default().insert(id);
        self.by_card.entry(tile.card).or_default().insert(id);
    }

    fn unindex(&mut self, tile: &Tile) {
        let id = tile.id;
        remove_from(&mut self.by_position, &tile.position, id);
        remove_from(&mut self.by_deleted, &tile.deleted, id);
        remove_from(&mut self.by_selected, &tile.selected, id);
        remove_from(&mut self.by_card, &tile.card, id);
    }
}

fn remove_from<K: Eq + std::hash::Hash>(
    index: &mut HashMap<K, BTreeSet<TileId>>,
    key: &K,
    id: TileId,
) {
    if let Some(ids) = index.get_mut(key) {
        ids.remove(&id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

impl Occupancy for TileRegistry {
    fn occupied(&self, pos: Position) -> bool {
        self.live_at(pos).next().is_some()
    }
}
