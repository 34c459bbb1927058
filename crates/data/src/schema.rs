use serde::{Deserialize, Serialize};

pub use pairfall_core::{
    BoardLayout, Catalogue, EmperorDef, EmperorEffect, GameConfig, ShopRule, Slot, TilePair,
};

/// `emperors.json`: the modifiers the shop may offer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmperorPack {
    #[serde(default)]
    pub emperors: Vec<EmperorDef>,
}

/// `tile_pool.json`: special pairs sold in the shop. Falls back to the
/// built-in pool when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TilePoolFile {
    #[serde(default)]
    pub pairs: Vec<TilePair>,
}

/// A layout file after its grid has been decoded into slots.
#[derive(Debug, Clone)]
pub struct LoadedLayout {
    pub name: String,
    pub slots: Vec<Slot>,
}
