use crate::schema::{
    BoardLayout, Catalogue, EmperorDef, EmperorPack, GameConfig, LoadedLayout, TilePoolFile,
};
use anyhow::{bail, Context};
use pairfall_core::{decode_layout, default_tile_pool};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const EMPERORS_FILE: &str = "emperors.json";
const TILE_POOL_FILE: &str = "tile_pool.json";
const LAYOUTS_DIR: &str = "layouts";

/// Reads `config.json` from `dir`; a missing file means the built-in tables.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GameConfig::default());
    }
    load_json(path)
}

pub fn layout_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(LAYOUTS_DIR).join(format!("{name}.json"))
}

pub fn parse_layout(raw: &str) -> anyhow::Result<LoadedLayout> {
    let layout: BoardLayout = serde_json::from_str(raw).context("parse layout")?;
    let slots = decode_layout(&layout)
        .with_context(|| format!("decode layout {:?}", layout.name))?;
    if slots.len() % 2 != 0 {
        bail!(
            "layout {:?} has an odd number of tiles ({})",
            layout.name,
            slots.len()
        );
    }
    Ok(LoadedLayout {
        name: layout.name,
        slots,
    })
}

pub fn load_layout(path: &Path) -> anyhow::Result<LoadedLayout> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut loaded = parse_layout(&raw).with_context(|| format!("load {}", path.display()))?;
    if loaded.name.is_empty() {
        if let Some(stem) = path.file_stem() {
            loaded.name = stem.to_string_lossy().into_owned();
        }
    }
    Ok(loaded)
}

pub fn load_emperors(path: &Path) -> anyhow::Result<Vec<EmperorDef>> {
    let pack: EmperorPack = load_json(path)?;
    validate_emperors(&pack.emperors, path)?;
    Ok(pack.emperors)
}

/// Emperors plus the shop tile pool, both optional.
pub fn load_catalogue(dir: &Path) -> anyhow::Result<Catalogue> {
    let emperors_path = dir.join(EMPERORS_FILE);
    let emperors = if emperors_path.exists() {
        load_emperors(&emperors_path)?
    } else {
        Vec::new()
    };
    let pool_path = dir.join(TILE_POOL_FILE);
    let tile_pool = if pool_path.exists() {
        let pool: TilePoolFile = load_json(&pool_path)?;
        if let Some(pair) = pool.pairs.iter().find(|pair| !pair.is_matching()) {
            bail!(
                "tile pair {}/{} in {} does not match",
                pair.cards[0],
                pair.cards[1],
                pool_path.display()
            );
        }
        pool.pairs
    } else {
        default_tile_pool()
    };
    Ok(Catalogue {
        emperors,
        tile_pool,
    })
}

fn validate_emperors(emperors: &[EmperorDef], path: &Path) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for emperor in emperors {
        if emperor.id.trim().is_empty() {
            bail!("emperor id cannot be empty in {}", path.display());
        }
        if !seen.insert(emperor.id.as_str()) {
            bail!("duplicate emperor {} in {}", emperor.id, path.display());
        }
        if emperor.price.is_some_and(|price| price < 0) {
            bail!(
                "emperor {} has a negative price in {}",
                emperor.id,
                path.display()
            );
        }
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
