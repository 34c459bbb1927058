use crate::{has_support, Position};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

pub type SlotId = u32;

/// Raw board layout: `levels[z][y][x]`, each tile drawn as a 2x2 block of the
/// same slot id, levels stacked bottom-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardLayout {
    #[serde(default)]
    pub name: String,
    pub levels: Vec<Vec<Vec<Option<SlotId>>>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub id: SlotId,
    pub position: Position,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout has no tiles")]
    Empty,
    #[error("slot {id} at {position:?} is not a complete 2x2 block")]
    IncompleteBlock { id: SlotId, position: Position },
    #[error("slot {id} at {position:?} is not fully supported")]
    Unsupported { id: SlotId, position: Position },
}

fn cell(layout: &BoardLayout, x: i32, y: i32, z: i32) -> Option<SlotId> {
    let level = layout.levels.get(usize::try_from(z).ok()?)?;
    let row = level.get(usize::try_from(y).ok()?)?;
    *row.get(usize::try_from(x).ok()?)?
}

/// Collapses every 2x2 block to its top-left cell. A block that is cut short
/// or a raised tile without full support rejects the whole layout.
pub fn decode_layout(layout: &BoardLayout) -> Result<Vec<Slot>, LayoutError> {
    let mut consumed: HashSet<Position> = HashSet::new();
    let mut slots = Vec::new();
    for (z, level) in layout.levels.iter().enumerate() {
        for (y, row) in level.iter().enumerate() {
            for (x, value) in row.iter().enumerate() {
                let Some(id) = *value else {
                    continue;
                };
                let position = Position::new(x as i32, y as i32, z as i32);
                if consumed.contains(&position) {
                    continue;
                }
                let block = [(0, 0), (1, 0), (0, 1), (1, 1)]
                    .map(|(dx, dy)| position.offset(dx, dy, 0));
                let complete = block.iter().all(|cell_pos| {
                    !consumed.contains(cell_pos)
                        && cell(layout, cell_pos.x, cell_pos.y, cell_pos.z) == Some(id)
                });
                if !complete {
                    return Err(LayoutError::IncompleteBlock { id, position });
                }
                consumed.extend(block);
                slots.push(Slot { id, position });
            }
        }
    }
    if slots.is_empty() {
        return Err(LayoutError::Empty);
    }
    let occupied: HashSet<Position> = slots.iter().map(|slot| slot.position).collect();
    if let Some(slot) = slots
        .iter()
        .find(|slot| !has_support(&occupied, slot.position))
    {
        return Err(LayoutError::Unsupported {
            id: slot.id,
            position: slot.position,
        });
    }
    Ok(slots)
}
