//! Board geometry over tile origins.
//!
//! A tile anchored at `(x, y, z)` spans the unit cells `x..x+2` by `y..y+2`
//! on level `z`. Every query here is a fixed number of point look-ups against
//! an [`Occupancy`] index, never a scan of the board.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn code(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::East => 'e',
            Direction::South => 's',
            Direction::West => 'w',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL.into_iter().find(|dir| dir.code() == code)
    }

    /// Unit step in cells; multiply by [`CELL`] for coordinates.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Width of one tile in board units.
pub const CELL: i32 = 2;

/// Answers "is there a live tile anchored exactly here".
pub trait Occupancy {
    fn occupied(&self, pos: Position) -> bool;
}

impl Occupancy for HashSet<Position> {
    fn occupied(&self, pos: Position) -> bool {
        self.contains(&pos)
    }
}

/// Origins whose footprint intersects the footprint anchored at `(0, 0)`.
pub(crate) const NEIGHBOURHOOD: [(i32, i32); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const QUADRANTS: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

pub fn is_covered(board: &impl Occupancy, pos: Position) -> bool {
    NEIGHBOURHOOD
        .iter()
        .any(|&(dx, dy)| board.occupied(pos.offset(dx, dy, 1)))
}

/// Whether the unit cell `(x, y)` on level `z` lies under some tile.
pub fn cell_covered(board: &impl Occupancy, x: i32, y: i32, z: i32) -> bool {
    [(-1, -1), (0, -1), (-1, 0), (0, 0)]
        .iter()
        .any(|&(dx, dy)| board.occupied(Position::new(x + dx, y + dy, z)))
}

/// A tile rests only on a full underlap; partial overlap is enough for
/// [`is_covered`] but not for support.
pub fn has_support(board: &impl Occupancy, pos: Position) -> bool {
    if pos.z == 0 {
        return true;
    }
    QUADRANTS
        .iter()
        .all(|&(dx, dy)| cell_covered(board, pos.x + dx, pos.y + dy, pos.z - 1))
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SideFreedoms {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl SideFreedoms {
    pub fn open_count(self) -> usize {
        [self.left, self.right, self.top, self.bottom]
            .into_iter()
            .filter(|open| *open)
            .count()
    }

    pub fn any(self) -> bool {
        self.open_count() > 0
    }
}

pub fn side_freedoms(board: &impl Occupancy, pos: Position) -> SideFreedoms {
    let horizontal = |dx: i32| !(-1..=1).any(|dy| board.occupied(pos.offset(dx, dy, 0)));
    let vertical = |dy: i32| !(-1..=1).any(|dx| board.occupied(pos.offset(dx, dy, 0)));
    SideFreedoms {
        left: horizontal(-CELL),
        right: horizontal(CELL),
        top: vertical(-CELL),
        bottom: vertical(CELL),
    }
}

const C: (i32, i32) = (0, 0);
const L: (i32, i32) = (-1, 0);
const R: (i32, i32) = (1, 0);
const T: (i32, i32) = (0, -1);
const B: (i32, i32) = (0, 1);
const TL: (i32, i32) = (-1, -1);
const TR: (i32, i32) = (1, -1);
const BL: (i32, i32) = (-1, 1);
const BR: (i32, i32) = (1, 1);

/// Minimal sets of same-level origins that together hide every quadrant of a
/// footprint: the centre, two opposite halves, a half plus the two far
/// corners, two adjacent halves plus the opposite corner, or all corners.
pub const QUADRANT_COVERS: [&[(i32, i32)]; 12] = [
    &[C],
    &[L, R],
    &[T, B],
    &[L, TR, BR],
    &[R, TL, BL],
    &[T, BL, BR],
    &[B, TL, TR],
    &[L, T, BR],
    &[L, B, TR],
    &[R, T, BL],
    &[R, B, TL],
    &[TL, TR, BL, BR],
];

/// Board packing check: is the footprint at `pos` completely hidden by tiles
/// on level `pos.z`. Gameplay freedom never consults this.
pub fn fully_overlaps(board: &impl Occupancy, pos: Position) -> bool {
    QUADRANT_COVERS.iter().any(|cover| {
        cover
            .iter()
            .all(|&(dx, dy)| board.occupied(pos.offset(dx, dy, 0)))
    })
}

/// Inclusive range of tile origins a board may use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn around(positions: impl IntoIterator<Item = Position>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for pos in iter {
            bounds.min_x = bounds.min_x.min(pos.x);
            bounds.min_y = bounds.min_y.min(pos.y);
            bounds.max_x = bounds.max_x.max(pos.x);
            bounds.max_y = bounds.max_y.max(pos.y);
        }
        Some(bounds)
    }

    pub fn contains(&self, pos: Position) -> bool {
        (self.min_x..=self.max_x).contains(&pos.x) && (self.min_y..=self.max_y).contains(&pos.y)
    }
}
