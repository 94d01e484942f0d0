//! Static facility map
//!
//! Walls, terminals and pickups are fixed at load time and never mutated.

use glam::IVec2;
use serde::Serialize;

use crate::in_bounds;

/// Axis-aligned wall rectangle in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Wall {
    pub x: i32,
    pub y: i32,
    /// Width in cells (>= 1)
    pub w: i32,
    /// Height in cells (>= 1)
    pub h: i32,
}

impl Wall {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// True if the cell falls inside this rectangle
    #[inline]
    pub fn contains(&self, cell: IVec2) -> bool {
        cell.x >= self.x && cell.x < self.x + self.w && cell.y >= self.y && cell.y < self.y + self.h
    }
}

/// A hackable terminal; reaching one completes the mission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Terminal {
    pub id: &'static str,
    pub pos: IVec2,
}

/// Pickup kinds placed on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemKind {
    Keycard,
}

/// A map pickup (display only, nothing consumes it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Item {
    pub kind: ItemKind,
    pub name: &'static str,
    pub pos: IVec2,
}

/// Immutable map data shared by the player and guards
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MapData {
    pub walls: &'static [Wall],
    pub terminals: &'static [Terminal],
    pub items: &'static [Item],
}

static WALLS: [Wall; 8] = [
    Wall::new(5, 5, 10, 1),
    Wall::new(5, 10, 1, 5),
    Wall::new(14, 10, 1, 5),
    Wall::new(5, 15, 10, 1),
    // Borders
    Wall::new(0, 0, 20, 1),
    Wall::new(0, 19, 20, 1),
    Wall::new(0, 0, 1, 20),
    Wall::new(19, 0, 1, 20),
];

static TERMINALS: [Terminal; 1] = [Terminal {
    id: "mainframe",
    pos: IVec2::new(18, 2),
}];

static ITEMS: [Item; 1] = [Item {
    kind: ItemKind::Keycard,
    name: "Level 1 Keycard",
    pos: IVec2::new(10, 12),
}];

/// The research facility
pub static FACILITY: MapData = MapData {
    walls: &WALLS,
    terminals: &TERMINALS,
    items: &ITEMS,
};

impl MapData {
    /// True if any wall covers the cell
    pub fn is_wall(&self, cell: IVec2) -> bool {
        self.walls.iter().any(|w| w.contains(cell))
    }

    /// True if the player may stand on the cell
    pub fn is_walkable(&self, cell: IVec2) -> bool {
        in_bounds(cell) && !self.is_wall(cell)
    }

    /// Terminal occupying the cell, if any
    pub fn terminal_at(&self, cell: IVec2) -> Option<&Terminal> {
        self.terminals.iter().find(|t| t.pos == cell)
    }

    /// Item lying on the cell, if any
    pub fn item_at(&self, cell: IVec2) -> Option<&Item> {
        self.items.iter().find(|i| i.pos == cell)
    }
}
