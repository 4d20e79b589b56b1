//! Walkability grid for a level.
//!
//! Cells are stored in row-major order: index = y * width + x.
//! A cell is walkable when it carries a tile id; `None` is void. Lookups
//! outside the grid are void as well, so callers never bounds-check.

use glam::IVec2;

/// Tile id carried by a walkable cell. Only renderers care about the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId(pub u16);

impl TileId {
    pub const FLOOR: TileId = TileId(1);
    pub const ICE: TileId = TileId(2);
    pub const GOAL: TileId = TileId(3);
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridMap {
    width: u32,
    height: u32,
    cells: Vec<Option<TileId>>,
}

impl GridMap {
    /// Create an all-void map.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    /// Create a map where every cell is floor.
    pub fn filled(width: u32, height: u32) -> Self {
        let mut map = Self::new(width, height);
        map.cells.fill(Some(TileId::FLOOR));
        map
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Longest side; the natural bound for anything that walks the grid.
    pub fn diameter(&self) -> u32 {
        self.width.max(self.height)
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x as u32 >= self.width || cell.y as u32 >= self.height {
            return None;
        }
        Some((cell.y as u32 * self.width + cell.x as u32) as usize)
    }

    /// Tile at `cell`, or `None` for void and out-of-range cells.
    pub fn get(&self, cell: IVec2) -> Option<TileId> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// Set a cell. Out-of-range writes are ignored.
    pub fn set(&mut self, cell: IVec2, tile: Option<TileId>) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = tile;
        }
    }

    pub fn is_walkable(&self, cell: IVec2) -> bool {
        self.get(cell).is_some()
    }
}
