//! Rectangular tile grid.
//!
//! # Data layout
//!
//! Tiles are stored row-major in one `Vec<Tile>`; the tile at `(x, y)` is at
//! index `y * width + x`.  Every tile carries its terrain and an integer
//! traversal cost.  Entering a tile costs that tile's `cost`; the start tile
//! of a path is free.
//!
//! Walls are never entered.  Every other tile has `cost >= 1`, which keeps
//! the Manhattan heuristic admissible and consistent.

use nt_core::Cell;

use crate::{SpatialError, SpatialResult};

/// Cost recorded on wall tiles.  Routing never reads it; walls are filtered
/// on terrain.
pub const WALL_COST: u32 = u32::MAX;

// ── Terrain ───────────────────────────────────────────────────────────────────

/// Obstacle category of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    None,
    Wall,
    Water,
    Forest,
    Grass,
    Path,
}

impl Terrain {
    /// Traversal cost a tile of this terrain gets unless overridden.
    pub fn default_cost(self) -> u32 {
        match self {
            Terrain::None   => 1,
            Terrain::Path   => 5,
            Terrain::Grass  => 10,
            Terrain::Forest => 20,
            Terrain::Water  => 100,
            Terrain::Wall   => WALL_COST,
        }
    }

    /// Parse one character of an ASCII map row.
    ///
    /// | Glyph | Terrain |
    /// |-------|---------|
    /// | `.`   | None    |
    /// | `#`   | Wall    |
    /// | `~`   | Water   |
    /// | `T`   | Forest  |
    /// | `,`   | Grass   |
    /// | `=`   | Path    |
    pub fn from_glyph(glyph: char) -> Option<Terrain> {
        Some(match glyph {
            '.' => Terrain::None,
            '#' => Terrain::Wall,
            '~' => Terrain::Water,
            'T' => Terrain::Forest,
            ',' => Terrain::Grass,
            '=' => Terrain::Path,
            _ => return None,
        })
    }

    pub fn glyph(self) -> char {
        match self {
            Terrain::None   => '.',
            Terrain::Wall   => '#',
            Terrain::Water  => '~',
            Terrain::Forest => 'T',
            Terrain::Grass  => ',',
            Terrain::Path   => '=',
        }
    }
}

// ── Tile ──────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub terrain: Terrain,
    pub cost:    u32,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Self {
        Self { terrain, cost: terrain.default_cost() }
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.terrain == Terrain::Wall
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::new(Terrain::None)
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

/// A `width × height` array of tiles.
#[derive(Clone, Debug)]
pub struct Grid {
    width:  i32,
    height: i32,
    tiles:  Vec<Tile>,
}

impl Grid {
    /// An all-open grid (terrain `None`, cost 1).
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            width:  width as i32,
            height: height as i32,
            tiles:  vec![Tile::default(); width as usize * height as usize],
        }
    }

    /// Build a grid from ASCII rows (see [`Terrain::from_glyph`]).
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> SpatialResult<Self> {
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(SpatialError::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let got = line.chars().count();
            if got != width {
                return Err(SpatialError::RaggedRow { row, expected: width, got });
            }
            for (col, glyph) in line.chars().enumerate() {
                let terrain = Terrain::from_glyph(glyph)
                    .ok_or(SpatialError::UnknownGlyph { glyph, row, col })?;
                tiles.push(Tile::new(terrain));
            }
        }

        Ok(Self { width: width as i32, height: rows.len() as i32, tiles })
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Row-major index of `cell`, or `None` if out of bounds.
    #[inline]
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    // ── Tile queries ──────────────────────────────────────────────────────

    #[inline]
    pub fn at(&self, cell: Cell) -> Option<&Tile> {
        self.index_of(cell).map(|i| &self.tiles[i])
    }

    /// `true` if `cell` is inside the grid and not a wall.
    #[inline]
    pub fn is_passable(&self, cell: Cell) -> bool {
        self.at(cell).is_some_and(|t| !t.is_wall())
    }

    /// Sum of entry costs along `path`, excluding the first cell.
    ///
    /// Returns `None` if any step leaves the grid or enters a wall.
    pub fn path_cost(&self, path: &[Cell]) -> Option<u64> {
        path.iter().skip(1).try_fold(0u64, |acc, &c| {
            let tile = self.at(c)?;
            (!tile.is_wall()).then_some(acc + tile.cost as u64)
        })
    }

    // ── Mutation (owned by whoever loads or edits the map) ────────────────

    /// Replace the terrain of `cell`, resetting its cost to the terrain default.
    pub fn set_terrain(&mut self, cell: Cell, terrain: Terrain) -> SpatialResult<()> {
        let i = self.index_of(cell).ok_or(SpatialError::OutOfBounds(cell))?;
        self.tiles[i] = Tile::new(terrain);
        Ok(())
    }

    /// Override the traversal cost of a non-wall `cell` (clamped to `>= 1`).
    pub fn set_cost(&mut self, cell: Cell, cost: u32) -> SpatialResult<()> {
        let i = self.index_of(cell).ok_or(SpatialError::OutOfBounds(cell))?;
        if !self.tiles[i].is_wall() {
            self.tiles[i].cost = cost.max(1);
        }
        Ok(())
    }

    /// Render the grid back to ASCII rows.
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|t| t.terrain.glyph()).collect())
            .collect()
    }
}
