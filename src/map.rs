use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

// ── Tile ─────────────────────────────────────────────────────────────────────

/// Terrain code for a single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tile {
    Walkable,
    Blocked,
}

impl Tile {
    /// Map a raw JSON code to a tile. Only 0 and 1 are known.
    fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Tile::Walkable),
            1 => Some(Tile::Blocked),
            _ => None,
        }
    }
}

// ── MapError ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map layout has no rows")]
    Empty,
    #[error("map row {row} has {len} cells, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },
    #[error("unknown tile code {code} at cell ({x}, {y})")]
    UnknownCode { code: u8, x: usize, y: usize },
    #[error("malformed map JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ── TileGrid ─────────────────────────────────────────────────────────────────

/// Immutable rectangular grid of tile codes, created once at load time.
///
/// Every query takes signed cell coordinates and fails closed: anything
/// outside the grid reports as blocked rather than faulting, since diagonal
/// movement does not guarantee the actor stays aligned with the grid edges.
#[derive(Debug, Clone)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    cols: usize,
    rows: usize,
}

impl TileGrid {
    /// Validate and build a grid from raw row-major codes.
    pub fn new(layout: Vec<Vec<u8>>) -> Result<Self, MapError> {
        let rows = layout.len();
        let cols = layout.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(rows * cols);
        for (y, row) in layout.iter().enumerate() {
            if row.len() != cols {
                return Err(MapError::RaggedRow { row: y, len: row.len(), expected: cols });
            }
            for (x, &code) in row.iter().enumerate() {
                let tile = Tile::from_code(code)
                    .ok_or(MapError::UnknownCode { code, x, y })?;
                tiles.push(tile);
            }
        }

        Ok(Self { tiles, cols, rows })
    }

    /// Deserialise a grid from the layout JSON schema:
    ///
    /// ```json
    /// { "layout": [[1, 1, 1], [1, 0, 1], [1, 1, 1]] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let raw: RawMap = serde_json::from_str(json)?;
        Self::new(raw.layout)
    }

    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }

    pub fn in_bounds(&self, gx: i32, gy: i32) -> bool {
        gx >= 0 && gy >= 0 && (gx as usize) < self.cols && (gy as usize) < self.rows
    }

    /// Tile at `(gx, gy)`, or `None` when out of bounds.
    pub fn tile(&self, gx: i32, gy: i32) -> Option<Tile> {
        if !self.in_bounds(gx, gy) {
            return None;
        }
        Some(self.tiles[gy as usize * self.cols + gx as usize])
    }

    /// True if the cell is blocked terrain. Out-of-bounds cells count as
    /// blocked so collision resolution never walks off the map.
    pub fn is_blocked(&self, gx: i32, gy: i32) -> bool {
        self.tile(gx, gy) != Some(Tile::Walkable)
    }

    /// Convert a continuous world-pixel position to the grid cell containing
    /// it (floor division, so slightly negative positions land in cell −1).
    pub fn cell_at(pos: Vec2, tile_w: u32, tile_h: u32) -> (i32, i32) {
        (
            (pos.x / tile_w as f32).floor() as i32,
            (pos.y / tile_h as f32).floor() as i32,
        )
    }

    /// World width in pixels for a given tile footprint.
    pub fn pixel_width(&self, tile_w: u32) -> f32 {
        (self.cols as u32 * tile_w) as f32
    }

    pub fn pixel_height(&self, tile_h: u32) -> f32 {
        (self.rows as u32 * tile_h) as f32
    }
}

// ── Raw (JSON-facing) types ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawMap {
    layout: Vec<Vec<u8>>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn walled_3x3() -> TileGrid {
        TileGrid::new(vec![
            vec![1, 1, 1],
            vec![1, 0, 1],
            vec![1, 1, 1],
        ])
        .unwrap()
    }

    #[test]
    fn new_rejects_empty_layout() {
        assert!(matches!(TileGrid::new(vec![]), Err(MapError::Empty)));
        assert!(matches!(TileGrid::new(vec![vec![]]), Err(MapError::Empty)));
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let err = TileGrid::new(vec![vec![0, 0], vec![0]]).unwrap_err();
        assert!(matches!(err, MapError::RaggedRow { row: 1, len: 1, expected: 2 }));
    }

    #[test]
    fn new_rejects_unknown_codes() {
        let err = TileGrid::new(vec![vec![0, 7]]).unwrap_err();
        assert!(matches!(err, MapError::UnknownCode { code: 7, x: 1, y: 0 }));
    }

    #[test]
    fn from_json_parses_layout_schema() {
        let grid = TileGrid::from_json(r#"{ "layout": [[1, 0], [0, 1]] }"#).unwrap();
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.tile(0, 0), Some(Tile::Blocked));
        assert_eq!(grid.tile(1, 0), Some(Tile::Walkable));
    }

    #[test]
    fn from_json_rejects_missing_layout_key() {
        assert!(TileGrid::from_json(r#"{ "map": [[0]] }"#).is_err());
    }

    #[test]
    fn out_of_bounds_fails_closed() {
        let grid = walled_3x3();
        assert!(!grid.in_bounds(-1, 1));
        assert!(!grid.in_bounds(1, 3));
        assert!(grid.is_blocked(-1, 1));
        assert!(grid.is_blocked(3, 0));
        assert!(grid.is_blocked(0, -1));
        assert_eq!(grid.tile(5, 5), None);
    }

    #[test]
    fn interior_cell_is_walkable() {
        let grid = walled_3x3();
        assert!(!grid.is_blocked(1, 1));
        assert!(grid.is_blocked(0, 0));
    }

    #[test]
    fn cell_at_uses_floor_division() {
        assert_eq!(TileGrid::cell_at(Vec2::new(120.0, 130.0), 120, 130), (1, 1));
        assert_eq!(TileGrid::cell_at(Vec2::new(119.9, 129.9), 120, 130), (0, 0));
        assert_eq!(TileGrid::cell_at(Vec2::new(-0.1, 5.0), 120, 130), (-1, 0));
    }

    #[test]
    fn pixel_dimensions_scale_with_tile_size() {
        let grid = walled_3x3();
        assert_eq!(grid.pixel_width(120), 360.0);
        assert_eq!(grid.pixel_height(130), 390.0);
    }

    #[test]
    fn embedded_demo_map_parses() {
        let grid = TileGrid::from_json(crate::DEFAULT_MAP).unwrap();
        assert_eq!(grid.cols(), 20);
        assert_eq!(grid.rows(), 6);
        // Boundary ring is blocked, interior is open.
        assert!(grid.is_blocked(0, 0));
        assert!(!grid.is_blocked(1, 1));
    }
}
