use std::path::Path;

use image::RgbaImage;
use thiserror::Error;

use crate::map::{MapError, TileGrid};
use crate::sprites::SpriteTable;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sprite sheet image: {0}")]
    Image(#[from] image::ImageError),
    #[error("sprite table: {0}")]
    Sprites(#[from] serde_json::Error),
    #[error("map: {0}")]
    Map(#[from] MapError),
}

/// Everything the demos need loaded before a window exists: the decoded
/// sprite sheet, the frame table describing it, and the tile map.
///
/// Loading happens up front so asset problems surface as a clean error on
/// stderr instead of a panic mid-frame.
pub struct Assets {
    pub sheet: RgbaImage,
    pub sprites: SpriteTable,
    pub grid: TileGrid,
}

impl Assets {
    /// The assets compiled into the binary: the generated sprite sheet and
    /// the bundled sprite/map JSON.
    pub fn embedded() -> Result<Self, LoadError> {
        let sheet = image::load_from_memory(crate::DEFAULT_SHEET)?.to_rgba8();
        let sprites = SpriteTable::from_json(crate::DEFAULT_SPRITES)?;
        let grid = TileGrid::from_json(crate::DEFAULT_MAP)?;
        Ok(Self { sheet, sprites, grid })
    }

    /// Load all three assets from disk, for running with custom content.
    pub fn from_files(
        sheet_path: impl AsRef<Path>,
        sprites_path: impl AsRef<Path>,
        map_path: impl AsRef<Path>,
    ) -> Result<Self, LoadError> {
        let sheet = image::open(sheet_path)?.to_rgba8();
        let sprites = SpriteTable::from_json(&std::fs::read_to_string(sprites_path)?)?;
        let grid = TileGrid::from_json(&std::fs::read_to_string(map_path)?)?;
        Ok(Self { sheet, sprites, grid })
    }
}
