pub mod assets;
pub mod camera;
pub mod engine;
pub mod input;
pub mod map;
pub mod movement;
pub mod renderer;
pub mod sprites;

/// Demo sprite sheet PNG, generated into `OUT_DIR` by `build.rs`.
pub const DEFAULT_SHEET: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/sheet.png"));

/// Frame records for the demo sheet (sprite-record JSON schema).
pub const DEFAULT_SPRITES: &str = include_str!("../resources/sprites.json");

/// Walled 20×6 demo map (layout JSON schema).
pub const DEFAULT_MAP: &str = include_str!("../resources/map.json");

/// Tile footprint in world pixels.
pub const DEFAULT_TILE_W: u32 = 120;
pub const DEFAULT_TILE_H: u32 = 130;

/// Walk speed in world pixels per tick (not per second — see `engine`).
pub const DEFAULT_SPEED: f32 = 20.0;
