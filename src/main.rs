use std::path::PathBuf;

use glam::Vec2;

use tilewalk::assets::Assets;
use tilewalk::engine::{Color, Engine, Game, KeyCode};
use tilewalk::map::TileGrid;
use tilewalk::movement::{self, Actor, KeyState, Motion};
use tilewalk::sprites::SpriteTable;
use tilewalk::{DEFAULT_SPEED, DEFAULT_TILE_H, DEFAULT_TILE_W};

// ── Palette ─────────────────────────────────────────────────────────────────

const TILE_OPEN: Color = Color([0.36, 0.62, 0.32, 1.0]);
const TILE_WALL: Color = Color([0.28, 0.28, 0.30, 1.0]);

// ── Shared scene state ──────────────────────────────────────────────────────

/// Everything both demo variants have in common: the map, the sprite table,
/// the player actor, and the movement parameters.
struct Scene {
    grid: TileGrid,
    sprites: SpriteTable,
    actor: Actor,
    motion: Motion,
}

impl Scene {
    fn new(grid: TileGrid, sprites: SpriteTable) -> Self {
        let motion = Motion {
            tile_w: DEFAULT_TILE_W,
            tile_h: DEFAULT_TILE_H,
            speed: DEFAULT_SPEED,
        };
        // Spawn on the first open cell, one tile in from the blocked border.
        let actor = Actor::at(Vec2::new(DEFAULT_TILE_W as f32, DEFAULT_TILE_H as f32));
        Self { grid, sprites, actor, motion }
    }

    fn world_width(&self) -> f32 {
        self.grid.pixel_width(self.motion.tile_w)
    }

    fn world_height(&self) -> f32 {
        self.grid.pixel_height(self.motion.tile_h)
    }

    fn draw(&self, engine: &mut Engine) {
        let tw = self.motion.tile_w as f32;
        let th = self.motion.tile_h as f32;

        for gy in 0..self.grid.rows() as i32 {
            for gx in 0..self.grid.cols() as i32 {
                let color = if self.grid.is_blocked(gx, gy) { TILE_WALL } else { TILE_OPEN };
                engine.fill_rect(gx as f32 * tw, gy as f32 * th, tw, th, color);
            }
        }

        match self.sprites.frame(self.actor.facing, self.actor.posture, self.actor.frame) {
            Some(frame) => {
                engine.draw_frame(self.actor.pos.x, self.actor.pos.y, tw, th, frame);
            }
            None => {
                // Tiles still render; only the actor is skipped this frame.
                log::debug!(
                    "no sprite frame for {:?}/{:?}, skipping actor draw",
                    self.actor.facing,
                    self.actor.posture
                );
            }
        }
    }
}

// ── Free-walk variant ───────────────────────────────────────────────────────

/// Continuous pixel movement with a camera that follows the player across
/// the full 2400×780 world.
struct FreeWalk {
    scene: Scene,
}

impl Game for FreeWalk {
    fn update(&mut self, engine: &mut Engine) {
        if engine.is_key_pressed(KeyCode::Escape) {
            engine.request_quit();
            return;
        }

        let keys = KeyState::sample(&engine.input);
        let scene = &mut self.scene;
        movement::step(&mut scene.actor, keys, &scene.grid, &scene.motion);

        engine.camera.center_on(
            scene.actor.pos,
            scene.motion.tile_w,
            scene.motion.tile_h,
            scene.world_width(),
            scene.world_height(),
        );
    }

    fn render(&mut self, engine: &mut Engine) {
        self.scene.draw(engine);
    }
}

// ── Grid-step variant ───────────────────────────────────────────────────────

/// One whole tile per key press, no scrolling: the viewport shows the
/// top-left corner of the world from a fixed camera.
struct GridStep {
    scene: Scene,
}

impl Game for GridStep {
    fn update(&mut self, engine: &mut Engine) {
        if engine.is_key_pressed(KeyCode::Escape) {
            engine.request_quit();
            return;
        }

        // Edge-triggered: holding a key moves once. Presses landing between
        // ticks are coalesced into this tick's snapshot.
        let keys = KeyState {
            up: engine.is_key_pressed(KeyCode::ArrowUp),
            down: engine.is_key_pressed(KeyCode::ArrowDown),
            left: engine.is_key_pressed(KeyCode::ArrowLeft),
            right: engine.is_key_pressed(KeyCode::ArrowRight),
        };
        if keys.any() {
            let scene = &mut self.scene;
            movement::step_cell(&mut scene.actor, keys, &scene.grid, &scene.motion);
        }
    }

    fn render(&mut self, engine: &mut Engine) {
        self.scene.draw(engine);
    }
}

// ── Entry point ─────────────────────────────────────────────────────────────

struct Args {
    stepwise: bool,
    assets_dir: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args { stepwise: false, assets_dir: None };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--stepwise" => args.stepwise = true,
            "--assets" => args.assets_dir = iter.next().map(PathBuf::from),
            other => log::warn!("ignoring unknown argument {other:?}"),
        }
    }
    args
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args();

    let assets = match &args.assets_dir {
        Some(dir) => Assets::from_files(
            dir.join("sheet.png"),
            dir.join("sprites.json"),
            dir.join("map.json"),
        ),
        None => Assets::embedded(),
    };
    let assets = match assets {
        Ok(a) => a,
        Err(e) => {
            log::error!("failed to load assets: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "starting {} demo on a {}x{} map",
        if args.stepwise { "grid-step" } else { "free-walk" },
        assets.grid.cols(),
        assets.grid.rows()
    );

    let scene = Scene::new(assets.grid, assets.sprites);
    let builder = Engine::builder()
        .with_size(800, 600)
        .with_sheet(assets.sheet);

    if args.stepwise {
        builder
            .with_title("tilewalk (grid step)")
            .run(GridStep { scene });
    } else {
        builder.with_title("tilewalk").run(FreeWalk { scene });
    }
}
