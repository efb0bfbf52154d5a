use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
pub use winit::keyboard::KeyCode;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::camera::Camera;
use crate::input::InputState;
use crate::renderer::Renderer;
use crate::renderer::pipeline::QuadVertex;
use crate::sprites::SpriteFrame;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const GRAY: Self = Self([0.6, 0.6, 0.6, 1.0]);
    pub const DARK_GRAY: Self = Self([0.2, 0.2, 0.2, 1.0]);
    pub const GREEN: Self = Self([0.0, 1.0, 0.0, 1.0]);
    pub const DARK_GREEN: Self = Self([0.0, 0.35, 0.05, 1.0]);
}

// ── Game trait ──────────────────────────────────────────────────────────────

pub trait Game {
    fn on_enter(&mut self, _engine: &mut Engine) {}
    fn update(&mut self, engine: &mut Engine);
    fn render(&mut self, engine: &mut Engine);
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine {
    /// GPU renderer — holds the WGPU surface, pipeline, and sheet texture.
    pub renderer: Renderer,
    /// 2D follow camera. Games that scroll call `camera.center_on` each tick;
    /// games that don't simply leave the offset at zero.
    pub camera: Camera,
    /// Keyboard state for the current frame.
    pub input: InputState,
    dt: f32,
    tick: u64,
    /// Queued flat-colored quads (map tiles); cleared before each render.
    tile_verts: Vec<QuadVertex>,
    /// Queued textured quads (the actor); cleared before each render.
    actor_verts: Vec<QuadVertex>,
    /// Set to `true` by `request_quit()`; the event loop exits after the current tick.
    pub(crate) quit_requested: bool,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn from_builder(renderer: Renderer) -> Self {
        let size = renderer.window.inner_size();
        let camera = Camera::new(size.width as f32, size.height as f32);

        Self {
            renderer,
            camera,
            input: InputState::new(),
            dt: 0.0,
            tick: 0,
            tile_verts: Vec::new(),
            actor_verts: Vec::new(),
            quit_requested: false,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    /// Seconds since the previous frame. Informational: game updates run once
    /// per displayed frame, so movement per tick is fixed regardless of `dt`.
    pub fn dt(&self) -> f32 { self.dt }
    pub fn tick(&self) -> u64 { self.tick }

    pub fn is_key_held(&self, key: KeyCode) -> bool { self.input.is_key_held(key) }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool { self.input.is_key_pressed(key) }
    pub fn is_key_released(&self, key: KeyCode) -> bool { self.input.is_key_released(key) }

    /// Signal that the application should exit.  The event loop will call
    /// `exit()` after the current update tick completes.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    // ── Drawing API ────────────────────────────────────────────────────────

    /// Queue a solid-colored rectangle at world-pixel position `(x, y)`.
    ///
    /// Rectangles entirely outside the camera viewport are culled here, so
    /// callers can submit every map tile without a per-frame visibility scan.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let off = self.camera.offset;
        let view = self.camera.viewport_size();
        if x + w <= off.x || x >= off.x + view.x || y + h <= off.y || y >= off.y + view.y {
            return;
        }

        let c = color.0;
        let uv = [0.0f32, 0.0];
        let tl = QuadVertex { position: [x,     y],     uv, color: c, textured: 0.0 };
        let tr = QuadVertex { position: [x + w, y],     uv, color: c, textured: 0.0 };
        let bl = QuadVertex { position: [x,     y + h], uv, color: c, textured: 0.0 };
        let br = QuadVertex { position: [x + w, y + h], uv, color: c, textured: 0.0 };
        self.tile_verts.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
    }

    /// Queue a sprite-sheet frame stretched over the world-pixel rectangle
    /// `(x, y, w, h)`, drawn on top of all tiles.
    pub fn draw_frame(&mut self, x: f32, y: f32, w: f32, h: f32, frame: &SpriteFrame) {
        let (uv_min, uv_max) = self.renderer.sheet.uv_for_frame(frame);
        let c = Color::WHITE.0;

        let tl = QuadVertex { position: [x,     y],     uv: uv_min,                 color: c, textured: 1.0 };
        let tr = QuadVertex { position: [x + w, y],     uv: [uv_max[0], uv_min[1]], color: c, textured: 1.0 };
        let bl = QuadVertex { position: [x,     y + h], uv: [uv_min[0], uv_max[1]], color: c, textured: 1.0 };
        let br = QuadVertex { position: [x + w, y + h], uv: uv_max,                 color: c, textured: 1.0 };
        self.actor_verts.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
    }

    /// Upload the current camera view-projection matrix to the GPU.
    /// Must be called once per frame before `renderer.render()`.
    pub(crate) fn sync_camera(&mut self) {
        let uniform = self.camera.build_view_proj();
        self.renderer.update_camera(&uniform);
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    sheet: Option<RgbaImage>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "tilewalk".into(),
            width: 800,
            height: 600,
            sheet: None,
        }
    }
}

impl EngineBuilder {
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }

    /// The decoded sprite sheet to upload at startup.  Required.
    pub fn with_sheet(mut self, sheet: RgbaImage) -> Self {
        self.sheet = Some(sheet); self
    }

    pub fn run(self, game: impl Game + 'static) {
        let event_loop = EventLoop::new().unwrap();
        let mut app = App {
            config: self,
            game: Box::new(game),
            engine: None,
            last_instant: None,
        };
        event_loop.run_app(&mut app).unwrap();
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    engine: Option<Engine>,
    last_instant: Option<Instant>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(&self.config.title)
                        .with_inner_size(winit::dpi::PhysicalSize::new(
                            self.config.width,
                            self.config.height,
                        ))
                        .with_resizable(false),
                )
                .unwrap(),
        );

        let sheet = self
            .config
            .sheet
            .take()
            .expect("EngineBuilder::with_sheet not called");
        let renderer = pollster::block_on(Renderer::new(window, &sheet));

        let mut engine = Engine::from_builder(renderer);
        self.game.on_enter(&mut engine);
        self.engine = Some(engine);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.renderer.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                engine.renderer.resize(size);
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => 0.0,
                };
                self.last_instant = Some(now);

                // One update per displayed frame, like the animation-frame
                // loops this mirrors; `dt` is recorded but movement is fixed
                // per tick.
                engine.dt = elapsed;
                engine.tick += 1;
                self.game.update(engine);
                if engine.quit_requested {
                    event_loop.exit();
                    return;
                }

                engine.tile_verts.clear();
                engine.actor_verts.clear();
                self.game.render(engine);

                // Upload the current camera matrix to the GPU before rendering.
                engine.sync_camera();

                let tile_verts = std::mem::take(&mut engine.tile_verts);
                let actor_verts = std::mem::take(&mut engine.actor_verts);
                match engine.renderer.render(&tile_verts, &actor_verts) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = engine.renderer.window.inner_size();
                        engine.renderer.resize(size);
                    }
                    Err(e) => log::error!("render error: {e}"),
                }

                // Restore the queue capacity for the next frame.
                engine.tile_verts = tile_verts;
                engine.actor_verts = actor_verts;
                engine.tile_verts.clear();
                engine.actor_verts.clear();

                // End of frame cleanup
                engine.input.clear_frame_state();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => engine.input.press(code),
                ElementState::Released => engine.input.release(code),
            },

            _ => {}
        }
    }
}
