use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
pub use winit::keyboard::KeyCode;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::assets::{AssetManifest, FONT_KEY, PIXEL_KEY};
use crate::audio::AudioContext;
use crate::camera::Camera;
use crate::error::GameError;
use crate::geometry::Rect;
use crate::input::InputState;
use crate::renderer::font;
use crate::renderer::pipeline::{SpriteVertex, push_quad};
use crate::renderer::Renderer;

// ── Color ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Self = Self([1.0, 1.0, 1.0, 1.0]);
    pub const BLACK: Self = Self([0.0, 0.0, 0.0, 1.0]);
    pub const RED: Self = Self([1.0, 0.0, 0.0, 1.0]);
    pub const GREEN: Self = Self([0.0, 1.0, 0.0, 1.0]);
    pub const MAGENTA: Self = Self([1.0, 0.0, 1.0, 1.0]);
}

// ── Game trait ──────────────────────────────────────────────────────────────

pub trait Game {
    fn on_enter(&mut self, _engine: &mut Engine) {}
    fn update(&mut self, engine: &mut Engine);
    fn render(&mut self, engine: &mut Engine);
}

/// Which projection a draw call goes through.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layer {
    /// World space, scrolled and zoomed by the camera.
    World,
    /// Screen space, drawn on top of the world.
    Ui,
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct Engine {
    /// GPU renderer: surface, pipeline and sprite atlas.
    pub renderer: Renderer,
    pub(crate) camera: Camera,
    world_vertices: Vec<SpriteVertex>,
    ui_vertices: Vec<SpriteVertex>,
    dt: f32,
    pub input: InputState,
    /// Set by `request_quit()`; the event loop exits after the current tick.
    pub(crate) quit_requested: bool,
    /// Fatal error raised by a scene; `EngineBuilder::run` returns it.
    failure: Option<GameError>,
    /// Debug overlay flag; `--debug` or the config turns it on, F1 toggles it.
    pub debug: bool,
    pub audio: AudioContext,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    fn from_builder(renderer: Renderer, audio: AudioContext, debug: bool) -> Self {
        let (w, h) = renderer.size();
        Self {
            renderer,
            camera: Camera::new(w as f32 / 2.0, h as f32 / 2.0),
            world_vertices: Vec::new(),
            ui_vertices: Vec::new(),
            dt: 0.0,
            input: InputState::new(),
            quit_requested: false,
            failure: None,
            debug,
            audio,
        }
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn dt(&self) -> f32 { self.dt }

    /// Surface size in pixels.
    pub fn screen_size(&self) -> Vec2 {
        let (w, h) = self.renderer.size();
        Vec2::new(w as f32, h as f32)
    }

    // ── Camera API ─────────────────────────────────────────────────────────

    pub fn camera(&self) -> &Camera { &self.camera }
    pub fn camera_mut(&mut self) -> &mut Camera { &mut self.camera }

    /// World rectangle currently on screen.
    pub fn visible_world_rect(&self) -> Rect {
        self.camera.visible_rect(self.screen_size())
    }

    /// Signal that the application should exit. The event loop calls
    /// `exit()` after the current update tick completes.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Stop the game with `error`. The event loop exits after the current
    /// tick and `EngineBuilder::run` returns the error.
    pub fn fail(&mut self, error: GameError) {
        log::error!("{error}");
        self.failure = Some(error);
        self.quit_requested = true;
    }

    // ── Audio API ──────────────────────────────────────────────────────────

    pub fn play_sound(&mut self, name: &str) {
        self.audio.play(name);
    }

    pub fn play_music(&mut self, name: &str, volume: f32) {
        self.audio.play_music(name, volume);
    }

    pub fn stop_music(&mut self) {
        self.audio.stop_music();
    }

    // ── Drawing ────────────────────────────────────────────────────────────

    fn vertices(&mut self, layer: Layer) -> &mut Vec<SpriteVertex> {
        match layer {
            Layer::World => &mut self.world_vertices,
            Layer::Ui => &mut self.ui_vertices,
        }
    }

    /// Draw frame `frame` of sprite sheet `key` with its top-left at `pos`.
    pub fn draw_frame(&mut self, key: &str, frame: u32, pos: Vec2, flip_x: bool, tint: Color) {
        let Some(sheet) = self.renderer.sheet(key) else { return };
        let Some((uv_min, uv_max)) = sheet.frame_uv(frame) else { return };
        let size = [sheet.frame_w as f32, sheet.frame_h as f32];
        push_quad(&mut self.world_vertices, pos.to_array(), size, uv_min, uv_max, tint.0, flip_x);
    }

    /// Draw the pixel rectangle `src` (x, y, w, h) of image `key` into the
    /// world at `pos`, unscaled.
    pub fn draw_region(&mut self, key: &str, src: (u32, u32, u32, u32), pos: Vec2) {
        let Some(sheet) = self.renderer.sheet(key) else { return };
        let (x, y, w, h) = src;
        let (uv_min, uv_max) = sheet.region_uv(x, y, w, h);
        push_quad(
            &mut self.world_vertices,
            pos.to_array(),
            [w as f32, h as f32],
            uv_min,
            uv_max,
            Color::WHITE.0,
            false,
        );
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color, layer: Layer) {
        let Some(sheet) = self.renderer.sheet(PIXEL_KEY) else { return };
        // Sample the centre of the white texture so edges never pick up the gutter.
        let (uv_min, uv_max) = sheet.region_uv(1, 1, 2, 2);
        push_quad(self.vertices(layer), [rect.x, rect.y], [rect.w, rect.h], uv_min, uv_max, color.0, false);
    }

    pub fn draw_rect_outline(&mut self, rect: Rect, thickness: f32, color: Color, layer: Layer) {
        let t = thickness.min(rect.w / 2.0).min(rect.h / 2.0);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, t), color, layer);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.w, t), color, layer);
        self.fill_rect(Rect::new(rect.x, rect.y + t, t, rect.h - 2.0 * t), color, layer);
        self.fill_rect(Rect::new(rect.right() - t, rect.y + t, t, rect.h - 2.0 * t), color, layer);
    }

    /// Draw `text` on screen with its top-left at `(x, y)`. `size` is the
    /// line height in pixels.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Color) {
        let Some(sheet) = self.renderer.sheet(FONT_KEY).cloned() else { return };
        let scale = size / font::CELL_H as f32;
        let advance = font::CELL_W as f32 * scale;
        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let Some((uv_min, uv_max)) = sheet.frame_uv(font::glyph_index(ch)) else { continue };
            push_quad(
                &mut self.ui_vertices,
                [x + i as f32 * advance, y],
                [advance, size],
                uv_min,
                uv_max,
                color.0,
                false,
            );
        }
    }

    /// Upload the current camera matrix to the GPU.
    fn sync_camera(&mut self) {
        let size = self.screen_size();
        let uniform = self.camera.build_view_proj(size.x, size.y);
        self.renderer.update_camera(&uniform);
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

pub struct EngineBuilder {
    title: String,
    width: u32,
    height: u32,
    target_ups: u32,
    assets: AssetManifest,
    sfx_volume: f32,
    debug_enabled: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            title: "coin-knight".into(),
            width: 800,
            height: 600,
            target_ups: 60,
            assets: AssetManifest::default(),
            sfx_volume: 1.0,
            debug_enabled: false,
        }
    }
}

impl EngineBuilder {
    pub fn with_title(mut self, title: &str) -> Self { self.title = title.into(); self }
    pub fn with_size(mut self, width: u32, height: u32) -> Self { self.width = width; self.height = height; self }
    pub fn with_ups(mut self, ups: u32) -> Self { self.target_ups = ups.max(1); self }
    pub fn with_debug(mut self, enabled: bool) -> Self { self.debug_enabled = enabled; self }
    pub fn with_sfx_volume(mut self, volume: f32) -> Self { self.sfx_volume = volume; self }

    /// Images and sounds to load before the first frame. Images are baked
    /// into the sprite atlas once at startup.
    pub fn with_assets(mut self, assets: AssetManifest) -> Self {
        self.assets = assets; self
    }

    pub fn run(mut self, game: impl Game + 'static) -> Result<(), GameError> {
        if std::env::args().any(|arg| arg == "--debug") {
            self.debug_enabled = true;
        }

        let event_loop = EventLoop::new()?;
        let fixed_dt = 1.0 / self.target_ups as f32;
        let mut app = App {
            config: self,
            game: Box::new(game),
            engine: None,
            last_instant: None,
            accumulator: 0.0,
            fixed_dt,
            error: None,
        };
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: EngineBuilder,
    game: Box<dyn Game>,
    engine: Option<Engine>,
    last_instant: Option<Instant>,
    accumulator: f32,
    fixed_dt: f32,
    /// Startup or scene failure reported back through `EngineBuilder::run`.
    error: Option<GameError>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<Engine, GameError> {
        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(&self.config.title)
                    .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height))
                    .with_resizable(false),
            )?,
        );

        let images = self.config.assets.load_images();
        let renderer = pollster::block_on(Renderer::new(window, &images))?;

        let mut audio = AudioContext::new();
        audio.sfx_volume = self.config.sfx_volume;
        for sound in self.config.assets.sounds() {
            audio.load_sound(&sound.key, self.config.assets.resolve(&sound.path));
        }

        Ok(Engine::from_builder(renderer, audio, self.config.debug_enabled))
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(mut engine) => {
                self.game.on_enter(&mut engine);
                if let Some(e) = engine.failure.take() {
                    self.error = Some(e);
                    event_loop.exit();
                }
                self.engine = Some(engine);
            }
            Err(e) => {
                log::error!("engine startup failed: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
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

            WindowEvent::Resized(size) => engine.renderer.resize(size),

            WindowEvent::CursorMoved { position, .. } => {
                engine.input.mouse_pos = [position.x as f32, position.y as f32];
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => engine.input.mouse_down(button),
                ElementState::Released => engine.input.mouse_up(button),
            },

            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => engine.input.mouse_wheel += y,
                MouseScrollDelta::PixelDelta(pos) => engine.input.mouse_wheel += (pos.y / 100.0) as f32,
            },

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = match self.last_instant {
                    Some(prev) => now.duration_since(prev).as_secs_f32().min(0.25),
                    None => self.fixed_dt,
                };
                self.last_instant = Some(now);
                self.accumulator += elapsed;

                while self.accumulator >= self.fixed_dt {
                    engine.dt = self.fixed_dt;
                    self.game.update(engine);
                    // Edge-triggered input belongs to exactly one tick.
                    engine.input.clear_frame_state();
                    if engine.quit_requested {
                        self.error = engine.failure.take();
                        event_loop.exit();
                        return;
                    }
                    self.accumulator -= self.fixed_dt;
                }

                let viewport = engine.screen_size();
                engine.camera.tick(elapsed, viewport);

                engine.world_vertices.clear();
                engine.ui_vertices.clear();
                self.game.render(engine);

                engine.sync_camera();
                let world_verts = std::mem::take(&mut engine.world_vertices);
                let ui_verts = std::mem::take(&mut engine.ui_vertices);
                match engine.renderer.render(&world_verts, &ui_verts, Color::BLACK.0) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = engine.renderer.window.inner_size();
                        engine.renderer.resize(size);
                    }
                    Err(e) => log::error!("render error: {e}"),
                }
                // Hand the allocations back for the next frame.
                engine.world_vertices = world_verts;
                engine.ui_vertices = ui_verts;
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if repeat {
                        return;
                    }
                    engine.input.key_down(code);
                    if code == KeyCode::F1 {
                        engine.debug = !engine.debug;
                        log::info!("debug overlay {}", if engine.debug { "on" } else { "off" });
                    }
                }
                ElementState::Released => engine.input.key_up(code),
            },

            _ => {}
        }
    }
}
