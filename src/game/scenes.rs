use std::rc::Rc;

use glam::Vec2;

use crate::engine::{Color, Engine, Layer};
use crate::error::GameError;
use crate::geometry::Rect;
use crate::scene::{Scene, SceneAction};

use super::level::{Controls, DRAW_LAYERS, Level, LevelEvent};
use super::{Action, COIN_SOUND, GameContext, LevelId};

/// Where the win and lose screens put their two lines of text.
const TITLE_POS: (f32, f32) = (100.0, 100.0);
const PROMPT_POS: (f32, f32) = (100.0, 160.0);
const TITLE_SIZE: f32 = 32.0;
const PROMPT_SIZE: f32 = 20.0;

// ── Transitions ───────────────────────────────────────────────────────────────

/// Scene change caused by a level event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Every coin of the level was collected.
    Win(LevelId),
    /// The player's death animation has ended.
    Lose(LevelId),
}

impl Transition {
    pub fn into_scene(self, ctx: Rc<GameContext>) -> Box<dyn Scene> {
        match self {
            Transition::Win(id) => Box::new(WinScene::new(ctx, id)),
            Transition::Lose(id) => Box::new(LoseScene::new(ctx, Some(id))),
        }
    }
}

/// The scene change, if any, that `event` triggers while playing level `id`.
pub fn on_level_event(id: LevelId, event: LevelEvent) -> Option<Transition> {
    match event {
        LevelEvent::LevelComplete => Some(Transition::Win(id)),
        LevelEvent::DeathAnimationFinished => Some(Transition::Lose(id)),
        LevelEvent::CoinCollected | LevelEvent::EnemyStomped | LevelEvent::PlayerDied => None,
    }
}

// ── LevelScene ────────────────────────────────────────────────────────────────

pub struct LevelScene {
    ctx: Rc<GameContext>,
    id: LevelId,
    /// Built on enter, dropped on exit.
    level: Option<Level>,
}

impl LevelScene {
    pub fn new(ctx: Rc<GameContext>, id: LevelId) -> Self {
        Self { ctx, id, level: None }
    }

    pub fn level_id(&self) -> LevelId {
        self.id
    }

    /// Fresh simulation of this scene's level.
    pub fn build_level(&self) -> Result<Level, GameError> {
        let map = self.ctx.map(self.id)?;
        Level::new(self.id, map, &self.ctx.config, Rc::clone(&self.ctx.animations))
    }

    fn read_controls(&self, engine: &Engine) -> Controls {
        let actions = &self.ctx.actions;
        Controls {
            left: actions.is_held(Action::Left, &engine.input),
            right: actions.is_held(Action::Right, &engine.input),
            jump: actions.is_held(Action::Jump, &engine.input),
        }
    }
}

impl Scene for LevelScene {
    fn on_enter(&mut self, engine: &mut Engine) {
        let level = match self.build_level() {
            Ok(level) => level,
            Err(e) => {
                log::error!("cannot start {}", self.id.scene_key());
                engine.fail(e);
                return;
            }
        };

        engine.play_music(self.id.music_key(), self.ctx.config.audio.music_volume);

        let viewport = engine.screen_size();
        let bounds = level.world().bounds;
        let camera = engine.camera_mut();
        camera.set_zoom(self.ctx.config.camera.zoom);
        camera.set_bounds(bounds);
        camera.follow(level.camera_target(), viewport);

        self.level = Some(level);
    }

    fn on_exit(&mut self, _engine: &mut Engine) {
        self.level = None;
    }

    fn update(&mut self, engine: &mut Engine) -> SceneAction {
        if self.ctx.actions.is_pressed(Action::Quit, &engine.input) {
            return SceneAction::Quit;
        }

        let wheel = engine.input.mouse_wheel;
        if wheel != 0.0 {
            let cam = &self.ctx.config.camera;
            engine.camera_mut().zoom_by(wheel * cam.wheel_step, cam.min_zoom, cam.max_zoom);
        }

        let controls = self.read_controls(engine);
        let dt = engine.dt();
        let Some(level) = self.level.as_mut() else { return SceneAction::None };

        for event in level.update(controls, dt) {
            if let Some(transition) = on_level_event(self.id, event) {
                if matches!(transition, Transition::Win(_)) {
                    engine.stop_music();
                }
                return SceneAction::Switch(transition.into_scene(Rc::clone(&self.ctx)));
            }
            match event {
                LevelEvent::CoinCollected => engine.play_sound(COIN_SOUND),
                _ => log::debug!("{}: {event:?}", self.id.scene_key()),
            }
        }

        let viewport = engine.screen_size();
        engine.camera_mut().follow(level.camera_target(), viewport);
        SceneAction::None
    }

    fn draw(&mut self, engine: &mut Engine) {
        let Some(level) = self.level.as_ref() else { return };
        let visible = engine.visible_world_rect();
        let map = level.map();

        // ── Tiles ─────────────────────────────────────────────────────────────
        for name in DRAW_LAYERS {
            let Some(layer) = map.tile_layer(name) else { continue };
            if !layer.visible {
                continue;
            }
            let (tw, th) = (layer.tile_width as f32, layer.tile_height as f32);
            for tile in layer.tiles() {
                let cell = Rect::new(tile.col as f32 * tw, tile.row as f32 * th, tw, th);
                if !cell.intersects(&visible) {
                    continue;
                }
                let Some(tileset) = map.tileset_for_gid(tile.gid) else { continue };
                let Some(src) = tileset.source_rect(tile.gid) else { continue };
                // Oversized tiles hang up from the bottom of their cell.
                let pos = Vec2::new(cell.x, cell.bottom() - src.3 as f32);
                engine.draw_region(&tileset.name, src, pos);
            }
        }

        // ── Sprites ───────────────────────────────────────────────────────────
        for coin in level.coins() {
            if let Some(frame) = coin.anim.frame() {
                engine.draw_frame("coin", frame, coin.position, false, Color::WHITE);
            }
        }
        for slime in level.slimes() {
            if let Some(frame) = slime.actor.anim.frame() {
                let sheet = slime.actor.anim.sheet().unwrap_or(slime.kind.sheet());
                engine.draw_frame(sheet, frame, slime.actor.sprite_pos(), slime.actor.flip_x, Color::WHITE);
            }
        }
        let player = level.player();
        if let Some(frame) = player.anim.frame() {
            let sheet = player.anim.sheet().unwrap_or("knight");
            engine.draw_frame(sheet, frame, player.sprite_pos(), player.flip_x, Color::WHITE);
        }

        // ── Debug overlay ─────────────────────────────────────────────────────
        if engine.debug {
            let thickness = 1.0 / engine.camera().zoom.max(0.01);
            if player.body.enable {
                engine.draw_rect_outline(player.body.rect(), thickness, Color::MAGENTA, Layer::World);
            }
            for slime in level.slimes() {
                engine.draw_rect_outline(slime.actor.body.rect(), thickness, Color::MAGENTA, Layer::World);
            }
            for coin in level.coins() {
                engine.draw_rect_outline(coin.rect(), thickness, Color::MAGENTA, Layer::World);
            }
            let hud = format!("coins {}/{}", level.collected(), level.total_coins());
            engine.draw_text(&hud, 8.0, 8.0, 16.0, Color::WHITE);
        }
    }

    fn name(&self) -> &str {
        self.id.scene_key()
    }
}

// ── WinScene ──────────────────────────────────────────────────────────────────

pub struct WinScene {
    ctx: Rc<GameContext>,
    level: LevelId,
}

impl WinScene {
    pub fn new(ctx: Rc<GameContext>, level: LevelId) -> Self {
        Self { ctx, level }
    }

    /// Level SPACE continues with; the last level wraps to the first.
    pub fn next_level(&self) -> LevelId {
        self.level.next()
    }

    pub fn next_scene(&self) -> LevelScene {
        LevelScene::new(Rc::clone(&self.ctx), self.next_level())
    }
}

impl Scene for WinScene {
    fn update(&mut self, engine: &mut Engine) -> SceneAction {
        let actions = &self.ctx.actions;
        if actions.is_pressed(Action::Quit, &engine.input) {
            SceneAction::Quit
        } else if actions.is_pressed(Action::Confirm, &engine.input) {
            SceneAction::Switch(Box::new(self.next_scene()))
        } else {
            SceneAction::None
        }
    }

    fn draw(&mut self, engine: &mut Engine) {
        engine.draw_text(&self.level.win_title(), TITLE_POS.0, TITLE_POS.1, TITLE_SIZE, Color::WHITE);
        engine.draw_text(&self.level.win_prompt(), PROMPT_POS.0, PROMPT_POS.1, PROMPT_SIZE, Color::GREEN);
    }

    fn name(&self) -> &str {
        self.level.win_scene_key()
    }
}

// ── LoseScene ─────────────────────────────────────────────────────────────────

pub struct LoseScene {
    ctx: Rc<GameContext>,
    restart: LevelId,
}

impl LoseScene {
    /// `restart` is the level SPACE goes back to; the first level if `None`.
    pub fn new(ctx: Rc<GameContext>, restart: Option<LevelId>) -> Self {
        Self { ctx, restart: restart.unwrap_or(LevelId::One) }
    }

    pub fn restart(&self) -> LevelId {
        self.restart
    }

    pub fn next_scene(&self) -> LevelScene {
        LevelScene::new(Rc::clone(&self.ctx), self.restart)
    }
}

impl Scene for LoseScene {
    fn update(&mut self, engine: &mut Engine) -> SceneAction {
        let actions = &self.ctx.actions;
        if actions.is_pressed(Action::Quit, &engine.input) {
            SceneAction::Quit
        } else if actions.is_pressed(Action::Confirm, &engine.input) {
            SceneAction::Switch(Box::new(self.next_scene()))
        } else {
            SceneAction::None
        }
    }

    fn draw(&mut self, engine: &mut Engine) {
        engine.draw_text("You Lose!", TITLE_POS.0, TITLE_POS.1, TITLE_SIZE, Color::WHITE);
        engine.draw_text("Press SPACE to retry", PROMPT_POS.0, PROMPT_POS.1, PROMPT_SIZE, Color::RED);
    }

    fn name(&self) -> &str {
        "LoseScene"
    }
}
