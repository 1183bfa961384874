use std::rc::Rc;

use glam::Vec2;

use crate::animation::{AnimationPlayer, AnimationSet};
use crate::config::{EnemySettings, GameConfig, PlayerSettings};
use crate::error::GameError;
use crate::geometry::Rect;
use crate::physics::{ArcadeWorld, Body};
use crate::tilemap::{MapObject, TileLayer, Tilemap};

use super::LevelId;

pub const WALKABLE_LAYER: &str = "Walkable";
pub const COINS_LAYER: &str = "Coins";
pub const ENEMIES_LAYER: &str = "Enemies";
/// Tile layers drawn by a level, back to front.
pub const DRAW_LAYERS: [&str; 3] = ["Background", "World", WALKABLE_LAYER];

/// Coin sprite and body size.
const COIN_SIZE: f32 = 16.0;

/// Make every non-empty tile on the walkable layer solid.
pub fn prepare_map(map: &mut Tilemap) -> Result<(), GameError> {
    let walkable = map
        .tile_layer_mut(WALKABLE_LAYER)
        .ok_or_else(|| GameError::MissingLayer(WALKABLE_LAYER.to_string()))?;
    walkable.set_collision_by_exclusion(&[]);
    Ok(())
}

/// Player intent for one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelEvent {
    CoinCollected,
    /// Every coin of the level has been collected. Emitted once.
    LevelComplete,
    EnemyStomped,
    PlayerDied,
    DeathAnimationFinished,
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// A physics body with an animated sprite drawn around it.
#[derive(Clone, Debug)]
pub struct Actor {
    pub body: Body,
    /// Offset of the body from the sprite's top-left corner.
    pub body_offset: Vec2,
    pub frame_size: Vec2,
    pub anim: AnimationPlayer,
    pub flip_x: bool,
}

impl Actor {
    fn new(sprite_pos: Vec2, frame_size: Vec2, body_size: Vec2, body_offset: Vec2) -> Self {
        let origin = sprite_pos + body_offset;
        Self {
            body: Body::new(origin.x, origin.y, body_size.x, body_size.y),
            body_offset,
            frame_size,
            anim: AnimationPlayer::new(),
            flip_x: false,
        }
    }

    pub fn sprite_pos(&self) -> Vec2 {
        self.body.position - self.body_offset
    }

    pub fn sprite_rect(&self) -> Rect {
        Rect::from_pos_size(self.sprite_pos(), self.frame_size)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlimeKind {
    Green,
    Purple,
}

impl SlimeKind {
    /// Parse the `type` property of an enemy object. Missing values mean
    /// green; unknown values fall back to green with a warning.
    pub fn from_property(value: Option<&str>) -> Self {
        match value {
            None | Some("slime_green") => SlimeKind::Green,
            Some("slime_purple") => SlimeKind::Purple,
            Some(other) => {
                log::warn!("unknown enemy type '{other}', using slime_green");
                SlimeKind::Green
            }
        }
    }

    pub fn sheet(self) -> &'static str {
        match self {
            SlimeKind::Green => "slime_green",
            SlimeKind::Purple => "slime_purple",
        }
    }

    pub fn walk_animation(self) -> &'static str {
        match self {
            SlimeKind::Green => "slime_green_walk",
            SlimeKind::Purple => "slime_purple_walk",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Slime {
    pub kind: SlimeKind,
    pub actor: Actor,
}

#[derive(Clone, Debug)]
pub struct Coin {
    /// Top-left corner; coins do not move.
    pub position: Vec2,
    pub anim: AnimationPlayer,
}

impl Coin {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.position, Vec2::splat(COIN_SIZE))
    }
}

// ── Level ─────────────────────────────────────────────────────────────────────

pub struct Level {
    id: LevelId,
    map: Rc<Tilemap>,
    animations: Rc<AnimationSet>,
    world: ArcadeWorld,
    player_cfg: PlayerSettings,
    enemy_cfg: EnemySettings,
    player: Actor,
    coins: Vec<Coin>,
    slimes: Vec<Slime>,
    total_coins: u32,
    collected: u32,
    is_dead: bool,
    completed: bool,
}

impl Level {
    /// Populate a level from its map. The map must already have been through
    /// [`prepare_map`].
    pub fn new(
        id: LevelId,
        map: Rc<Tilemap>,
        config: &GameConfig,
        animations: Rc<AnimationSet>,
    ) -> Result<Self, GameError> {
        if map.tile_layer(WALKABLE_LAYER).is_none() {
            return Err(GameError::MissingLayer(WALKABLE_LAYER.to_string()));
        }

        let bounds = Rect::new(0.0, 0.0, map.width_in_pixels(), map.height_in_pixels());
        let mut world = ArcadeWorld::new(config.physics.gravity, bounds);
        world.max_velocity = config.physics.max_velocity;

        let p = &config.player;
        let frame = Vec2::from(p.frame_size);
        // The spawn point is the sprite's bottom-left corner.
        let spawn = Vec2::new(p.spawn[0], p.spawn[1] - frame.y);
        let mut player = Actor::new(spawn, frame, Vec2::from(p.body_size), Vec2::from(p.body_offset));
        player.body.collide_world_bounds = true;
        player.anim.play(&animations, "idle", false);

        let coins: Vec<Coin> = map
            .objects(COINS_LAYER)
            .iter()
            .map(|obj| {
                let mut anim = AnimationPlayer::new();
                anim.play(&animations, "spin", false);
                Coin { position: Vec2::new(obj.x, obj.y - obj.height), anim }
            })
            .collect();

        let slimes: Vec<Slime> = map
            .objects(ENEMIES_LAYER)
            .iter()
            .map(|obj| spawn_slime(obj, &config.enemy, &animations))
            .collect();

        log::info!(
            "{}: {} coins, {} slimes, map {}x{} px",
            id.scene_key(),
            coins.len(),
            slimes.len(),
            bounds.w,
            bounds.h
        );

        Ok(Self {
            id,
            map,
            animations,
            world,
            player_cfg: config.player.clone(),
            enemy_cfg: config.enemy.clone(),
            player,
            total_coins: coins.len() as u32,
            coins,
            slimes,
            collected: 0,
            is_dead: false,
            completed: false,
        })
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn id(&self) -> LevelId { self.id }
    pub fn map(&self) -> &Tilemap { &self.map }
    pub fn world(&self) -> &ArcadeWorld { &self.world }
    pub fn player(&self) -> &Actor { &self.player }
    pub fn player_mut(&mut self) -> &mut Actor { &mut self.player }
    pub fn coins(&self) -> &[Coin] { &self.coins }
    pub fn slimes(&self) -> &[Slime] { &self.slimes }
    pub fn slimes_mut(&mut self) -> &mut [Slime] { &mut self.slimes }
    pub fn total_coins(&self) -> u32 { self.total_coins }
    pub fn collected(&self) -> u32 { self.collected }
    pub fn is_dead(&self) -> bool { self.is_dead }
    pub fn is_complete(&self) -> bool { self.completed }

    /// Point the camera follows: the centre of the player's body.
    pub fn camera_target(&self) -> Vec2 {
        self.player.body.center()
    }

    // ── Simulation ─────────────────────────────────────────────────────────

    /// Advance the level by `dt` seconds.
    pub fn update(&mut self, controls: Controls, dt: f32) -> Vec<LevelEvent> {
        let mut events = Vec::new();
        let map = Rc::clone(&self.map);
        let walkable = map.tile_layer(WALKABLE_LAYER);

        if !self.is_dead {
            self.apply_controls(controls);
        }

        self.world.step(&mut self.player.body, walkable, dt);
        for slime in &mut self.slimes {
            self.world.step(&mut slime.actor.body, walkable, dt);
        }

        if !self.is_dead {
            self.collect_coins(&mut events);
        }
        if !self.is_dead {
            self.resolve_enemy_contacts(&mut events);
        }
        if !self.is_dead && self.player.sprite_rect().bottom() > self.world.bounds.bottom() {
            log::debug!("player fell out of the world");
            self.die(&mut events);
        }

        // Patrols stop turning once the player is dead; physics keeps running.
        if !self.is_dead {
            if let Some(layer) = walkable {
                self.turn_slimes_at_edges(layer);
            }
        }
        for slime in &mut self.slimes {
            slime.actor.flip_x = slime.actor.body.velocity.x > 0.0;
        }

        if self.player.anim.tick(dt).as_deref() == Some("death") {
            events.push(LevelEvent::DeathAnimationFinished);
        }
        for coin in &mut self.coins {
            coin.anim.tick(dt);
        }
        for slime in &mut self.slimes {
            slime.actor.anim.tick(dt);
        }

        events
    }

    /// Kill the player: stop them, play the death animation and take their
    /// body out of the simulation. Returns false if they were already dead.
    pub fn handle_player_death(&mut self) -> bool {
        if self.is_dead {
            return false;
        }
        self.is_dead = true;
        self.player.body.velocity = Vec2::ZERO;
        self.player.anim.play(&self.animations, "death", false);
        self.player.body.enable = false;
        log::info!("{}: player died", self.id.scene_key());
        true
    }

    fn die(&mut self, events: &mut Vec<LevelEvent>) {
        if self.handle_player_death() {
            events.push(LevelEvent::PlayerDied);
        }
    }

    fn apply_controls(&mut self, controls: Controls) {
        let speed = self.player_cfg.run_speed;
        let player = &mut self.player;
        if controls.left {
            player.body.velocity.x = -speed;
            player.flip_x = true;
            player.anim.play(&self.animations, "run", true);
        } else if controls.right {
            player.body.velocity.x = speed;
            player.flip_x = false;
            player.anim.play(&self.animations, "run", true);
        } else {
            player.body.velocity.x = 0.0;
            player.anim.play(&self.animations, "idle", true);
        }

        if controls.jump && player.body.blocked.down {
            player.body.velocity.y = -self.player_cfg.jump_velocity;
        }
    }

    fn collect_coins(&mut self, events: &mut Vec<LevelEvent>) {
        let body = self.player.body.rect();
        let before = self.coins.len();
        self.coins.retain(|coin| !coin.rect().intersects(&body));
        let picked = (before - self.coins.len()) as u32;

        for _ in 0..picked {
            self.collected = (self.collected + 1).min(self.total_coins);
            events.push(LevelEvent::CoinCollected);
            if self.collected == self.total_coins && !self.completed {
                self.completed = true;
                log::info!("{}: all {} coins collected", self.id.scene_key(), self.total_coins);
                events.push(LevelEvent::LevelComplete);
            }
        }
    }

    fn resolve_enemy_contacts(&mut self, events: &mut Vec<LevelEvent>) {
        let mut i = 0;
        while i < self.slimes.len() {
            if !self.player.body.rect().intersects(&self.slimes[i].actor.body.rect()) {
                i += 1;
                continue;
            }
            let falling = self.player.body.velocity.y > 0.0;
            let above = self.player.sprite_rect().bottom() < self.slimes[i].actor.sprite_rect().center().y;
            if falling && above {
                self.slimes.remove(i);
                self.player.body.velocity.y = -self.player_cfg.stomp_bounce;
                events.push(LevelEvent::EnemyStomped);
            } else {
                self.die(events);
                return;
            }
        }
    }

    /// Reverse every grounded slime whose next step would leave solid ground.
    fn turn_slimes_at_edges(&mut self, walkable: &TileLayer) {
        let depth = self.enemy_cfg.edge_check_depth;
        for slime in &mut self.slimes {
            let body = &mut slime.actor.body;
            if !body.enable || !body.blocked.down {
                continue;
            }
            let direction = if body.velocity.x < 0.0 { -1.0 } else { 1.0 };
            let center = body.center();
            let ahead_x = center.x + direction * body.size.x * 0.5;
            let ahead_y = center.y + body.size.y * 0.5 + depth;
            let has_ground = walkable.tile_at_world_xy(ahead_x, ahead_y).is_some_and(|t| t.collides);
            if !has_ground {
                body.velocity.x = -body.velocity.x;
            }
        }
    }
}

fn spawn_slime(obj: &MapObject, cfg: &EnemySettings, animations: &AnimationSet) -> Slime {
    let kind = SlimeKind::from_property(obj.property_str("type"));
    let frame = Vec2::from(cfg.frame_size);
    let body_size = Vec2::from(cfg.body_size);
    // Enemy objects mark the slime's centre one frame height above their y.
    let center = Vec2::new(obj.x, obj.y - frame.y);
    let mut actor = Actor::new(center - frame * 0.5, frame, body_size, (frame - body_size) * 0.5);
    actor.body.velocity.x = -cfg.patrol_speed;
    actor.body.bounce_x = 1.0;
    actor.body.collide_world_bounds = true;
    actor.anim.play(animations, kind.walk_animation(), false);
    Slime { kind, actor }
}
