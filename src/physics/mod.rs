//! Arcade physics: axis-aligned bodies, gravity, and collision against a
//! tile layer and the world bounds.
//!
//! Movement is resolved one axis at a time. Each axis sweeps the cells between
//! the old and new edge, so fast bodies never tunnel through a tile.

use glam::Vec2;

use crate::geometry::Rect;
use crate::tilemap::TileLayer;

/// Slack used when deciding which cells a body edge touches.
const EPSILON: f32 = 0.01;

/// Which sides of a body were stopped during the last step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Blocked {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

#[derive(Clone, Debug)]
pub struct Body {
    /// Top-left corner of the collision box in world pixels.
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub allow_gravity: bool,
    /// Fraction of horizontal speed kept (and reversed) after hitting a wall.
    pub bounce_x: f32,
    pub collide_world_bounds: bool,
    /// Disabled bodies are neither moved nor collided.
    pub enable: bool,
    pub blocked: Blocked,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(w, h),
            velocity: Vec2::ZERO,
            allow_gravity: true,
            bounce_x: 0.0,
            collide_world_bounds: false,
            enable: true,
            blocked: Blocked::default(),
        }
    }

    pub fn rect(&self) -> Rect { Rect::from_pos_size(self.position, self.size) }
    pub fn left(&self) -> f32 { self.position.x }
    pub fn right(&self) -> f32 { self.position.x + self.size.x }
    pub fn top(&self) -> f32 { self.position.y }
    pub fn bottom(&self) -> f32 { self.position.y + self.size.y }
    pub fn center(&self) -> Vec2 { self.position + self.size * 0.5 }

    fn hit_wall(&mut self) {
        self.velocity.x = -self.velocity.x * self.bounce_x;
    }
}

/// Global physics parameters shared by every body in a level.
#[derive(Clone, Debug)]
pub struct ArcadeWorld {
    /// Downward acceleration in px/s².
    pub gravity: f32,
    pub bounds: Rect,
    pub max_velocity: f32,
}

impl ArcadeWorld {
    pub fn new(gravity: f32, bounds: Rect) -> Self {
        Self { gravity, bounds, max_velocity: 10_000.0 }
    }

    /// Advance `body` by `dt` seconds and resolve collisions.
    pub fn step(&self, body: &mut Body, layer: Option<&TileLayer>, dt: f32) {
        if !body.enable {
            return;
        }
        body.blocked = Blocked::default();

        if body.allow_gravity {
            body.velocity.y += self.gravity * dt;
        }
        body.velocity = body.velocity.clamp(Vec2::splat(-self.max_velocity), Vec2::splat(self.max_velocity));

        let old_x = body.position.x;
        body.position.x += body.velocity.x * dt;
        if let Some(layer) = layer {
            resolve_x(body, layer, old_x);
        }

        let old_y = body.position.y;
        body.position.y += body.velocity.y * dt;
        if let Some(layer) = layer {
            resolve_y(body, layer, old_y);
        }

        if body.collide_world_bounds {
            self.clamp_to_bounds(body);
        }
    }

    fn clamp_to_bounds(&self, body: &mut Body) {
        let b = self.bounds;
        if body.left() < b.left() {
            body.position.x = b.left();
            body.blocked.left = true;
            body.hit_wall();
        } else if body.right() > b.right() {
            body.position.x = b.right() - body.size.x;
            body.blocked.right = true;
            body.hit_wall();
        }
        if body.top() < b.top() {
            body.position.y = b.top();
            body.blocked.up = true;
            body.velocity.y = 0.0;
        } else if body.bottom() > b.bottom() {
            body.position.y = b.bottom() - body.size.y;
            body.blocked.down = true;
            body.velocity.y = 0.0;
        }
    }
}

/// Inclusive range of cells covered by `[start, end)` along one axis.
fn cell_span(start: f32, end: f32, cell: f32) -> (i32, i32) {
    (((start + EPSILON) / cell).floor() as i32, ((end - EPSILON) / cell).floor() as i32)
}

fn column_blocked(layer: &TileLayer, col: i32, rows: (i32, i32)) -> bool {
    (rows.0..=rows.1).any(|row| layer.is_solid(col, row))
}

fn row_blocked(layer: &TileLayer, row: i32, cols: (i32, i32)) -> bool {
    (cols.0..=cols.1).any(|col| layer.is_solid(col, row))
}

fn resolve_x(body: &mut Body, layer: &TileLayer, old_x: f32) {
    let dx = body.position.x - old_x;
    if dx == 0.0 {
        return;
    }
    let tw = layer.tile_width as f32;
    let rows = cell_span(body.top(), body.bottom(), layer.tile_height as f32);

    if dx > 0.0 {
        let old_right = old_x + body.size.x;
        let first = ((old_right - EPSILON) / tw).ceil() as i32;
        let last = ((body.right() - EPSILON) / tw).floor() as i32;
        if let Some(col) = (first..=last).find(|&c| column_blocked(layer, c, rows)) {
            body.position.x = col as f32 * tw - body.size.x;
            body.blocked.right = true;
            body.hit_wall();
        }
    } else {
        let first = ((old_x + EPSILON) / tw).floor() as i32 - 1;
        let last = ((body.left() + EPSILON) / tw).floor() as i32;
        if let Some(col) = (last..=first).rev().find(|&c| column_blocked(layer, c, rows)) {
            body.position.x = (col + 1) as f32 * tw;
            body.blocked.left = true;
            body.hit_wall();
        }
    }
}

fn resolve_y(body: &mut Body, layer: &TileLayer, old_y: f32) {
    let dy = body.position.y - old_y;
    if dy == 0.0 {
        return;
    }
    let th = layer.tile_height as f32;
    let cols = cell_span(body.left(), body.right(), layer.tile_width as f32);

    if dy > 0.0 {
        let old_bottom = old_y + body.size.y;
        let first = ((old_bottom - EPSILON) / th).ceil() as i32;
        let last = ((body.bottom() - EPSILON) / th).floor() as i32;
        if let Some(row) = (first..=last).find(|&r| row_blocked(layer, r, cols)) {
            body.position.y = row as f32 * th - body.size.y;
            body.blocked.down = true;
            body.velocity.y = 0.0;
        }
    } else {
        let first = ((old_y + EPSILON) / th).floor() as i32 - 1;
        let last = ((body.top() + EPSILON) / th).floor() as i32;
        if let Some(row) = (last..=first).rev().find(|&r| row_blocked(layer, r, cols)) {
            body.position.y = (row + 1) as f32 * th;
            body.blocked.up = true;
            body.velocity.y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_span_excludes_touching_neighbours() {
        // A 16px-wide box exactly on cell 1 must not report cells 0 or 2.
        assert_eq!(cell_span(16.0, 32.0, 16.0), (1, 1));
        assert_eq!(cell_span(10.0, 30.0, 16.0), (0, 1));
    }
}
