use std::collections::HashMap;
use std::rc::Rc;

// ── Definitions ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Repeat {
    Loop,
    Once,
}

/// A named frame sequence over one sprite sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationDef {
    pub key: String,
    /// Texture key of the sprite sheet the frames index into.
    pub sheet: String,
    pub frames: Vec<u32>,
    /// Frames per second.
    pub frame_rate: f32,
    pub repeat: Repeat,
}

impl AnimationDef {
    pub fn new(key: &str, sheet: &str, frames: Vec<u32>, frame_rate: f32, repeat: Repeat) -> Self {
        Self { key: key.into(), sheet: sheet.into(), frames, frame_rate, repeat }
    }

    /// Seconds each frame stays on screen.
    pub fn frame_duration(&self) -> f32 {
        if self.frame_rate > 0.0 { 1.0 / self.frame_rate } else { f32::INFINITY }
    }
}

/// Frame indices `start..=end`.
pub fn generate_frame_numbers(start: u32, end: u32) -> Vec<u32> {
    (start..=end).collect()
}

/// Registry of animation definitions by key.
#[derive(Debug, Default)]
pub struct AnimationSet {
    defs: HashMap<String, Rc<AnimationDef>>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `def`, replacing any definition with the same key.
    pub fn create(&mut self, def: AnimationDef) {
        self.defs.insert(def.key.clone(), Rc::new(def));
    }

    pub fn get(&self, key: &str) -> Option<&Rc<AnimationDef>> {
        self.defs.get(key)
    }

    pub fn len(&self) -> usize { self.defs.len() }
    pub fn is_empty(&self) -> bool { self.defs.is_empty() }
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Per-sprite playback state.
#[derive(Clone, Debug, Default)]
pub struct AnimationPlayer {
    current: Option<Rc<AnimationDef>>,
    index: usize,
    elapsed: f32,
    finished: bool,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the animation `key`. With `ignore_if_playing`, an animation with
    /// the same key that is still running keeps its current frame.
    ///
    /// Returns false (and leaves playback unchanged) if `key` is unknown.
    pub fn play(&mut self, set: &AnimationSet, key: &str, ignore_if_playing: bool) -> bool {
        if ignore_if_playing && self.is_playing() && self.current_key() == Some(key) {
            return true;
        }
        let Some(def) = set.get(key) else {
            log::warn!("animation '{key}' is not defined");
            return false;
        };
        self.current = Some(Rc::clone(def));
        self.index = 0;
        self.elapsed = 0.0;
        self.finished = false;
        true
    }

    /// Advance playback by `dt` seconds. Returns the key of a `Once`
    /// animation that completed during this tick; the last frame is held.
    pub fn tick(&mut self, dt: f32) -> Option<String> {
        let def = self.current.as_ref()?;
        if self.finished || def.frames.is_empty() {
            return None;
        }
        let step = def.frame_duration();
        self.elapsed += dt;
        while self.elapsed >= step {
            self.elapsed -= step;
            if self.index + 1 < def.frames.len() {
                self.index += 1;
            } else if def.repeat == Repeat::Loop {
                self.index = 0;
            } else {
                self.finished = true;
                self.elapsed = 0.0;
                return Some(def.key.clone());
            }
        }
        None
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some() && !self.finished
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_deref().map(|d| d.key.as_str())
    }

    pub fn sheet(&self) -> Option<&str> {
        self.current.as_deref().map(|d| d.sheet.as_str())
    }

    /// Sheet frame index currently shown.
    pub fn frame(&self) -> Option<u32> {
        self.current.as_deref().and_then(|d| d.frames.get(self.index).copied())
    }
}
