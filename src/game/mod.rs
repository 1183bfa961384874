//! Coin Knight: three platformer levels built on the engine layer.
//!
//! Everything that decides game outcomes lives in [`level`] and runs without
//! a window or GPU. [`scenes`] wires a `Level` to the engine: input, audio,
//! camera and drawing.

pub mod level;
pub mod scenes;

use std::collections::HashMap;
use std::rc::Rc;

use crate::animation::{AnimationDef, AnimationSet, Repeat, generate_frame_numbers};
use crate::assets::AssetManifest;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::{ActionMap, InputSource, KeyCode};
use crate::tilemap::Tilemap;

/// Sound played when a coin is picked up.
pub const COIN_SOUND: &str = "coinSound";

// ── Levels ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LevelId {
    One,
    Two,
    Three,
}

impl LevelId {
    pub const ALL: [LevelId; 3] = [LevelId::One, LevelId::Two, LevelId::Three];

    pub fn number(self) -> u32 {
        match self {
            LevelId::One => 1,
            LevelId::Two => 2,
            LevelId::Three => 3,
        }
    }

    pub fn scene_key(self) -> &'static str {
        match self {
            LevelId::One => "LevelOne",
            LevelId::Two => "LevelTwo",
            LevelId::Three => "LevelThree",
        }
    }

    pub fn win_scene_key(self) -> &'static str {
        match self {
            LevelId::One => "WinSceneOne",
            LevelId::Two => "WinSceneTwo",
            LevelId::Three => "WinSceneThree",
        }
    }

    /// Key of the Tiled map, also its file stem under `maps/`.
    pub fn map_key(self) -> &'static str {
        match self {
            LevelId::One => "levelOne",
            LevelId::Two => "levelTwo",
            LevelId::Three => "levelThree",
        }
    }

    pub fn music_key(self) -> &'static str {
        match self {
            LevelId::One => "musicLevelone",
            LevelId::Two => "musicLeveltwo",
            LevelId::Three => "musicLevelthree",
        }
    }

    /// The level that follows this one; the last level wraps to the first.
    pub fn next(self) -> LevelId {
        match self {
            LevelId::One => LevelId::Two,
            LevelId::Two => LevelId::Three,
            LevelId::Three => LevelId::One,
        }
    }

    pub fn win_title(self) -> String {
        format!("Level {} Complete!", self.number())
    }

    pub fn win_prompt(self) -> String {
        match self {
            LevelId::Three => "Press SPACE to restart from Level 1".to_string(),
            _ => format!("Press SPACE to go to Level {}", self.next().number()),
        }
    }

    pub fn map_path(self) -> String {
        format!("maps/{}.tmj", self.map_key())
    }
}

// ── Assets ────────────────────────────────────────────────────────────────────

/// Every image and sound the game loads at startup.
pub fn asset_manifest(config: &GameConfig) -> AssetManifest {
    let mut manifest = AssetManifest::new(&config.asset_dir)
        .image("world_tileset", "tilesets/world_tileset.png")
        .image("platforms", "tilesets/platforms.png")
        .spritesheet("knight", "sprites/knight.png", 32, 32)
        .spritesheet("coin", "sprites/coin.png", 16, 16)
        .spritesheet("slime_green", "sprites/slime_green.png", 24, 24)
        .spritesheet("slime_purple", "sprites/slime_purple.png", 24, 24)
        .audio(COIN_SOUND, "audio/coin.wav");
    for id in LevelId::ALL {
        manifest = manifest.audio(id.music_key(), &format!("audio/{}.mp3", id.music_key()));
    }
    manifest
}

/// The knight, coin and slime animations shared by every level.
pub fn create_animations() -> AnimationSet {
    let mut set = AnimationSet::new();
    let defs = [
        ("idle", "knight", 0, 3, 6.0, Repeat::Loop),
        ("run", "knight", 4, 19, 12.0, Repeat::Loop),
        ("roll", "knight", 20, 27, 14.0, Repeat::Once),
        ("hit", "knight", 28, 31, 8.0, Repeat::Once),
        ("death", "knight", 32, 35, 6.0, Repeat::Once),
        ("spin", "coin", 0, 11, 10.0, Repeat::Loop),
        ("slime_green_walk", "slime_green", 0, 3, 6.0, Repeat::Loop),
        ("slime_purple_walk", "slime_purple", 0, 3, 6.0, Repeat::Loop),
    ];
    for (key, sheet, start, end, rate, repeat) in defs {
        set.create(AnimationDef::new(key, sheet, generate_frame_numbers(start, end), rate, repeat));
    }
    set
}

// ── Controls ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Jump,
    Confirm,
    Quit,
}

pub fn controls() -> ActionMap<Action> {
    ActionMap::new()
        .with(Action::Left, InputSource::Key(KeyCode::ArrowLeft))
        .with(Action::Right, InputSource::Key(KeyCode::ArrowRight))
        .with(Action::Jump, InputSource::Key(KeyCode::ArrowUp))
        .with(Action::Confirm, InputSource::Key(KeyCode::Space))
        .with(Action::Quit, InputSource::Key(KeyCode::Escape))
}

// ── Shared context ────────────────────────────────────────────────────────────

/// State shared by every scene: configuration, animation table, bindings and
/// the prepared maps.
pub struct GameContext {
    pub config: GameConfig,
    pub animations: Rc<AnimationSet>,
    pub actions: ActionMap<Action>,
    maps: HashMap<LevelId, Rc<Tilemap>>,
}

impl GameContext {
    /// Load and validate the map of every level.
    pub fn load(config: GameConfig) -> Result<Self, GameError> {
        let mut maps = HashMap::new();
        for id in LevelId::ALL {
            let path = config.asset_dir.join(id.map_path());
            log::info!("loading map {} from {}", id.map_key(), path.display());
            maps.insert(id, Tilemap::load(&path)?);
        }
        Self::from_maps(config, maps)
    }

    /// Build a context from maps that are already parsed.
    pub fn from_maps(config: GameConfig, maps: HashMap<LevelId, Tilemap>) -> Result<Self, GameError> {
        let maps = maps
            .into_iter()
            .map(|(id, mut map)| {
                level::prepare_map(&mut map)?;
                Ok((id, Rc::new(map)))
            })
            .collect::<Result<HashMap<_, _>, GameError>>()?;
        Ok(Self {
            config,
            animations: Rc::new(create_animations()),
            actions: controls(),
            maps,
        })
    }

    pub fn map(&self, id: LevelId) -> Result<Rc<Tilemap>, GameError> {
        self.maps
            .get(&id)
            .cloned()
            .ok_or_else(|| GameError::MissingMap(id.map_key().to_string()))
    }
}
