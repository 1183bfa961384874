//! Builders for small Tiled maps used across the integration tests.
#![allow(dead_code)]

use std::rc::Rc;

use serde_json::{Value, json};

use coin_knight::config::GameConfig;
use coin_knight::game::level::{Level, prepare_map};
use coin_knight::game::{LevelId, create_animations};
use coin_knight::tilemap::Tilemap;

pub const TILE: u32 = 16;
pub const DT: f32 = 1.0 / 60.0;

/// Row-major gid data with tile 1 on `row` for every column in `cols`.
pub fn ground(width: u32, height: u32, row: u32, cols: std::ops::RangeInclusive<u32>) -> Vec<u32> {
    let mut data = vec![0; (width * height) as usize];
    for col in cols {
        data[(row * width + col) as usize] = 1;
    }
    data
}

pub fn coin(x: f32, y: f32) -> Value {
    json!({ "id": 1, "name": "", "type": "", "x": x, "y": y, "width": 16, "height": 16, "gid": 40 })
}

pub fn slime(x: f32, y: f32, kind: Option<&str>) -> Value {
    let properties = match kind {
        Some(k) => json!([{ "name": "type", "type": "string", "value": k }]),
        None => json!([]),
    };
    json!({ "id": 2, "name": "", "type": "", "x": x, "y": y, "width": 24, "height": 24, "properties": properties })
}

/// A map with a `Walkable` layer plus `Coins` and `Enemies` object layers.
pub fn map_json(width: u32, height: u32, walkable: &[u32], coins: &[Value], enemies: &[Value]) -> String {
    json!({
        "width": width,
        "height": height,
        "tilewidth": TILE,
        "tileheight": TILE,
        "orientation": "orthogonal",
        "infinite": false,
        "tilesets": [{
            "firstgid": 1,
            "name": "world_tileset",
            "tilewidth": TILE,
            "tileheight": TILE,
            "columns": 8,
            "tilecount": 64,
            "imagewidth": 128,
            "imageheight": 128,
            "margin": 0,
            "spacing": 0
        }],
        "layers": [
            {
                "type": "tilelayer",
                "name": "Walkable",
                "width": width,
                "height": height,
                "visible": true,
                "data": walkable
            },
            { "type": "objectgroup", "name": "Coins", "objects": coins },
            { "type": "objectgroup", "name": "Enemies", "objects": enemies }
        ]
    })
    .to_string()
}

pub fn build_level(json: &str, config: &GameConfig) -> Level {
    let mut map = Tilemap::from_json_str(json).expect("test map parses");
    prepare_map(&mut map).expect("test map has a Walkable layer");
    Level::new(LevelId::One, Rc::new(map), config, Rc::new(create_animations())).expect("level builds")
}
