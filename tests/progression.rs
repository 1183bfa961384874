mod common;

use std::collections::HashMap;

use coin_knight::config::GameConfig;
use coin_knight::error::GameError;
use coin_knight::game::{GameContext, LevelId};
use coin_knight::tilemap::Tilemap;

use common::*;

#[test]
fn levels_advance_and_wrap() {
    assert_eq!(LevelId::One.next(), LevelId::Two);
    assert_eq!(LevelId::Two.next(), LevelId::Three);
    assert_eq!(LevelId::Three.next(), LevelId::One);
}

#[test]
fn level_keys() {
    assert_eq!(LevelId::One.scene_key(), "LevelOne");
    assert_eq!(LevelId::Two.win_scene_key(), "WinSceneTwo");
    assert_eq!(LevelId::Three.map_key(), "levelThree");
    assert_eq!(LevelId::One.music_key(), "musicLevelone");
    assert_eq!(LevelId::Two.map_path(), "maps/levelTwo.tmj");
}

#[test]
fn win_texts_name_the_next_step() {
    assert_eq!(LevelId::One.win_title(), "Level 1 Complete!");
    assert_eq!(LevelId::One.win_prompt(), "Press SPACE to go to Level 2");
    assert_eq!(LevelId::Two.win_prompt(), "Press SPACE to go to Level 3");
    assert_eq!(LevelId::Three.win_title(), "Level 3 Complete!");
    assert_eq!(LevelId::Three.win_prompt(), "Press SPACE to restart from Level 1");
}

fn valid_map() -> Tilemap {
    Tilemap::from_json_str(&map_json(10, 5, &ground(10, 5, 4, 0..=9), &[], &[])).unwrap()
}

#[test]
fn context_prepares_every_map() {
    let maps = LevelId::ALL.into_iter().map(|id| (id, valid_map())).collect();
    let ctx = GameContext::from_maps(GameConfig::default(), maps).unwrap();

    let map = ctx.map(LevelId::Two).unwrap();
    let walkable = map.tile_layer("Walkable").unwrap();
    assert!(walkable.is_solid(0, 4), "collision is enabled on Walkable tiles");
    assert!(ctx.animations.get("idle").is_some());
}

#[test]
fn missing_map_is_reported() {
    let maps = HashMap::from([(LevelId::One, valid_map())]);
    let ctx = GameContext::from_maps(GameConfig::default(), maps).unwrap();
    assert!(ctx.map(LevelId::One).is_ok());
    assert!(matches!(ctx.map(LevelId::Three), Err(GameError::MissingMap(key)) if key == "levelThree"));
}

#[test]
fn map_without_walkable_layer_fails_the_context() {
    let json = r#"{ "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
        "layers": [ { "type": "tilelayer", "name": "Ground", "width": 1, "height": 1, "data": [1] } ] }"#;
    let maps = HashMap::from([(LevelId::One, Tilemap::from_json_str(json).unwrap())]);
    assert!(matches!(
        GameContext::from_maps(GameConfig::default(), maps),
        Err(GameError::MissingLayer(_))
    ));
}

#[test]
fn loading_from_a_missing_asset_dir_fails() {
    let config = GameConfig { asset_dir: "no/such/dir".into(), ..GameConfig::default() };
    assert!(matches!(GameContext::load(config), Err(GameError::Io { .. })));
}
