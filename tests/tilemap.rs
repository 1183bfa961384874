use coin_knight::error::GameError;
use coin_knight::tilemap::{Layer, TileLayer, Tilemap};

const MAP: &str = r#"{
    "width": 4,
    "height": 3,
    "tilewidth": 16,
    "tileheight": 16,
    "orientation": "orthogonal",
    "infinite": false,
    "tilesets": [
        { "firstgid": 1, "name": "world_tileset", "tilewidth": 16, "tileheight": 16,
          "columns": 10, "tilecount": 100, "imagewidth": 160, "imageheight": 160, "margin": 0, "spacing": 0 },
        { "firstgid": 101, "name": "platforms", "tilewidth": 16, "tileheight": 16,
          "tilecount": 8, "imagewidth": 64, "imageheight": 32, "margin": 0, "spacing": 0 }
    ],
    "layers": [
        { "type": "tilelayer", "name": "Background", "width": 4, "height": 3, "visible": false,
          "data": [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3] },
        { "type": "tilelayer", "name": "Walkable", "width": 4, "height": 3,
          "data": [0, 0, 0, 0,
                   0, 0, 0, 102,
                   1, 2, 2147483650, 2] },
        { "type": "objectgroup", "name": "Enemies", "objects": [
            { "id": 7, "name": "blob", "type": "enemy", "x": 40, "y": 32, "width": 24, "height": 24,
              "properties": [ { "name": "type", "type": "string", "value": "slime_purple" },
                              { "name": "speed", "type": "int", "value": 3 } ] }
        ] },
        { "type": "imagelayer", "name": "Sky", "image": "sky.png" }
    ]
}"#;

#[test]
fn parses_dimensions_tilesets_and_layers() {
    let map = Tilemap::from_json_str(MAP).unwrap();
    assert_eq!((map.width, map.height, map.tile_width, map.tile_height), (4, 3, 16, 16));
    assert_eq!(map.width_in_pixels(), 64.0);
    assert_eq!(map.height_in_pixels(), 48.0);
    assert_eq!(map.tilesets.len(), 2);
    // Image layers are ignored.
    assert_eq!(map.layers.len(), 3);
    assert!(matches!(map.layers[2], Layer::Objects(_)));
}

#[test]
fn missing_columns_are_derived_from_image_width() {
    let map = Tilemap::from_json_str(MAP).unwrap();
    assert_eq!(map.tilesets[1].columns, 4);
}

#[test]
fn tile_layers_keep_visibility_and_cells() {
    let map = Tilemap::from_json_str(MAP).unwrap();
    assert!(!map.tile_layer("Background").unwrap().visible);

    let walkable = map.tile_layer("Walkable").unwrap();
    assert!(walkable.visible);
    assert!(walkable.tile_at(0, 0).is_none());
    let t = walkable.tile_at(3, 1).unwrap();
    assert_eq!((t.gid, t.col, t.row), (102, 3, 1));
    // Flip flag stripped.
    assert_eq!(walkable.tile_at(2, 2).unwrap().gid, 2);
    assert_eq!(walkable.tiles().count(), 5);
}

#[test]
fn tile_at_world_xy_maps_pixels_to_cells() {
    let map = Tilemap::from_json_str(MAP).unwrap();
    let walkable = map.tile_layer("Walkable").unwrap();
    assert_eq!(walkable.tile_at_world_xy(63.9, 16.0).map(|t| t.gid), Some(102));
    assert!(walkable.tile_at_world_xy(64.0, 16.0).is_none(), "outside the layer");
    assert!(walkable.tile_at_world_xy(10.0, 10.0).is_none(), "empty cell");
}

#[test]
fn collision_by_exclusion_marks_every_other_tile() {
    let mut map = Tilemap::from_json_str(MAP).unwrap();
    let walkable = map.tile_layer_mut("Walkable").unwrap();
    assert!(!walkable.is_solid(0, 2), "tiles start non-colliding");

    walkable.set_collision_by_exclusion(&[2]);
    assert!(walkable.is_solid(0, 2));
    assert!(!walkable.is_solid(1, 2));
    assert!(walkable.is_solid(3, 1));
    assert!(!walkable.is_solid(0, 0), "empty cells never collide");

    walkable.set_collision_by_exclusion(&[]);
    assert!(walkable.is_solid(1, 2));
}

#[test]
fn objects_keep_type_and_properties() {
    let map = Tilemap::from_json_str(MAP).unwrap();
    let enemies = map.objects("Enemies");
    assert_eq!(enemies.len(), 1);
    let obj = &enemies[0];
    assert_eq!((obj.id, obj.name.as_str(), obj.kind.as_str()), (7, "blob", "enemy"));
    assert_eq!((obj.x, obj.y, obj.width, obj.height), (40.0, 32.0, 24.0, 24.0));
    assert_eq!(obj.property_str("type"), Some("slime_purple"));
    assert_eq!(obj.property("speed").and_then(|v| v.as_i64()), Some(3));
    assert_eq!(obj.property_str("speed"), None);
    assert_eq!(obj.property_str("missing"), None);
}

#[test]
fn missing_object_layer_is_empty() {
    let map = Tilemap::from_json_str(MAP).unwrap();
    assert!(map.objects("Coins").is_empty());
    assert!(map.object_layer("Coins").is_none());
}

#[test]
fn gids_resolve_to_their_tileset() {
    let map = Tilemap::from_json_str(MAP).unwrap();
    assert_eq!(map.tileset_for_gid(1).unwrap().name, "world_tileset");
    assert_eq!(map.tileset_for_gid(100).unwrap().name, "world_tileset");
    let platforms = map.tileset_for_gid(102).unwrap();
    assert_eq!(platforms.name, "platforms");
    // Local id 1 → column 1, row 0.
    assert_eq!(platforms.source_rect(102), Some((16, 0, 16, 16)));
    assert!(map.tileset_for_gid(200).is_none());
}

// ── Errors ───────────────────────────────────────────────────────────────────

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(Tilemap::from_json_str("{ not json"), Err(GameError::Json { .. })));
}

#[test]
fn wrong_layer_size_is_an_error() {
    let json = r#"{ "width": 2, "height": 2, "tilewidth": 16, "tileheight": 16,
        "layers": [ { "type": "tilelayer", "name": "Walkable", "width": 2, "height": 2, "data": [1, 2, 3] } ] }"#;
    match Tilemap::from_json_str(json) {
        Err(GameError::LayerSize { layer, expected, found }) => {
            assert_eq!(layer, "Walkable");
            assert_eq!((expected, found), (4, 3));
        }
        other => panic!("expected LayerSize, got {other:?}"),
    }
}

#[test]
fn infinite_maps_are_rejected() {
    let json = r#"{ "width": 2, "height": 2, "tilewidth": 16, "tileheight": 16, "infinite": true, "layers": [] }"#;
    assert!(matches!(Tilemap::from_json_str(json), Err(GameError::InfiniteMap)));
}

#[test]
fn base64_layers_are_rejected() {
    let json = r#"{ "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
        "layers": [ { "type": "tilelayer", "name": "Walkable", "width": 1, "height": 1,
                      "encoding": "base64", "compression": "zlib", "data": "eJxjZGBgAAAABQAB" } ] }"#;
    match Tilemap::from_json_str(json) {
        Err(GameError::UnsupportedEncoding(layer, enc)) => {
            assert_eq!(layer, "Walkable");
            assert_eq!(enc, "base64");
        }
        other => panic!("expected UnsupportedEncoding, got {other:?}"),
    }
}

#[test]
fn external_tilesets_are_rejected() {
    let json = r#"{ "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
        "tilesets": [ { "firstgid": 1, "source": "world.tsx" } ], "layers": [] }"#;
    assert!(matches!(Tilemap::from_json_str(json), Err(GameError::ExternalTileset(s)) if s == "world.tsx"));
}

#[test]
fn loading_a_missing_file_reports_the_path() {
    match Tilemap::load("does/not/exist.tmj") {
        Err(GameError::Io { path, .. }) => assert!(path.ends_with("exist.tmj")),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[test]
fn tile_layer_new_checks_length() {
    assert!(TileLayer::new("t", 2, 2, 16, 16, &[0; 4]).is_ok());
    assert!(TileLayer::new("t", 2, 2, 16, 16, &[0; 5]).is_err());
}

#[test]
fn huge_layer_dimensions_are_an_error() {
    let json = r#"{ "width": 65536, "height": 65536, "tilewidth": 16, "tileheight": 16,
        "layers": [ { "type": "tilelayer", "name": "Walkable", "width": 65536, "height": 65536 } ] }"#;
    assert!(matches!(
        Tilemap::from_json_str(json),
        Err(GameError::LayerSize { .. } | GameError::LayerTooLarge { .. })
    ));
    assert!(TileLayer::new("t", u32::MAX, u32::MAX, 16, 16, &[]).is_err());
}

#[test]
fn pixel_size_of_large_maps_does_not_wrap() {
    let layer = TileLayer::new("t", 1, 1, u32::MAX, u32::MAX, &[0]).unwrap();
    assert!(layer.width_in_pixels() > 4.0e9);
}

#[test]
fn gid_ranges_near_u32_max_do_not_wrap() {
    let json = r#"{ "width": 1, "height": 1, "tilewidth": 16, "tileheight": 16,
        "tilesets": [ { "firstgid": 4294967000, "name": "big", "tilewidth": 16, "tileheight": 16,
                        "columns": 4, "tilecount": 4000, "imagewidth": 64, "imageheight": 64 } ],
        "layers": [] }"#;
    let map = Tilemap::from_json_str(json).unwrap();
    let ts = &map.tilesets[0];
    assert!(ts.contains(4_294_967_000));
    assert!(ts.contains(u32::MAX));
    assert!(!ts.contains(1));
}
