use std::path::{Path, PathBuf};

use coin_knight::assets::{AssetManifest, FONT_KEY, PIXEL_KEY, builtin_images};
use coin_knight::config::GameConfig;
use coin_knight::game::{COIN_SOUND, LevelId, asset_manifest};
use image::{Rgba, RgbaImage};

#[test]
fn builtin_images_provide_pixel_and_font() {
    let images = builtin_images();
    let keys: Vec<_> = images.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(keys, vec![PIXEL_KEY, FONT_KEY]);
    assert!(images[0].image.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
}

#[test]
fn game_manifest_lists_every_asset() {
    let manifest = asset_manifest(&GameConfig::default());
    assert_eq!(manifest.root(), Path::new("assets"));

    let knight = manifest.images().iter().find(|i| i.key == "knight").unwrap();
    assert_eq!(knight.frame, Some((32, 32)));
    assert_eq!(knight.path, PathBuf::from("sprites/knight.png"));

    let tileset = manifest.images().iter().find(|i| i.key == "world_tileset").unwrap();
    assert_eq!(tileset.frame, None);

    let sounds: Vec<_> = manifest.sounds().iter().map(|s| s.key.as_str()).collect();
    assert!(sounds.contains(&COIN_SOUND));
    for id in LevelId::ALL {
        assert!(sounds.contains(&id.music_key()), "{}", id.music_key());
    }
}

#[test]
fn resolve_joins_the_root() {
    let manifest = AssetManifest::new("data");
    assert_eq!(manifest.resolve(Path::new("maps/a.tmj")), PathBuf::from("data/maps/a.tmj"));
}

#[test]
fn missing_images_are_skipped() {
    let manifest = AssetManifest::new("does/not/exist").image("sky", "sky.png");
    let images = manifest.load_images();
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|i| i.name != "sky"));
}

#[test]
fn loaded_images_keep_their_frame_size() {
    let dir = std::env::temp_dir().join(format!("coin_knight_assets_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    RgbaImage::from_pixel(64, 16, Rgba([10, 20, 30, 255])).save(dir.join("sheet.png")).unwrap();

    let manifest = AssetManifest::new(&dir)
        .spritesheet("sheet", "sheet.png", 16, 16)
        .image("plain", "sheet.png");
    let images = manifest.load_images();
    std::fs::remove_dir_all(&dir).unwrap();

    let sheet = images.iter().find(|i| i.name == "sheet").unwrap();
    assert_eq!((sheet.frame_w, sheet.frame_h), (16, 16));
    assert_eq!(sheet.image.dimensions(), (64, 16));

    let plain = images.iter().find(|i| i.name == "plain").unwrap();
    assert_eq!((plain.frame_w, plain.frame_h), (64, 16));
}
