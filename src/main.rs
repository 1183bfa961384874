use std::rc::Rc;

use coin_knight::config::GameConfig;
use coin_knight::engine::Engine;
use coin_knight::game::scenes::LevelScene;
use coin_knight::game::{GameContext, LevelId, asset_manifest};
use coin_knight::scene::SceneManager;
use coin_knight::{CONFIG_FILE, GameError};

fn main() -> Result<(), GameError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load(CONFIG_FILE)?;
    let assets = asset_manifest(&config);
    let window = config.window.clone();
    let debug = config.debug;
    let sfx_volume = config.audio.sfx_volume;

    let ctx = Rc::new(GameContext::load(config)?);
    let first = LevelScene::new(Rc::clone(&ctx), LevelId::One);

    Engine::builder()
        .with_title(&window.title)
        .with_size(window.width, window.height)
        .with_ups(window.target_ups)
        .with_assets(assets)
        .with_sfx_volume(sfx_volume)
        .with_debug(debug)
        .run(SceneManager::new(Box::new(first)))
}
