use crate::engine::{Engine, Game};

pub enum SceneAction {
    None,
    /// Exit the current scene and start another.
    Switch(Box<dyn Scene>),
    Quit,
}

pub trait Scene {
    fn on_enter(&mut self, _engine: &mut Engine) {}
    fn on_exit(&mut self, _engine: &mut Engine) {}
    fn update(&mut self, engine: &mut Engine) -> SceneAction;
    fn draw(&mut self, engine: &mut Engine);
    /// Short name used in log output.
    fn name(&self) -> &str;
}

/// Runs exactly one active scene at a time.
pub struct SceneManager {
    current: Box<dyn Scene>,
    initialized: bool,
}

impl SceneManager {
    pub fn new(initial: Box<dyn Scene>) -> Self {
        Self { current: initial, initialized: false }
    }

    fn start(&mut self, engine: &mut Engine) {
        log::info!("scene start: {}", self.current.name());
        self.current.on_enter(engine);
    }
}

impl Game for SceneManager {
    fn on_enter(&mut self, engine: &mut Engine) {
        if !self.initialized {
            self.initialized = true;
            self.start(engine);
        }
    }

    fn update(&mut self, engine: &mut Engine) {
        if !self.initialized {
            self.on_enter(engine);
        }
        match self.current.update(engine) {
            SceneAction::None => {}
            SceneAction::Switch(next) => {
                self.current.on_exit(engine);
                self.current = next;
                self.start(engine);
            }
            SceneAction::Quit => engine.request_quit(),
        }
    }

    fn render(&mut self, engine: &mut Engine) {
        self.current.draw(engine);
    }
}
