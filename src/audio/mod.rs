use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use kira::{
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::static_sound::{StaticSoundData, StaticSoundSettings, StaticSoundHandle},
    tween::Tween,
    Volume,
};

/// Fade applied when music is stopped or replaced.
const MUSIC_FADE_OUT: Duration = Duration::from_millis(300);

pub struct AudioContext {
    /// `None` when audio hardware is unavailable (headless / CI / no audio device).
    manager: Option<AudioManager>,
    sounds: HashMap<String, StaticSoundData>,
    active_music: Option<StaticSoundHandle>,
    /// Volume multiplier for one-shot sounds.
    pub sfx_volume: f32,
}

impl AudioContext {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("failed to initialize audio manager: {e}; audio disabled");
                None
            }
        };
        Self {
            manager,
            sounds: HashMap::new(),
            active_music: None,
            sfx_volume: 1.0,
        }
    }

    /// Returns true if audio hardware is available.
    pub fn is_available(&self) -> bool { self.manager.is_some() }

    /// Load a sound file (MP3, OGG, WAV) into memory under `name`.
    /// Logs a warning and returns if the file cannot be read.
    pub fn load_sound<P: AsRef<Path>>(&mut self, name: &str, path: P) {
        match StaticSoundData::from_file(path.as_ref()) {
            Ok(sound) => { self.sounds.insert(name.to_string(), sound); }
            Err(e) => log::warn!("failed to load sound '{}' from '{}': {e}", name, path.as_ref().display()),
        }
    }

    /// Play a sound once.
    pub fn play(&mut self, name: &str) {
        let Some(manager) = self.manager.as_mut() else { return; };
        if let Some(data) = self.sounds.get(name) {
            let mut settings = StaticSoundSettings::new();
            settings.volume = Volume::Amplitude(self.sfx_volume.clamp(0.0, 2.0) as f64).into();
            if let Err(e) = manager.play(data.clone().with_settings(settings)) {
                log::warn!("failed to play sound '{name}': {e}");
            }
        }
    }

    /// Play looping background music, replacing (and fading out) whatever
    /// track was playing before.
    pub fn play_music(&mut self, name: &str, volume: f32) {
        self.stop_music();
        let Some(manager) = self.manager.as_mut() else { return; };
        let Some(data) = self.sounds.get(name) else {
            log::warn!("music '{name}' is not loaded");
            return;
        };

        let mut settings = StaticSoundSettings::new().loop_region(0.0..);
        settings.volume = Volume::Amplitude(volume.clamp(0.0, 2.0) as f64).into();

        match manager.play(data.clone().with_settings(settings)) {
            Ok(handle) => self.active_music = Some(handle),
            Err(e) => log::warn!("failed to play music '{name}': {e}"),
        }
    }

    pub fn stop_music(&mut self) {
        if let Some(mut handle) = self.active_music.take() {
            let _ = handle.stop(Tween {
                duration: MUSIC_FADE_OUT,
                ..Default::default()
            });
        }
    }
}

impl Default for AudioContext {
    fn default() -> Self { Self::new() }
}
