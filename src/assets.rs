use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::renderer::font;
use crate::renderer::sprite_atlas::AtlasImage;

/// Texture key of the built-in solid white image used for rectangles.
pub const PIXEL_KEY: &str = "__pixel";
/// Texture key of the built-in bitmap font.
pub const FONT_KEY: &str = "__font";

#[derive(Clone, Debug, PartialEq)]
pub struct ImageAsset {
    pub key: String,
    pub path: PathBuf,
    /// Frame size for sprite sheets; `None` for plain images and tilesets.
    pub frame: Option<(u32, u32)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SoundAsset {
    pub key: String,
    pub path: PathBuf,
}

/// Everything the engine loads before the first frame: images, sprite sheets
/// and sounds, each addressed by a texture/sound key. Paths are relative to
/// `root`.
#[derive(Clone, Debug, Default)]
pub struct AssetManifest {
    root: PathBuf,
    images: Vec<ImageAsset>,
    sounds: Vec<SoundAsset>,
}

impl AssetManifest {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into(), images: Vec::new(), sounds: Vec::new() }
    }

    pub fn image(mut self, key: &str, path: &str) -> Self {
        self.images.push(ImageAsset { key: key.into(), path: path.into(), frame: None });
        self
    }

    pub fn spritesheet(mut self, key: &str, path: &str, frame_w: u32, frame_h: u32) -> Self {
        self.images.push(ImageAsset { key: key.into(), path: path.into(), frame: Some((frame_w, frame_h)) });
        self
    }

    pub fn audio(mut self, key: &str, path: &str) -> Self {
        self.sounds.push(SoundAsset { key: key.into(), path: path.into() });
        self
    }

    pub fn root(&self) -> &Path { &self.root }
    pub fn images(&self) -> &[ImageAsset] { &self.images }
    pub fn sounds(&self) -> &[SoundAsset] { &self.sounds }

    pub fn resolve(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }

    /// Decode every listed image plus the built-in font and pixel textures.
    /// Images that fail to load are logged and skipped.
    pub fn load_images(&self) -> Vec<AtlasImage> {
        let mut out = builtin_images();
        for asset in &self.images {
            let path = self.resolve(&asset.path);
            match image::open(&path) {
                Ok(img) => {
                    let rgba = img.to_rgba8();
                    let (frame_w, frame_h) = asset.frame.unwrap_or(rgba.dimensions());
                    out.push(AtlasImage { name: asset.key.clone(), image: rgba, frame_w, frame_h });
                }
                Err(e) => log::warn!("failed to load image '{}' from {}: {e}", asset.key, path.display()),
            }
        }
        out
    }
}

/// Textures the engine always provides, independent of game assets.
pub fn builtin_images() -> Vec<AtlasImage> {
    let pixel = RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
    vec![
        AtlasImage { name: PIXEL_KEY.into(), image: pixel, frame_w: 4, frame_h: 4 },
        AtlasImage {
            name: FONT_KEY.into(),
            image: font::build_font_image(),
            frame_w: font::CELL_W,
            frame_h: font::CELL_H,
        },
    ]
}
