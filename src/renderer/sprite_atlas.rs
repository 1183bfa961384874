use std::collections::{HashMap, HashSet};

use image::RgbaImage;
use wgpu::util::DeviceExt;

// ── Inputs ───────────────────────────────────────────────────────────────────

/// A decoded image waiting to be packed into the atlas.
pub struct AtlasImage {
    pub name: String,
    pub image: RgbaImage,
    /// Frame size used to index sprite-sheet frames. Plain images use their
    /// own dimensions.
    pub frame_w: u32,
    pub frame_h: u32,
}

// ── SheetData ────────────────────────────────────────────────────────────────

/// Where one named image sits in the atlas, plus its frame grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetData {
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
    /// Pixel dimensions of the source image.
    pub pixel_w: u32,
    pub pixel_h: u32,
    pub frame_w: u32,
    pub frame_h: u32,
}

impl SheetData {
    pub fn columns(&self) -> u32 {
        (self.pixel_w / self.frame_w.max(1)).max(1)
    }

    pub fn frame_count(&self) -> u32 {
        self.columns() * (self.pixel_h / self.frame_h.max(1))
    }

    /// UVs of a pixel rectangle given in the image's own coordinates.
    pub fn region_uv(&self, x: u32, y: u32, w: u32, h: u32) -> ([f32; 2], [f32; 2]) {
        let du = (self.uv_max[0] - self.uv_min[0]) / self.pixel_w as f32;
        let dv = (self.uv_max[1] - self.uv_min[1]) / self.pixel_h as f32;
        (
            [self.uv_min[0] + x as f32 * du, self.uv_min[1] + y as f32 * dv],
            [self.uv_min[0] + (x + w) as f32 * du, self.uv_min[1] + (y + h) as f32 * dv],
        )
    }

    /// UVs of frame `frame` (row-major); `None` past the last frame.
    pub fn frame_uv(&self, frame: u32) -> Option<([f32; 2], [f32; 2])> {
        if frame >= self.frame_count() {
            return None;
        }
        let cols = self.columns();
        Some(self.region_uv(
            (frame % cols) * self.frame_w,
            (frame / cols) * self.frame_h,
            self.frame_w,
            self.frame_h,
        ))
    }
}

// ── Shelf packing (pure, GPU-free) ───────────────────────────────────────────

/// One sprite's position inside the packed atlas.
#[derive(Debug, PartialEq)]
pub struct PlacedSprite {
    pub name: String,
    /// Top-left pixel coordinate inside the atlas.
    pub atlas_x: u32,
    pub atlas_y: u32,
    /// Pixel dimensions of this sprite.
    pub pixel_w: u32,
    pub pixel_h: u32,
}

/// Pure shelf-packing algorithm with no I/O or GPU access.
///
/// `items` is a slice of `(name, pixel_w, pixel_h)`.  Duplicate names are
/// skipped (only the first occurrence is packed).  Sprites wider than
/// `max_width` are skipped with a warning.
///
/// Returns `(placements, atlas_pixel_width, atlas_pixel_height)`.  Both
/// atlas dimensions are rounded up to the next power of two.
pub fn pack(items: &[(String, u32, u32)], max_width: u32) -> (Vec<PlacedSprite>, u32, u32) {
    // Sort by height descending for better shelf utilisation.
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].2.cmp(&items[a].2));

    let mut placed_names: HashSet<&str> = HashSet::new();
    let mut placements: Vec<PlacedSprite> = Vec::new();
    let mut cur_x = 0u32;
    let mut cur_y = 0u32;
    let mut row_h = 0u32;

    for &i in &order {
        let (ref name, w, h) = items[i];

        if !placed_names.insert(name.as_str()) {
            continue;
        }

        if w > max_width {
            log::warn!("sprite_atlas: '{name}' is wider ({w}px) than the atlas ({max_width}px); skipping");
            continue;
        }

        if cur_x + w > max_width {
            // Start a new shelf.
            cur_y += row_h;
            cur_x = 0;
            row_h = 0;
        }

        placements.push(PlacedSprite {
            name: name.clone(),
            atlas_x: cur_x,
            atlas_y: cur_y,
            pixel_w: w,
            pixel_h: h,
        });
        cur_x += w;
        row_h = row_h.max(h);
    }

    let used_h = cur_y + row_h;
    let atlas_h = used_h.next_power_of_two().max(1);
    let atlas_w = max_width.next_power_of_two();
    (placements, atlas_w, atlas_h)
}

// ── SpriteAtlas ──────────────────────────────────────────────────────────────

pub struct SpriteAtlas {
    pub sheets: HashMap<String, SheetData>,
    pub texture_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl SpriteAtlas {
    /// Maximum row width of the packed atlas texture in pixels.
    const ATLAS_WIDTH: u32 = 2048;
    /// Transparent gutter kept right of and below every image so that
    /// neighbours never bleed into each other when the camera zooms.
    const PADDING: u32 = 1;

    /// Pack `images` with the shelf algorithm, upload to the GPU, and return
    /// a ready-to-use atlas.
    pub fn bake(device: &wgpu::Device, queue: &wgpu::Queue, images: &[AtlasImage]) -> Self {
        let dims: Vec<(String, u32, u32)> = images
            .iter()
            .map(|a| (a.name.clone(), a.image.width() + Self::PADDING, a.image.height() + Self::PADDING))
            .collect();

        let (placements, atlas_w, atlas_h) = pack(&dims, Self::ATLAS_WIDTH);
        let sheets = layout_sheets(images, &placements, atlas_w, atlas_h);

        let mut atlas_img = RgbaImage::new(atlas_w, atlas_h);
        let lookup: HashMap<&str, &AtlasImage> = images.iter().map(|a| (a.name.as_str(), a)).collect();
        for p in &placements {
            let Some(src) = lookup.get(p.name.as_str()) else { continue };
            for (dx, dy, px) in src.image.enumerate_pixels() {
                atlas_img.put_pixel(p.atlas_x + dx, p.atlas_y + dy, *px);
            }
        }

        log::info!("sprite atlas baked: {} images into {atlas_w}x{atlas_h}", sheets.len());
        let (texture_view, sampler) = Self::upload(device, queue, &atlas_img);
        Self { sheets, texture_view, sampler }
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &RgbaImage,
    ) -> (wgpu::TextureView, wgpu::Sampler) {
        let (w, h) = img.dimensions();
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("sprite_atlas_tex"),
                size: wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            img.as_raw(),
        );
        let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        (texture_view, sampler)
    }
}

/// Compute the `SheetData` for every placed image (pure, GPU-free).
pub fn layout_sheets(
    images: &[AtlasImage],
    placements: &[PlacedSprite],
    atlas_w: u32,
    atlas_h: u32,
) -> HashMap<String, SheetData> {
    let lookup: HashMap<&str, &AtlasImage> = images.iter().map(|a| (a.name.as_str(), a)).collect();
    placements
        .iter()
        .filter_map(|p| {
            let src = lookup.get(p.name.as_str())?;
            let (w, h) = src.image.dimensions();
            let sheet = SheetData {
                uv_min: [p.atlas_x as f32 / atlas_w as f32, p.atlas_y as f32 / atlas_h as f32],
                uv_max: [(p.atlas_x + w) as f32 / atlas_w as f32, (p.atlas_y + h) as f32 / atlas_h as f32],
                pixel_w: w,
                pixel_h: h,
                frame_w: src.frame_w.clamp(1, w.max(1)),
                frame_h: src.frame_h.clamp(1, h.max(1)),
            };
            Some((p.name.clone(), sheet))
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(pixel_w: u32, pixel_h: u32, frame_w: u32, frame_h: u32) -> SheetData {
        SheetData { uv_min: [0.0, 0.0], uv_max: [0.5, 0.25], pixel_w, pixel_h, frame_w, frame_h }
    }

    #[test]
    fn frame_count_uses_whole_frames_only() {
        // 100px wide with 32px frames → 3 columns; 64px tall → 2 rows.
        assert_eq!(sheet(100, 64, 32, 32).frame_count(), 6);
    }

    #[test]
    fn frame_uv_walks_row_major() {
        let s = sheet(64, 32, 32, 32);
        let (min0, max0) = s.frame_uv(0).unwrap();
        let (min1, _) = s.frame_uv(1).unwrap();
        assert_eq!(min0, [0.0, 0.0]);
        assert_eq!(max0, [0.25, 0.25]);
        assert_eq!(min1, [0.25, 0.0]);
        assert!(s.frame_uv(2).is_none());
    }

    #[test]
    fn region_uv_maps_pixels_into_sheet_rect() {
        let s = SheetData { uv_min: [0.5, 0.5], uv_max: [1.0, 1.0], pixel_w: 16, pixel_h: 16, frame_w: 16, frame_h: 16 };
        let (min, max) = s.region_uv(8, 0, 8, 8);
        assert_eq!(min, [0.75, 0.5]);
        assert_eq!(max, [1.0, 0.75]);
    }

    #[test]
    fn layout_excludes_padding_from_uvs() {
        let images = vec![AtlasImage {
            name: "coin".into(),
            image: RgbaImage::new(16, 16),
            frame_w: 16,
            frame_h: 16,
        }];
        let placements = vec![PlacedSprite { name: "coin".into(), atlas_x: 0, atlas_y: 0, pixel_w: 17, pixel_h: 17 }];
        let sheets = layout_sheets(&images, &placements, 64, 32);
        let coin = &sheets["coin"];
        assert_eq!(coin.uv_max, [0.25, 0.5]);
        assert_eq!(coin.pixel_w, 16);
    }
}
