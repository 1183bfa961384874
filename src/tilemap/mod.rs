//! Tiled JSON (`.tmj`) map loading.
//!
//! Supports orthogonal, finite maps whose tile layers are stored as plain
//! arrays (Tiled's "CSV" layer format) and whose tilesets are embedded.

mod raw;

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::GameError;
use raw::{RawLayer, RawMap, RawTileset};

/// Tiled stores horizontal/vertical/diagonal/hex-rotation flags in the top
/// four bits of a gid.
pub const GID_FLAG_MASK: u32 = 0xF000_0000;

// ── Tiles ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// Global tile id with flip flags removed. Never 0.
    pub gid: u32,
    pub col: u32,
    pub row: u32,
    /// Set by [`TileLayer::set_collision_by_exclusion`].
    pub collides: bool,
}

#[derive(Clone, Debug)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub visible: bool,
    cells: Vec<Option<Tile>>,
}

impl TileLayer {
    /// Build a layer from row-major gid data where 0 marks an empty cell.
    pub fn new(
        name: &str,
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
        data: &[u32],
    ) -> Result<Self, GameError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| GameError::LayerTooLarge { layer: name.to_string(), width, height })?;
        if data.len() != expected {
            return Err(GameError::LayerSize { layer: name.to_string(), expected, found: data.len() });
        }
        let cells = data
            .iter()
            .enumerate()
            .map(|(i, &raw_gid)| {
                let gid = raw_gid & !GID_FLAG_MASK;
                (gid != 0).then(|| Tile {
                    gid,
                    col: (i % width as usize) as u32,
                    row: (i / width as usize) as u32,
                    collides: false,
                })
            })
            .collect();
        Ok(Self {
            name: name.to_string(),
            width,
            height,
            tile_width,
            tile_height,
            visible: true,
            cells,
        })
    }

    pub fn width_in_pixels(&self) -> f32 { self.width as f32 * self.tile_width as f32 }
    pub fn height_in_pixels(&self) -> f32 { self.height as f32 * self.tile_height as f32 }

    /// Tile at grid cell `(col, row)`; `None` for empty or out-of-range cells.
    pub fn tile_at(&self, col: i32, row: i32) -> Option<&Tile> {
        if col < 0 || row < 0 || col as u32 >= self.width || row as u32 >= self.height {
            return None;
        }
        self.cells.get(row as usize * self.width as usize + col as usize)?.as_ref()
    }

    /// Tile under world pixel `(x, y)`.
    pub fn tile_at_world_xy(&self, x: f32, y: f32) -> Option<&Tile> {
        let (col, row) = self.world_to_cell(x, y);
        self.tile_at(col, row)
    }

    pub fn world_to_cell(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.tile_width as f32).floor() as i32,
            (y / self.tile_height as f32).floor() as i32,
        )
    }

    /// Returns true if the cell holds a tile flagged as colliding.
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row).is_some_and(|t| t.collides)
    }

    /// Mark every non-empty tile as colliding unless its gid is in `excluded`.
    pub fn set_collision_by_exclusion(&mut self, excluded: &[u32]) {
        for tile in self.cells.iter_mut().flatten() {
            tile.collides = !excluded.contains(&tile.gid);
        }
    }

    /// All non-empty tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }
}

// ── Objects ───────────────────────────────────────────────────────────────────

/// A custom property attached to a map object.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub name: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    /// Tiled "type" (or "class" in 1.9 files).
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Set for tile objects, whose `(x, y)` is the bottom-left corner.
    pub gid: Option<u32>,
    pub properties: Vec<Property>,
}

impl MapObject {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }
}

#[derive(Clone, Debug)]
pub struct ObjectLayer {
    pub name: String,
    pub objects: Vec<MapObject>,
}

// ── Tilesets ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Tileset {
    /// Also the texture key the tileset image is loaded under.
    pub name: String,
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub columns: u32,
    pub tile_count: u32,
    pub margin: u32,
    pub spacing: u32,
}

impl Tileset {
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && gid - self.first_gid < self.tile_count
    }

    /// Pixel rectangle `(x, y, w, h)` of `gid` inside the tileset image.
    pub fn source_rect(&self, gid: u32) -> Option<(u32, u32, u32, u32)> {
        if !self.contains(gid) || self.columns == 0 {
            return None;
        }
        let local = gid - self.first_gid;
        let col = local % self.columns;
        let row = local / self.columns;
        let x = col.checked_mul(self.tile_width.checked_add(self.spacing)?)?.checked_add(self.margin)?;
        let y = row.checked_mul(self.tile_height.checked_add(self.spacing)?)?.checked_add(self.margin)?;
        Some((x, y, self.tile_width, self.tile_height))
    }
}

// ── Tilemap ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum Layer {
    Tiles(TileLayer),
    Objects(ObjectLayer),
}

#[derive(Clone, Debug)]
pub struct Tilemap {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<Layer>,
}

impl Tilemap {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| GameError::Io { path: path.to_path_buf(), source })?;
        let map = Self::parse(&content, &path.display().to_string())?;
        log::debug!(
            "loaded {} ({}x{} tiles, {} layers)",
            path.display(),
            map.width,
            map.height,
            map.layers.len()
        );
        Ok(map)
    }

    pub fn from_json_str(s: &str) -> Result<Self, GameError> {
        Self::parse(s, "tilemap")
    }

    fn parse(s: &str, what: &str) -> Result<Self, GameError> {
        let raw: RawMap = serde_json::from_str(s)
            .map_err(|source| GameError::Json { what: what.to_string(), source })?;
        if raw.infinite {
            return Err(GameError::InfiniteMap);
        }

        let tilesets = raw
            .tilesets
            .into_iter()
            .map(Self::convert_tileset)
            .collect::<Result<Vec<_>, _>>()?;

        let mut layers = Vec::with_capacity(raw.layers.len());
        for layer in raw.layers {
            match layer {
                RawLayer::TileLayer { name, data, width, height, visible, encoding } => {
                    if let Some(enc) = encoding.filter(|e| e != "csv") {
                        return Err(GameError::UnsupportedEncoding(name, enc));
                    }
                    let data: Vec<u32> = match data {
                        Value::Null => Vec::new(),
                        other => serde_json::from_value(other).map_err(|source| GameError::Json {
                            what: format!("{what}, layer '{name}'"),
                            source,
                        })?,
                    };
                    let mut tiles =
                        TileLayer::new(&name, width, height, raw.tilewidth, raw.tileheight, &data)?;
                    tiles.visible = visible;
                    layers.push(Layer::Tiles(tiles));
                }
                RawLayer::ObjectGroup { name, objects } => {
                    let objects = objects.into_iter().map(Into::into).collect();
                    layers.push(Layer::Objects(ObjectLayer { name, objects }));
                }
                RawLayer::Other => {}
            }
        }

        Ok(Self {
            width: raw.width,
            height: raw.height,
            tile_width: raw.tilewidth,
            tile_height: raw.tileheight,
            tilesets,
            layers,
        })
    }

    fn convert_tileset(ts: RawTileset) -> Result<Tileset, GameError> {
        if let Some(source) = ts.source {
            return Err(GameError::ExternalTileset(source));
        }
        let columns = if ts.columns > 0 {
            ts.columns
        } else {
            ts.imagewidth.saturating_sub(ts.margin.saturating_mul(2)).saturating_add(ts.spacing)
                / ts.tilewidth.saturating_add(ts.spacing).max(1)
        };
        Ok(Tileset {
            name: ts.name,
            first_gid: ts.firstgid,
            tile_width: ts.tilewidth,
            tile_height: ts.tileheight,
            columns,
            tile_count: ts.tilecount,
            margin: ts.margin,
            spacing: ts.spacing,
        })
    }

    pub fn width_in_pixels(&self) -> f32 { self.width as f32 * self.tile_width as f32 }
    pub fn height_in_pixels(&self) -> f32 { self.height as f32 * self.tile_height as f32 }

    pub fn tile_layer(&self, name: &str) -> Option<&TileLayer> {
        self.layers.iter().find_map(|l| match l {
            Layer::Tiles(t) if t.name == name => Some(t),
            _ => None,
        })
    }

    pub fn tile_layer_mut(&mut self, name: &str) -> Option<&mut TileLayer> {
        self.layers.iter_mut().find_map(|l| match l {
            Layer::Tiles(t) if t.name == name => Some(t),
            _ => None,
        })
    }

    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.layers.iter().find_map(|l| match l {
            Layer::Objects(o) if o.name == name => Some(o),
            _ => None,
        })
    }

    /// Objects of the named layer; a missing layer yields an empty slice.
    pub fn objects(&self, layer: &str) -> &[MapObject] {
        self.object_layer(layer).map_or(&[], |l| l.objects.as_slice())
    }

    /// The tileset that owns `gid`. Tilesets are searched from the highest
    /// `first_gid` down, as Tiled assigns ranges in ascending order.
    pub fn tileset_for_gid(&self, gid: u32) -> Option<&Tileset> {
        self.tilesets
            .iter()
            .filter(|ts| ts.first_gid <= gid)
            .max_by_key(|ts| ts.first_gid)
            .filter(|ts| ts.contains(gid))
    }
}
