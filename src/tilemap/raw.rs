// Serde mirror of the Tiled JSON format; only the fields the loader reads.

use serde::Deserialize;
use serde_json::Value;

use super::{MapObject, Property};

fn default_true() -> bool { true }

#[derive(Deserialize)]
pub(super) struct RawMap {
    pub width: u32,
    pub height: u32,
    pub tilewidth: u32,
    pub tileheight: u32,
    #[serde(default)]
    pub infinite: bool,
    #[serde(default)]
    pub layers: Vec<RawLayer>,
    #[serde(default)]
    pub tilesets: Vec<RawTileset>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
pub(super) enum RawLayer {
    #[serde(rename = "tilelayer")]
    TileLayer {
        name: String,
        /// An array of gids, or a string when the layer is base64 encoded.
        #[serde(default)]
        data: Value,
        width: u32,
        height: u32,
        #[serde(default = "default_true")]
        visible: bool,
        #[serde(default)]
        encoding: Option<String>,
    },
    #[serde(rename = "objectgroup")]
    ObjectGroup {
        name: String,
        #[serde(default)]
        objects: Vec<RawObject>,
    },
    /// Image and group layers carry nothing the game uses.
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
pub(super) struct RawObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type", alias = "class")]
    kind: String,
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Deserialize)]
struct RawProperty {
    name: String,
    #[serde(default)]
    value: Value,
}

impl From<RawObject> for MapObject {
    fn from(o: RawObject) -> Self {
        MapObject {
            id: o.id,
            name: o.name,
            kind: o.kind,
            x: o.x,
            y: o.y,
            width: o.width,
            height: o.height,
            gid: o.gid.map(|g| g & !super::GID_FLAG_MASK),
            properties: o
                .properties
                .into_iter()
                .map(|p| Property { name: p.name, value: p.value })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
pub(super) struct RawTileset {
    pub firstgid: u32,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tilewidth: u32,
    #[serde(default)]
    pub tileheight: u32,
    #[serde(default)]
    pub columns: u32,
    #[serde(default)]
    pub tilecount: u32,
    #[serde(default)]
    pub imagewidth: u32,
    #[serde(default)]
    pub margin: u32,
    #[serde(default)]
    pub spacing: u32,
}
