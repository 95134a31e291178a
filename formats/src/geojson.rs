//! GeoJSON types we generate and submit.
//!
//! Only what we need is there: `Point` geometry and our own `Properties` bag, which follows
//! what TAK-like consumers expect (`callsign`, CoT `type`, an optional `video` descriptor).
//!

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Broadcast;

/// CoT type for a friendly military UAV
pub const COT_UAS: &str = "a-f-A-M";

/// Default values for the video connection descriptor.  These are metadata for the consumer,
/// not something we apply ourselves.
pub const NETWORK_TIMEOUT: u32 = 12_000;
pub const BUFFER_TIME: i32 = -1;
pub const NO_PORT: i32 = -1;
pub const PROTOCOL_RAW: &str = "raw";

/// The snapshot we submit every time.
///
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection { features }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        FeatureCollection::new(iter.into_iter().collect())
    }
}

/// One broadcast on the map.
///
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    /// `airdata-<sid>`
    pub id: String,
    pub properties: Properties,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// `[longitude, latitude]`, in that order
    Point { coordinates: [f64; 2] },
}

impl Geometry {
    #[inline]
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Geometry::Point {
            coordinates: [longitude, latitude],
        }
    }
}

/// Properties bag, `type`, `metadata` and `video` depend on the output shape.
///
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct Properties {
    /// CoT type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub cot: Option<String>,
    /// `UAS: <pilot name>`
    pub callsign: String,
    /// The record as received
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Broadcast>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<Video>,
}

/// Video feed attached to the feature.
///
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct Video {
    /// `<id>-video`
    pub uid: String,
    pub url: String,
    /// `<id>-camera`
    pub sensor: String,
    pub connection: Connection,
}

/// Video connection descriptor, as expected by TAK video clients.
///
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub uid: String,
    pub address: String,
    pub network_timeout: u32,
    pub path: String,
    pub protocol: String,
    pub buffer_time: i32,
    pub port: i32,
    pub rover_port: i32,
    pub rtsp_reliable: u8,
    #[serde(rename = "ignoreEmbeddedKLV")]
    pub ignore_embedded_klv: bool,
    pub alias: String,
}

impl Video {
    /// Build the descriptor for feature `id` streaming from `url`.
    ///
    pub fn new(id: &str, url: &str, alias: &str) -> Self {
        let uid = format!("{id}-video");
        Video {
            uid: uid.clone(),
            url: url.to_owned(),
            sensor: format!("{id}-camera"),
            connection: Connection {
                uid,
                address: url.to_owned(),
                network_timeout: NETWORK_TIMEOUT,
                path: String::new(),
                protocol: PROTOCOL_RAW.to_owned(),
                buffer_time: BUFFER_TIME,
                port: NO_PORT,
                rover_port: NO_PORT,
                rtsp_reliable: 0,
                ignore_embedded_klv: false,
                alias: alias.to_owned(),
            },
        }
    }
}
