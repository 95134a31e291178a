//! Module to load the data coming from the Air Data `/broadcasts/recent` endpoint.
//!
//! The API sends out an anonymous JSON array, one object per live (or recently stopped)
//! video broadcast.  The whole array must match the schema below, there is no partial
//! parsing: one bad record and the batch is rejected.
//!
//! Timestamps are UNIX epoch seconds, integral floats are accepted.  `lastStopped` is either
//! a timestamp or `false` (or `null`, or missing altogether) when the broadcast is still live.
//!

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

/// Broadcasts stopped for longer than this (in ms) are ignored.
pub const STALE_AFTER_MS: i64 = 600_000;

/// `lastStopped` is either a timestamp or a boolean.
///
#[derive(Clone, Copy, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Stopped {
    /// Stopped at this UNIX timestamp
    At(
        #[serde(deserialize_with = "whole_secs")]
        #[schemars(with = "u64")]
        u64,
    ),
    /// Only ever seen as `false`
    Flag(bool),
}

/// Represents a broadcast record obtained from the Air Data API.
///
/// Fields we do not know about are kept in `extra` and sent along with the record.
///
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Broadcast {
    /// 1 if currently streaming (sometimes sent as a boolean)
    #[serde(deserialize_with = "int_or_bool")]
    #[schemars(with = "i64")]
    pub is_live: i64,
    /// Pilot picture
    pub personal_profile_image_src: String,
    /// Reverse geocoded location
    pub full_address: String,
    /// Pilot name
    pub pilot_full_name: String,
    /// Public link to the stream, carries the `sid` parameter
    pub share_link: String,
    /// Preview image for the share link
    pub share_link_preview_img: String,
    /// Where the video actually is
    #[serde(rename = "rtmpURL")]
    pub rtmp_url: String,
    /// UNIX timestamp
    #[serde(
        default,
        deserialize_with = "opt_whole_secs",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<u64>")]
    pub last_started: Option<u64>,
    /// UNIX timestamp or `false`, `null` while live
    #[serde(default)]
    pub last_stopped: Option<Stopped>,
    pub latitude: f64,
    pub longitude: f64,
    /// Everything else the API sends
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `isLive` is documented as an integer but booleans have been seen.
///
fn int_or_bool<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrBool {
        Int(i64),
        Bool(bool),
    }

    Ok(match IntOrBool::deserialize(deserializer)? {
        IntOrBool::Int(v) => v,
        IntOrBool::Bool(b) => i64::from(b),
    })
}

/// Timestamps are integers but `1700000000.0` is an integer too.
///
#[derive(Deserialize)]
#[serde(untagged)]
enum Secs {
    Int(u64),
    Float(f64),
}

impl Secs {
    fn whole<E: serde::de::Error>(self) -> Result<u64, E> {
        match self {
            Secs::Int(v) => Ok(v),
            Secs::Float(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(f as u64),
            Secs::Float(f) => Err(E::custom(format!("invalid timestamp {f}"))),
        }
    }
}

fn whole_secs<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Secs::deserialize(deserializer)?.whole()
}

fn opt_whole_secs<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Secs>::deserialize(deserializer)?
        .map(Secs::whole)
        .transpose()
}

impl Broadcast {
    /// Parse the whole API answer.
    ///
    #[tracing::instrument(skip(input))]
    pub fn from_json(input: &str) -> Result<Vec<Broadcast>, serde_json::Error> {
        trace!("broadcast::from_json");
        serde_json::from_str(input)
    }

    /// Numeric stop time if any
    ///
    #[inline]
    pub fn stopped_at(&self) -> Option<u64> {
        match self.last_stopped {
            Some(Stopped::At(tm)) => Some(tm),
            _ => None,
        }
    }

    /// Has this broadcast been stopped for more than 10 minutes at `now_ms`?
    ///
    /// All three must hold for the record to be stale:
    /// - `lastStopped` is a number
    /// - it is after `lastStarted` (a missing `lastStarted` never compares)
    /// - it is older than `now - 10 min`
    ///
    pub fn is_stale(&self, now_ms: i64) -> bool {
        let (Some(stop), Some(start)) = (self.stopped_at(), self.last_started) else {
            return false;
        };
        if stop <= start {
            return false;
        }
        let stop_ms = i64::try_from(stop).unwrap_or(i64::MAX).saturating_mul(1000);
        stop_ms < now_ms.saturating_sub(STALE_AFTER_MS)
    }

    /// How this one will be seen on the map
    ///
    #[inline]
    pub fn callsign(&self) -> String {
        format!("UAS: {}", self.pilot_full_name)
    }
}
