//! Transform `Broadcast` records into `Feature`s.
//!
//! Three knobs:
//! - `Shape` selects how much we put into the properties
//! - `IdStrategy` says where the stream identifier lives in the share link
//! - `MissingId` decides what happens to a record without one
//!

use reqwest::Url;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{EnumString, VariantNames};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{Broadcast, Feature, FeatureCollection, Geometry, Properties, Video, COT_UAS};

/// Prefix for all our feature IDs
pub const ID_PREFIX: &str = "airdata";

#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("No stream id in share link {0}")]
    MissingId(String),
}

/// Output shapes, from the smallest to the richest.
///
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    EnumString,
    Eq,
    JsonSchema,
    PartialEq,
    Serialize,
    strum::Display,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Shape {
    /// id, geometry & callsign
    Minimal,
    /// adds CoT type and the record as metadata
    Full,
    /// adds the video connection descriptor
    #[default]
    Video,
}

/// How to find a stable identifier in the share link.
///
/// We use the `sid` parameter for now but nothing says it is persistent.
///
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// `?sid=...`
    #[default]
    Sid,
    /// Any other query parameter
    Param(String),
    /// Last non-empty path segment
    LastSegment,
}

impl IdStrategy {
    /// Extract the identifier from `link`, `None` if not there or if `link` is not a URL.
    ///
    pub fn extract(&self, link: &str) -> Option<String> {
        let url = Url::parse(link).ok()?;

        let id = match self {
            IdStrategy::Sid => query_param(&url, "sid"),
            IdStrategy::Param(name) => query_param(&url, name),
            IdStrategy::LastSegment => url
                .path_segments()
                .and_then(|mut s| s.rfind(|s| !s.is_empty()))
                .map(str::to_owned),
        };
        id.filter(|id| !id.is_empty())
    }
}

#[inline]
fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// What to do with a record without an identifier
///
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    EnumString,
    Eq,
    JsonSchema,
    PartialEq,
    Serialize,
    strum::Display,
    VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MissingId {
    /// Drop the record and carry on
    #[default]
    Skip,
    /// Fail the whole batch
    Fail,
}

/// Result of a conversion run, with the counters we log.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Converted {
    pub collection: FeatureCollection,
    /// Records removed by the staleness filter
    pub stale: usize,
    /// Records without identifier
    pub skipped: usize,
}

/// Converter from `Broadcast` to `Feature`
///
#[derive(Clone, Debug, Default)]
pub struct Converter {
    pub shape: Shape,
    pub ids: IdStrategy,
    pub missing: MissingId,
}

impl Converter {
    pub fn new(shape: Shape, ids: IdStrategy, missing: MissingId) -> Self {
        Converter { shape, ids, missing }
    }

    /// Feature ID for this record
    ///
    pub fn id(&self, rec: &Broadcast) -> Option<String> {
        self.ids
            .extract(&rec.share_link)
            .map(|sid| format!("{ID_PREFIX}-{sid}"))
    }

    /// Map one record.  `Ok(None)` means the record was skipped.
    ///
    pub fn feature(&self, rec: &Broadcast) -> Result<Option<Feature>, ConvertError> {
        let id = match self.id(rec) {
            Some(id) => id,
            None => match self.missing {
                MissingId::Skip => {
                    warn!("no stream id in {}, skipping", rec.share_link);
                    return Ok(None);
                }
                MissingId::Fail => return Err(ConvertError::MissingId(rec.share_link.clone())),
            },
        };

        let callsign = rec.callsign();
        let properties = match self.shape {
            Shape::Minimal => Properties {
                cot: None,
                callsign,
                metadata: None,
                video: None,
            },
            Shape::Full => Properties {
                cot: Some(COT_UAS.to_owned()),
                callsign,
                metadata: Some(rec.clone()),
                video: None,
            },
            Shape::Video => Properties {
                cot: Some(COT_UAS.to_owned()),
                video: Some(Video::new(&id, &rec.rtmp_url, &callsign)),
                callsign,
                metadata: Some(rec.clone()),
            },
        };

        Ok(Some(Feature {
            id,
            properties,
            geometry: Geometry::point(rec.longitude, rec.latitude),
        }))
    }

    /// Filter out stale broadcasts then map everything else, keeping the input order.
    ///
    #[tracing::instrument(skip(self, records))]
    pub fn collect(&self, records: &[Broadcast], now_ms: i64) -> Result<Converted, ConvertError> {
        trace!("convert {} records", records.len());

        let mut res = Converted::default();
        for rec in records {
            if rec.is_stale(now_ms) {
                debug!("stale: {}", rec.share_link);
                res.stale += 1;
                continue;
            }
            match self.feature(rec)? {
                Some(f) => res.collection.features.push(f),
                None => res.skipped += 1,
            }
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;
    use crate::broadcast::tests::jane;
    use crate::Stopped;

    #[rstest]
    #[case(IdStrategy::Sid, "https://x/y?sid=42", Some("42"))]
    #[case(IdStrategy::Sid, "https://x/y?foo=1&sid=abc-def", Some("abc-def"))]
    #[case(IdStrategy::Sid, "https://x/y?sid=", None)]
    #[case(IdStrategy::Sid, "https://x/y", None)]
    #[case(IdStrategy::Sid, "not a url", None)]
    #[case(IdStrategy::Param("stream".to_string()), "https://x/y?stream=7&sid=42", Some("7"))]
    #[case(IdStrategy::LastSegment, "https://x/live/99/", Some("99"))]
    #[case(IdStrategy::LastSegment, "https://x/", None)]
    fn test_extract(#[case] ids: IdStrategy, #[case] link: &str, #[case] res: Option<&str>) {
        assert_eq!(res.map(str::to_owned), ids.extract(link));
    }

    #[rstest]
    #[case("minimal", Shape::Minimal)]
    #[case("full", Shape::Full)]
    #[case("video", Shape::Video)]
    fn test_shape_from_str(#[case] s: &str, #[case] shape: Shape) {
        assert_eq!(shape, Shape::from_str(s).unwrap());
        assert_eq!(s, shape.to_string());
    }

    #[test]
    fn test_feature_minimal() {
        let c = Converter::new(Shape::Minimal, IdStrategy::Sid, MissingId::Skip);
        let f = c.feature(&jane(Some(1000), None)).unwrap().unwrap();

        assert_eq!("airdata-42", f.id);
        assert_eq!(Geometry::point(-122.1, 37.4), f.geometry);
        assert_eq!("UAS: Jane Doe", f.properties.callsign);
        assert!(f.properties.cot.is_none());
        assert!(f.properties.metadata.is_none());
        assert!(f.properties.video.is_none());
    }

    #[test]
    fn test_feature_full() {
        let rec = jane(Some(1000), None);
        let c = Converter::new(Shape::Full, IdStrategy::Sid, MissingId::Skip);
        let f = c.feature(&rec).unwrap().unwrap();

        assert_eq!(Some(COT_UAS.to_string()), f.properties.cot);
        assert_eq!(Some(rec), f.properties.metadata);
        assert!(f.properties.video.is_none());
    }

    #[test]
    fn test_feature_video() {
        let c = Converter::default();
        let f = c.feature(&jane(Some(1000), None)).unwrap().unwrap();

        let v = f.properties.video.unwrap();
        assert_eq!("airdata-42-video", v.uid);
        assert_eq!("airdata-42-camera", v.sensor);
        assert_eq!("rtmp://x/live/42", v.url);
        assert_eq!("UAS: Jane Doe", v.connection.alias);
    }

    #[test]
    fn test_feature_missing_id() {
        let mut rec = jane(None, None);
        rec.share_link = "https://x/y?foo=1".to_string();

        let skip = Converter::new(Shape::Video, IdStrategy::Sid, MissingId::Skip);
        assert_eq!(Ok(None), skip.feature(&rec));

        let fail = Converter::new(Shape::Video, IdStrategy::Sid, MissingId::Fail);
        assert_eq!(
            Err(ConvertError::MissingId("https://x/y?foo=1".to_string())),
            fail.feature(&rec)
        );
    }

    #[test]
    fn test_collect_scenario() {
        let c = Converter::default();
        let recs = vec![jane(Some(1000), Some(Stopped::At(2000)))];

        let res = c.collect(&recs, 2000 * 1000 + 700_000).unwrap();
        assert!(res.collection.is_empty());
        assert_eq!(1, res.stale);

        let res = c.collect(&recs, 2000 * 1000 + 300_000).unwrap();
        assert_eq!(1, res.collection.len());
        assert_eq!(0, res.stale);

        let f = &res.collection.features[0];
        assert_eq!("airdata-42", f.id);
        assert_eq!(Geometry::point(-122.1, 37.4), f.geometry);
        assert_eq!("UAS: Jane Doe", f.properties.callsign);
    }

    #[test]
    fn test_collect_keeps_order_and_counts() {
        let c = Converter::default();

        let mut a = jane(None, None);
        a.share_link = "https://x/y?sid=a".to_string();
        let mut b = jane(Some(1000), Some(Stopped::At(2000)));
        b.share_link = "https://x/y?sid=b".to_string();
        let mut d = jane(None, None);
        d.share_link = "https://x/y".to_string();
        let mut e = jane(Some(1000), Some(Stopped::Flag(false)));
        e.share_link = "https://x/y?sid=e".to_string();

        let recs = vec![a, b, d, e];
        let res = c.collect(&recs, 10_000_000).unwrap();

        let ids: Vec<_> = res.collection.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(vec!["airdata-a", "airdata-e"], ids);
        assert_eq!(1, res.stale);
        assert_eq!(1, res.skipped);
        assert!(res.collection.len() <= recs.len());
    }

    #[test]
    fn test_collect_fail_batch() {
        let c = Converter::new(Shape::Minimal, IdStrategy::Sid, MissingId::Fail);

        let mut d = jane(None, None);
        d.share_link = "https://x/y".to_string();
        let recs = vec![jane(None, None), d];

        assert!(c.collect(&recs, 0).is_err());
    }

    #[test]
    fn test_collect_is_deterministic() {
        let c = Converter::default();
        let recs = vec![jane(Some(1000), None), jane(Some(1000), Some(Stopped::At(2000)))];

        let a = c.collect(&recs, 2_100_000).unwrap();
        let b = c.collect(&recs, 2_100_000).unwrap();
        assert_eq!(a, b);
    }
}
