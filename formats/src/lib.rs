//! Data formats for the Air Data ingestor.
//!
//! - `Broadcast` is what the Air Data API sends us (input)
//! - `FeatureCollection` and friends are what we submit (output)
//! - `Converter` goes from one to the other, applying the staleness filter on the way
//!

pub use broadcast::*;
pub use convert::*;
pub use geojson::*;

mod broadcast;
mod convert;
mod geojson;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
