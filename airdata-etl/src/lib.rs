//! Library part of the `airdata-etl` utility.
//!
//! Poll the Air Data live broadcasts, drop the ones stopped for more than 10 minutes, turn
//! the rest into GeoJSON point features and submit the whole collection to a sink.
//!
//! The record formats are in the `airdata-formats` crate and the API access in the
//! `airdata-sources` crate.
//!

pub use cli::*;
pub use config::*;
pub use consumer::*;
pub use error::*;
pub use ingestor::*;
pub use schedule::*;

mod cli;
mod config;
mod consumer;
mod error;
mod ingestor;
mod schedule;
