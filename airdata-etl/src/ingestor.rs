//! The ingestor itself.
//!
//! One invocation is strictly sequential:
//!
//! 1. take the current time, once
//! 2. authenticate & fetch the recent broadcasts
//! 3. drop the stale ones and map the rest into features
//! 4. submit the whole collection to the sink
//!
//! Any error stops the invocation and goes back to the caller, nothing is retried and nothing
//! is submitted if the fetch or the conversion failed.
//!

use std::fmt::{Display, Formatter};

use chrono::Utc;
use tracing::{debug, info, trace};

use airdata_formats::Converter;
use airdata_sources::{AirData, Fetchable};

use crate::{Settings, Sink, Status};

/// Counters for one invocation
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Records received
    pub fetched: usize,
    /// Records dropped as stale
    pub stale: usize,
    /// Records without stream id
    pub skipped: usize,
    /// Features submitted
    pub submitted: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fetched={} stale={} skipped={} submitted={}",
            self.fetched, self.stale, self.skipped, self.submitted
        )
    }
}

#[derive(Debug)]
pub struct Ingestor {
    source: Box<dyn Fetchable>,
    converter: Converter,
    sink: Box<dyn Sink>,
    /// Dump the collection in the logs
    debug: bool,
}

impl Ingestor {
    pub fn new(
        source: Box<dyn Fetchable>,
        converter: Converter,
        sink: Box<dyn Sink>,
        debug: bool,
    ) -> Self {
        Ingestor {
            source,
            converter,
            sink,
            debug,
        }
    }

    /// Build the real thing from validated settings
    ///
    #[tracing::instrument(skip(settings))]
    pub fn from_settings(settings: &Settings) -> Result<Self, Status> {
        let source = AirData::from_site(&settings.site)?;
        Ok(Ingestor::new(
            Box::new(source),
            settings.converter.clone(),
            settings.sink.build(),
            settings.debug,
        ))
    }

    /// One invocation, now.
    ///
    pub async fn run_once(&self) -> Result<Summary, Status> {
        let now = Utc::now().timestamp_millis();
        self.run_at(now).await
    }

    /// One invocation, as if it was `now_ms`.
    ///
    #[tracing::instrument(skip(self))]
    pub async fn run_at(&self, now_ms: i64) -> Result<Summary, Status> {
        trace!("run on {} into {}", self.source.name(), self.sink.name());

        let token = self.source.authenticate()?;
        let records = self.source.fetch(&token).await?;

        let res = self.converter.collect(&records, now_ms)?;
        let fc = res.collection;

        if self.debug {
            info!("features = {}", serde_json::to_string(&fc).unwrap_or_default());
        }

        let summary = Summary {
            fetched: records.len(),
            stale: res.stale,
            skipped: res.skipped,
            submitted: fc.len(),
        };
        debug!("{summary}");

        self.sink.submit(&fc).await?;
        Ok(summary)
    }
}
