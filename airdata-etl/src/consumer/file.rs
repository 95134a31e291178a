//! Write the collection into a file.
//!
//! The data goes into `<path>.tmp` first then gets renamed so that a reader never sees a
//! half-written snapshot.
//!

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, trace};

use airdata_formats::FeatureCollection;

use crate::{Sink, SinkError};

#[derive(Clone, Debug, PartialEq)]
pub struct File {
    /// Final path
    pub path: PathBuf,
}

impl File {
    #[tracing::instrument]
    pub fn new(path: &Path) -> Self {
        File {
            path: path.to_path_buf(),
        }
    }

    fn tmp(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

#[async_trait]
impl Sink for File {
    fn name(&self) -> String {
        "file".to_string()
    }

    #[tracing::instrument(skip(self, fc))]
    async fn submit(&self, fc: &FeatureCollection) -> Result<(), SinkError> {
        let data = serde_json::to_vec_pretty(fc)?;

        let tmp = self.tmp();
        trace!("Writing into {tmp:?}");
        tokio::fs::write(&tmp, &data)
            .await
            .map_err(|e| SinkError::Io(tmp.clone(), e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| SinkError::Io(self.path.clone(), e))?;

        info!("{} features written to {:?}", fc.len(), self.path);
        Ok(())
    }
}
