use async_trait::async_trait;

use airdata_formats::FeatureCollection;

use crate::{Sink, SinkError};

/// Display the collection on screen, mostly for local runs.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stdout;

impl Stdout {
    #[tracing::instrument]
    pub fn new() -> Self {
        Stdout
    }
}

#[async_trait]
impl Sink for Stdout {
    fn name(&self) -> String {
        "stdout".to_string()
    }

    #[tracing::instrument(skip(self, fc))]
    async fn submit(&self, fc: &FeatureCollection) -> Result<(), SinkError> {
        let data = serde_json::to_string_pretty(fc)?;
        println!("{}", data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stdout_submit() {
        let s = Stdout::new();
        assert!(s.submit(&FeatureCollection::default()).await.is_ok());
    }
}
