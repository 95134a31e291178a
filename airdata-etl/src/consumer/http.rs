//! POST the collection to a remote feature layer.
//!

use async_trait::async_trait;
use clap::{crate_name, crate_version};
use reqwest::Client;
use tracing::{debug, trace};

use airdata_formats::FeatureCollection;

use crate::{Sink, SinkError};

#[derive(Clone, Debug)]
pub struct Http {
    /// Where to POST
    pub url: String,
    /// Optional bearer token
    token: Option<String>,
    /// reqwest async client
    client: Client,
}

impl Http {
    #[tracing::instrument(skip(token))]
    pub fn new(url: &str, token: Option<&str>) -> Self {
        Http {
            url: url.to_owned(),
            token: token.map(str::to_owned),
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Sink for Http {
    fn name(&self) -> String {
        "http".to_string()
    }

    #[tracing::instrument(skip(self, fc))]
    async fn submit(&self, fc: &FeatureCollection) -> Result<(), SinkError> {
        trace!("Submitting {} features to {}…", fc.len(), self.url);

        let req = self
            .client
            .post(&self.url)
            .header(
                "user-agent",
                format!("{}/{}", crate_name!(), crate_version!()),
            )
            .json(fc);
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send().await?;
        debug!("{:?}", &resp);

        let code = resp.status();
        if !code.is_success() {
            let errtxt = resp.text().await.unwrap_or_default();
            return Err(SinkError::Status(code.as_u16(), errtxt));
        }
        Ok(())
    }
}
