//! Air Data site specifics
//!
//! There is only one phase: the API token is sent as the username of an HTTP Basic
//! authentication (empty password) along with the GET on `/broadcasts/recent`.
//!
//! The answer is an anonymous JSON array of `Broadcast`.  Either the whole array matches
//! the schema or the fetch fails, we never return a partial batch.
//!
//! No retry, no pagination, no rate limiting.  Errors go back to the caller as-is.
//!

use async_trait::async_trait;
use clap::{crate_name, crate_version};
use reqwest::Client;
use tracing::{debug, trace};

use airdata_formats::Broadcast;

use crate::{http_get_auth, Auth, AuthError, FetchError, Fetchable, Site, ROUTE_RECENT};

/// AirData represent what is needed to connect & auth to and fetch data from the API.
///
#[derive(Clone, Debug)]
pub struct AirData {
    /// Name of the site
    pub site: String,
    /// Base site url taken from config
    pub base_url: String,
    /// Add this to `base_url` to fetch data
    pub get: String,
    /// Credentials
    auth: Auth,
    /// reqwest async client
    client: Client,
}

impl AirData {
    #[tracing::instrument]
    pub fn new() -> Self {
        trace!("airdata::new");

        let site = Site::new();
        AirData {
            get: site.route(ROUTE_RECENT).cloned().unwrap_or_default(),
            site: site.name,
            base_url: site.base_url,
            auth: Auth::Anon,
            client: Client::new(),
        }
    }

    /// Load some data from the configuration
    ///
    #[tracing::instrument(skip(site))]
    pub fn load(&mut self, site: &Site) -> Result<&mut Self, FetchError> {
        trace!("airdata::load");

        self.site = site.name.clone();
        self.base_url = site.base_url.trim_end_matches('/').to_owned();
        self.auth = site.auth.clone().unwrap_or_default();
        self.get = site
            .route(ROUTE_RECENT)
            .ok_or_else(|| FetchError::UnknownRoute(ROUTE_RECENT.to_string(), site.name.clone()))?
            .to_owned();
        Ok(self)
    }

    /// Shortcut for `new()` then `load()`
    ///
    pub fn from_site(site: &Site) -> Result<Self, FetchError> {
        let mut s = AirData::new();
        s.load(site)?;
        Ok(s)
    }

    /// Complete URL we GET
    ///
    #[inline]
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.get)
    }
}

impl Default for AirData {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetchable for AirData {
    fn name(&self) -> String {
        self.site.to_string()
    }

    /// The token is static, we only need to encode it.  Fails without touching the network
    /// if there is no key.
    ///
    #[tracing::instrument(skip(self))]
    fn authenticate(&self) -> Result<String, AuthError> {
        trace!("authenticate on {}", self.site);
        self.auth.header()?.ok_or(AuthError::NoAPIKey)
    }

    /// Fetch actual data using the aforementioned header
    ///
    #[tracing::instrument(skip(self, token))]
    async fn fetch(&self, token: &str) -> Result<Vec<Broadcast>, FetchError> {
        let url = self.url();
        trace!("Fetching data through {}…", url);

        let resp = http_get_auth!(self, &url, token).await?;
        debug!("{:?}", &resp);

        // Check status
        //
        let code = resp.status();
        if !code.is_success() {
            let errtxt = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status(code.as_u16(), errtxt));
        }

        let body = resp.text().await?;
        trace!("got {} bytes", body.len());

        let data = Broadcast::from_json(&body)?;
        debug!("{} broadcasts", data.len());
        Ok(data)
    }
}
