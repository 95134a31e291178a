//! Module that defines what is a site (API endpoint).
//!
//! Sites have a base URL, a way to authenticate and a set of possible routes.  The default
//! Air Data site only uses `recent`.
//!

use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Auth;

/// Name of the default site
pub const AIRDATA: &str = "airdata";
/// Default base URL
pub const AIRDATA_URL: &str = "https://api.airdata.com";
/// Route to the currently (or recently) live broadcasts
pub const ROUTE_RECENT: &str = "recent";

/// Describe what a site is and associated credentials.
///
#[derive(Clone, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
pub struct Site {
    /// Name of the site
    #[serde(default = "default_name")]
    pub name: String,
    /// Base URL (to avoid repeating)
    #[serde(default = "default_url")]
    pub base_url: String,
    /// Credentials
    pub auth: Option<Auth>,
    /// Different URLs available
    #[serde(default = "default_routes")]
    pub routes: BTreeMap<String, String>,
}

fn default_name() -> String {
    AIRDATA.to_string()
}

fn default_url() -> String {
    AIRDATA_URL.to_string()
}

fn default_routes() -> BTreeMap<String, String> {
    BTreeMap::from([(ROUTE_RECENT.to_string(), "/broadcasts/recent".to_string())])
}

impl Default for Site {
    fn default() -> Self {
        Site {
            name: default_name(),
            base_url: default_url(),
            auth: None,
            routes: default_routes(),
        }
    }
}

impl Site {
    /// The Air Data API
    ///
    pub fn new() -> Self {
        Site::default()
    }

    /// Set the credentials
    ///
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Return the list of routes
    ///
    pub fn list(&self) -> Vec<&String> {
        self.routes.keys().collect()
    }

    /// Check whether site has the mentioned route
    ///
    pub fn has(&self, meth: &str) -> bool {
        self.routes.contains_key(meth)
    }

    /// Retrieve a route
    ///
    pub fn route(&self, key: &str) -> Option<&String> {
        self.routes.get(key)
    }
}

impl Display for Site {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let auth = self.auth.clone().unwrap_or_default();
        write!(
            f,
            "{{ name={} url={} auth={} routes={:?} }}",
            self.name, self.base_url, auth, self.routes
        )
    }
}
