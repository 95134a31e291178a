//! Feature sinks.
//!
//! Every invocation ends with exactly one `submit()` carrying the complete collection, the
//! sink replaces whatever it had before with it.
//!

use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use airdata_formats::FeatureCollection;

pub use file::*;
pub use http::*;
pub use stdout::*;

mod file;
mod http;
mod stdout;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Can not write {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("HTTP Error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Error({0}): {1}")]
    Status(u16, String),
    #[error("Can not serialize: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything able to take a full snapshot of features.
///
#[async_trait]
pub trait Sink: Debug + Send + Sync {
    /// Return sink's name
    fn name(&self) -> String;
    /// Replace the previous snapshot with this one
    async fn submit(&self, fc: &FeatureCollection) -> Result<(), SinkError>;
}

/// Represents the different kinds of sinks, as found in the configuration file.
///
#[derive(Clone, Debug, Default, Deserialize, Eq, JsonSchema, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Consumer {
    /// Display the collection on screen
    #[default]
    Stdout,
    /// Write the collection into a file
    File { path: PathBuf },
    /// POST the collection to a URL
    Http { url: String, token: Option<String> },
}

impl Consumer {
    /// Create the actual sink
    ///
    pub fn build(&self) -> Box<dyn Sink> {
        match self {
            Consumer::Stdout => Box::new(Stdout::new()),
            Consumer::File { path } => Box::new(File::new(path)),
            Consumer::Http { url, token } => Box::new(Http::new(url, token.as_deref())),
        }
    }
}

impl Display for Consumer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Consumer::Stdout => write!(f, "stdout"),
            Consumer::File { path } => write!(f, "file({})", path.display()),
            Consumer::Http { url, .. } => write!(f, "http({url})"),
        }
    }
}
