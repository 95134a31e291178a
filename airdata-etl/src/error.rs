//! Error module
//!

use thiserror::Error;

use airdata_common::ConfigError;
use airdata_formats::ConvertError;
use airdata_sources::{AuthError, FetchError};

use crate::SinkError;

#[derive(Debug, Error)]
pub enum Status {
    #[error("No API token, set api_token in {0} or use --token")]
    MissingToken(String),
    #[error("Invalid interval {0}: {1}")]
    BadInterval(String, String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Convert(#[from] ConvertError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
