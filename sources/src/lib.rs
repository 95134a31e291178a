//! Module to deal with the sources we can connect to to fetch data.
//!
//! The submodules deal with:
//!
//! - authentication (static API token sent as HTTP Basic)
//! - site description (base URL & routes)
//! - fetching data (one GET, validated against the `Broadcast` schema).
//!

use std::fmt::Debug;

use async_trait::async_trait;

use airdata_formats::Broadcast;

// Re-export these modules for a shorter import path.
//
pub use access::*;
pub use auth::*;
pub use error::*;
pub use site::*;

#[macro_use]
mod macros;

mod access;
mod auth;
mod error;
mod site;

/// This trait enables us to manage the way of connecting and fetching data under
/// a single interface.
///
#[async_trait]
pub trait Fetchable: Debug + Send + Sync {
    /// Return site's name
    fn name(&self) -> String;
    /// Build the credentials for subsequent operations, no network involved
    fn authenticate(&self) -> Result<String, AuthError>;
    /// Fetch actual data, one call, the whole batch or nothing
    async fn fetch(&self, token: &str) -> Result<Vec<Broadcast>, FetchError>;
}

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
